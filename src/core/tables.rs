use std::collections::HashMap;

use super::types::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub min: f64,
    /// Exclusive upper bound; `f64::INFINITY` for the top bracket.
    pub max: f64,
    pub rate: f64,
}

impl Bracket {
    const fn new(min: f64, max: f64, rate: f64) -> Self {
        Self { min, max, rate }
    }

    pub fn contains(&self, income: f64) -> bool {
        income >= self.min && income < self.max
    }
}

#[derive(Debug, Clone)]
pub struct BracketSchedule {
    pub single: Vec<Bracket>,
    pub married_joint: Vec<Bracket>,
    pub married_separate: Vec<Bracket>,
}

impl BracketSchedule {
    pub fn for_status(&self, status: FilingStatus) -> &[Bracket] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedJoint => &self.married_joint,
            FilingStatus::MarriedSeparate => &self.married_separate,
        }
    }

    /// Rate of the first bracket whose `[min, max)` range holds `income`, or 0
    /// when no bracket matches.
    pub fn rate_for(&self, status: FilingStatus, income: f64) -> f64 {
        self.for_status(status)
            .iter()
            .find(|b| b.contains(income))
            .map_or(0.0, |b| b.rate)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NiitThresholds {
    pub single: f64,
    pub married_joint: f64,
    pub married_separate: f64,
    pub rate: f64,
}

impl NiitThresholds {
    pub fn threshold(&self, status: FilingStatus) -> f64 {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedJoint => self.married_joint,
            FilingStatus::MarriedSeparate => self.married_separate,
        }
    }

    /// NIIT only kicks in strictly above the threshold.
    pub fn applies(&self, status: FilingStatus, income: f64) -> bool {
        income > self.threshold(status)
    }
}

#[derive(Debug, Clone)]
pub struct TaxTables {
    pub capital_gains: BracketSchedule,
    pub ordinary_income: BracketSchedule,
    pub niit: NiitThresholds,
    state_rates: HashMap<String, f64>,
}

const INF: f64 = f64::INFINITY;

// Top marginal rate applied to long-term gains. States without an entry
// (AK, FL, NV, NH, SD, TN, TX, WY) resolve to 0.
const STATE_RATES_2025: &[(&str, f64)] = &[
    ("AL", 0.05),
    ("AR", 0.039),
    ("AZ", 0.025),
    ("CA", 0.133),
    ("CO", 0.044),
    ("CT", 0.0699),
    ("DC", 0.1075),
    ("DE", 0.066),
    ("GA", 0.0539),
    ("HI", 0.0725),
    ("IA", 0.038),
    ("ID", 0.05695),
    ("IL", 0.0495),
    ("IN", 0.03),
    ("KS", 0.0558),
    ("KY", 0.04),
    ("LA", 0.03),
    ("MA", 0.05),
    ("MD", 0.0575),
    ("ME", 0.0715),
    ("MI", 0.0425),
    ("MN", 0.0985),
    ("MO", 0.047),
    ("MS", 0.044),
    ("MT", 0.041),
    ("NC", 0.0425),
    ("ND", 0.025),
    ("NE", 0.052),
    ("NJ", 0.1075),
    ("NM", 0.059),
    ("NY", 0.109),
    ("OH", 0.035),
    ("OK", 0.0475),
    ("OR", 0.099),
    ("PA", 0.0307),
    ("RI", 0.0599),
    ("SC", 0.062),
    ("UT", 0.0455),
    ("VA", 0.0575),
    ("VT", 0.0875),
    ("WA", 0.07),
    ("WI", 0.0765),
    ("WV", 0.0482),
];

impl TaxTables {
    pub fn federal_2025() -> Self {
        Self {
            capital_gains: BracketSchedule {
                single: vec![
                    Bracket::new(0.0, 48_350.0, 0.0),
                    Bracket::new(48_350.0, 501_600.0, 0.15),
                    Bracket::new(501_600.0, INF, 0.20),
                ],
                married_joint: vec![
                    Bracket::new(0.0, 96_700.0, 0.0),
                    Bracket::new(96_700.0, 628_300.0, 0.15),
                    Bracket::new(628_300.0, INF, 0.20),
                ],
                married_separate: vec![
                    Bracket::new(0.0, 48_350.0, 0.0),
                    Bracket::new(48_350.0, 314_150.0, 0.15),
                    Bracket::new(314_150.0, INF, 0.20),
                ],
            },
            ordinary_income: BracketSchedule {
                single: vec![
                    Bracket::new(0.0, 11_000.0, 0.10),
                    Bracket::new(11_000.0, 44_725.0, 0.12),
                    Bracket::new(44_725.0, 95_375.0, 0.22),
                    Bracket::new(95_375.0, 182_050.0, 0.24),
                    Bracket::new(182_050.0, 231_250.0, 0.32),
                    Bracket::new(231_250.0, 578_100.0, 0.35),
                    Bracket::new(578_100.0, INF, 0.37),
                ],
                married_joint: vec![
                    Bracket::new(0.0, 22_000.0, 0.10),
                    Bracket::new(22_000.0, 89_450.0, 0.12),
                    Bracket::new(89_450.0, 190_750.0, 0.22),
                    Bracket::new(190_750.0, 364_200.0, 0.24),
                    Bracket::new(364_200.0, 462_500.0, 0.32),
                    Bracket::new(462_500.0, 693_750.0, 0.35),
                    Bracket::new(693_750.0, INF, 0.37),
                ],
                married_separate: vec![
                    Bracket::new(0.0, 11_000.0, 0.10),
                    Bracket::new(11_000.0, 44_725.0, 0.12),
                    Bracket::new(44_725.0, 95_375.0, 0.22),
                    Bracket::new(95_375.0, 182_050.0, 0.24),
                    Bracket::new(182_050.0, 231_250.0, 0.32),
                    Bracket::new(231_250.0, 346_875.0, 0.35),
                    Bracket::new(346_875.0, INF, 0.37),
                ],
            },
            niit: NiitThresholds {
                single: 200_000.0,
                married_joint: 250_000.0,
                married_separate: 125_000.0,
                rate: 0.038,
            },
            state_rates: STATE_RATES_2025
                .iter()
                .map(|(code, rate)| ((*code).to_string(), *rate))
                .collect(),
        }
    }

    pub fn with_state_rates<I>(mut self, rates: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        self.state_rates = rates
            .into_iter()
            .map(|(code, rate)| (code.trim().to_ascii_uppercase(), rate))
            .collect();
        self
    }

    pub fn state_rate(&self, code: &str) -> f64 {
        self.state_rates
            .get(&code.trim().to_ascii_uppercase())
            .copied()
            .unwrap_or(0.0)
    }
}

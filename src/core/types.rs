use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilingStatus {
    Single,
    #[serde(alias = "married-joint", alias = "married_joint")]
    MarriedJoint,
    #[serde(alias = "married-separate", alias = "married_separate")]
    MarriedSeparate,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GainType {
    Stock,
    #[serde(alias = "real-estate", alias = "real_estate")]
    RealEstate,
    Business,
    Other,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Conservative,
    Moderate,
    Optimistic,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Conservative,
        Scenario::Moderate,
        Scenario::Optimistic,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfile {
    pub capital_gain_amount: f64,
    pub gain_type: Option<GainType>,
    pub sale_date: NaiveDate,
    pub state: String,
    pub filing_status: FilingStatus,
    pub annual_income: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileDraft {
    pub capital_gain_amount: Option<f64>,
    pub gain_type: Option<GainType>,
    pub sale_date: Option<NaiveDate>,
    pub state: Option<String>,
    pub filing_status: Option<FilingStatus>,
    pub annual_income: Option<f64>,
}

impl ProfileDraft {
    pub fn merge(&mut self, update: ProfileDraft) {
        if let Some(v) = update.capital_gain_amount {
            self.capital_gain_amount = Some(v);
        }
        if let Some(v) = update.gain_type {
            self.gain_type = Some(v);
        }
        if let Some(v) = update.sale_date {
            self.sale_date = Some(v);
        }
        if let Some(v) = update.state {
            self.state = Some(v);
        }
        if let Some(v) = update.filing_status {
            self.filing_status = Some(v);
        }
        if let Some(v) = update.annual_income {
            self.annual_income = Some(v);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    pub fn missing_field(&self) -> Option<&'static str> {
        if self.capital_gain_amount.is_none() {
            return Some("capitalGainAmount");
        }
        if self.sale_date.is_none() {
            return Some("saleDate");
        }
        if self.state.as_deref().is_none_or(|s| s.trim().is_empty()) {
            return Some("state");
        }
        if self.filing_status.is_none() {
            return Some("filingStatus");
        }
        if self.annual_income.is_none() {
            return Some("annualIncome");
        }
        None
    }

    pub fn to_profile(&self) -> Option<InvestorProfile> {
        Some(InvestorProfile {
            capital_gain_amount: self.capital_gain_amount?,
            gain_type: self.gain_type,
            sale_date: self.sale_date?,
            state: self
                .state
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())?
                .to_string(),
            filing_status: self.filing_status?,
            annual_income: self.annual_income?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculation {
    /// Federal capital-gains rate plus NIIT when it applies.
    pub federal_rate: f64,
    pub state_rate: f64,
    pub niit_applies: bool,
    pub total_tax_owed: f64,
    pub deadline: NaiveDate,
    pub deadline_date: String,
    pub federal_tax: f64,
    pub niit_tax: f64,
    pub state_tax: f64,
    pub ordinary_income_rate: f64,
}

impl TaxCalculation {
    pub fn combined_rate(&self) -> f64 {
        self.federal_rate + self.state_rate
    }

    pub fn rates(&self) -> InvestorRates {
        InvestorRates {
            combined: self.combined_rate(),
            ordinary_income: self.ordinary_income_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestorRates {
    pub combined: f64,
    pub ordinary_income: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Year1CashFlow {
    pub cash_flow: f64,
    pub noi_share: f64,
    pub effectively_tax_free: bool,
    pub sheltered_amount: f64,
    pub excess_depreciation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OzProjection {
    pub investment_amount: f64,
    pub scenario: Scenario,
    pub hold_period: u32,
    pub projected_value: f64,
    pub tax_free_gains: f64,
    pub total_tax_savings: f64,
    pub deferred_tax: f64,
    pub appreciation_tax_saved: f64,
    pub bonus_depreciation_deduction: f64,
    pub depreciation_tax_savings: f64,
    pub total_stacked_benefits: f64,
    pub year1_cash_flow_tax_free: bool,
    pub year1: Year1CashFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthOutcome {
    pub initial_investment: f64,
    pub taxes_paid_now: f64,
    pub end_value: f64,
    pub taxes_on_appreciation: f64,
    pub net_wealth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
    #[serde(rename = "withoutOZ")]
    pub without_fund: WealthOutcome,
    #[serde(rename = "withOZ")]
    pub with_fund: WealthOutcome,
    pub net_wealth_difference: f64,
    /// Part of the original gain not placed in the fund; taxed now on both paths.
    pub gain_outside_fund: f64,
}

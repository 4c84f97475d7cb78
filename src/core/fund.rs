//! Financial model of the Hazen Road build-to-rent Opportunity Zone fund.
//!
//! Every figure here is a constant of the fund's underwriting. The three
//! return scenarios share the same IRR, yield and NOI figures; only the
//! label, description and year-1 cash-on-cash ratio differ between them.

use serde::Serialize;

use super::types::Scenario;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAssumptions {
    pub label: &'static str,
    pub description: &'static str,
    /// Annualised LP return implied by the 10-year cash-on-cash multiple.
    pub irr: f64,
    #[serde(rename = "yield")]
    pub yield_rate: f64,
    pub year10_noi: f64,
    pub year1_cash_flow: f64,
    /// Investor's pro-rata share of year-1 NOI.
    pub year1_noi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldPeriodOption {
    pub years: u32,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPreset {
    pub amount: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundModel {
    pub name: &'static str,
    pub location: &'static str,
    pub market_type: &'static str,
    pub exit_strategy: &'static str,
    pub total_cost: f64,
    pub unit_count: u32,
    pub cost_per_unit: f64,
    /// Asset value eligible for 100% bonus depreciation.
    pub qualifying_assets: f64,
    pub depreciation_rate: f64,
    pub eligible_categories: Vec<&'static str>,
    pub lp_equity_required: f64,
    pub min_investment: f64,
    pub max_investment: f64,
    /// Total distributable LP value at exit (profit split plus return of
    /// capital), precomputed from the fund's exit waterfall.
    pub total_lp_value_at_exit: f64,
    pub federal_ltcg_rate: f64,
    pub state_ltcg_rate: f64,
    pub niit_rate: f64,
    /// Nominal annual return assumed for the alternative investment path.
    pub alternative_return: f64,
    pub hold_periods: Vec<HoldPeriodOption>,
    pub investment_presets: Vec<InvestmentPreset>,
    conservative: ScenarioAssumptions,
    moderate: ScenarioAssumptions,
    optimistic: ScenarioAssumptions,
}

impl FundModel {
    pub fn hazen_road() -> Self {
        // 160.30% LP cash-on-cash over ten years.
        let irr = (1.0_f64 + 1.603).powf(1.0 / 10.0) - 1.0;
        let base = |label, description, year1_cash_flow| ScenarioAssumptions {
            label,
            description,
            irr,
            yield_rate: 0.0803,
            year10_noi: 5_159_032.0,
            year1_cash_flow,
            year1_noi: 103_525.0,
        };

        Self {
            name: "Hazen Road",
            location: "Buckeye, Arizona",
            market_type: "Build-to-Rent",
            exit_strategy: "10+ year hold with institutional sale",
            total_cost: 57_587_425.0,
            unit_count: 178,
            cost_per_unit: 323_525.0,
            qualifying_assets: 12_560_626.16,
            depreciation_rate: 1.0,
            eligible_categories: vec![
                "Appliances and fixtures",
                "Landscaping and site improvements",
                "Interior finishes",
                "Technology infrastructure",
            ],
            lp_equity_required: 19_323_884.0,
            min_investment: 250_000.0,
            max_investment: 19_323_884.0,
            total_lp_value_at_exit: 53_505_866.0,
            federal_ltcg_rate: 0.20,
            state_ltcg_rate: 0.025,
            niit_rate: 0.038,
            alternative_return: 0.08,
            hold_periods: vec![
                HoldPeriodOption {
                    years: 10,
                    label: "10 Years",
                    description: "Minimum hold for full OZ benefits",
                },
                HoldPeriodOption {
                    years: 12,
                    label: "12 Years",
                    description: "Extended hold for additional appreciation",
                },
                HoldPeriodOption {
                    years: 15,
                    label: "15 Years",
                    description: "Long-term hold for maximum returns",
                },
            ],
            investment_presets: vec![
                InvestmentPreset { amount: 250_000.0, label: "$250K" },
                InvestmentPreset { amount: 500_000.0, label: "$500K" },
                InvestmentPreset { amount: 750_000.0, label: "$750K" },
                InvestmentPreset { amount: 1_000_000.0, label: "$1M" },
                InvestmentPreset { amount: 1_500_000.0, label: "$1.5M" },
                InvestmentPreset { amount: 2_000_000.0, label: "$2M+" },
            ],
            conservative: base(
                "Base Market Rent",
                "Conservative projections based on current market rents",
                0.03,
            ),
            moderate: base(
                "10% Rent Premium",
                "Moderate projections with 10% rent premium over market",
                0.035,
            ),
            optimistic: base(
                "15% Rent Premium",
                "Optimistic projections with 15% rent premium over market",
                0.04,
            ),
        }
    }

    pub fn scenario(&self, scenario: Scenario) -> &ScenarioAssumptions {
        match scenario {
            Scenario::Conservative => &self.conservative,
            Scenario::Moderate => &self.moderate,
            Scenario::Optimistic => &self.optimistic,
        }
    }

    pub fn is_offered_hold_period(&self, years: u32) -> bool {
        self.hold_periods.iter().any(|h| h.years == years)
    }

    pub fn clamp_investment(&self, amount: f64) -> f64 {
        amount.clamp(self.min_investment, self.max_investment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_share_numeric_assumptions_but_not_labels() {
        let fund = FundModel::hazen_road();
        let c = fund.scenario(Scenario::Conservative);
        for s in [Scenario::Moderate, Scenario::Optimistic] {
            let other = fund.scenario(s);
            assert_eq!(other.irr, c.irr);
            assert_eq!(other.yield_rate, c.yield_rate);
            assert_eq!(other.year1_noi, c.year1_noi);
            assert_ne!(other.label, c.label);
        }
    }

    #[test]
    fn implied_irr_is_about_ten_percent() {
        let irr = FundModel::hazen_road().scenario(Scenario::Moderate).irr;
        assert!((irr - 0.1003).abs() < 1e-4, "irr {irr}");
    }

    #[test]
    fn clamp_investment_applies_both_bounds() {
        let fund = FundModel::hazen_road();
        assert_eq!(fund.clamp_investment(10.0), 250_000.0);
        assert_eq!(fund.clamp_investment(600_000.0), 600_000.0);
        assert_eq!(fund.clamp_investment(50_000_000.0), 19_323_884.0);
    }

    #[test]
    fn only_catalogued_hold_periods_are_offered() {
        let fund = FundModel::hazen_road();
        assert!(fund.is_offered_hold_period(10));
        assert!(fund.is_offered_hold_period(15));
        assert!(!fund.is_offered_hold_period(11));
    }
}

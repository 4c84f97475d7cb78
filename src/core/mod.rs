mod engine;
mod format;
mod fund;
mod tables;
mod tax;
mod types;
mod validate;

pub use engine::{
    BonusDepreciation, calculate_bonus_depreciation, calculate_comparison,
    calculate_oz_projection, year1_cash_flow_benefit,
};
pub use format::{format_currency, format_percentage};
pub use fund::{FundModel, HoldPeriodOption, InvestmentPreset, ScenarioAssumptions};
pub use tables::{Bracket, BracketSchedule, NiitThresholds, TaxTables};
pub use tax::{
    REINVESTMENT_WINDOW_DAYS, calculate_current_tax_liability, format_long_date,
    reinvestment_deadline,
};
pub use types::{
    ComparisonData, FilingStatus, GainType, InvestorProfile, InvestorRates, OzProjection,
    ProfileDraft, Scenario, TaxCalculation, WealthOutcome, Year1CashFlow,
};
pub use validate::{MAX_CAPITAL_GAIN, MIN_CAPITAL_GAIN, validate_profile, validate_sale_date};

#[derive(Debug, Clone)]
pub struct Calculator {
    pub tables: TaxTables,
    pub fund: FundModel,
}

impl Calculator {
    pub fn new(tables: TaxTables, fund: FundModel) -> Self {
        Self { tables, fund }
    }

    pub fn tax_liability(&self, profile: &InvestorProfile) -> TaxCalculation {
        calculate_current_tax_liability(&self.tables, profile)
    }

    pub fn projection(
        &self,
        investment_amount: f64,
        scenario: Scenario,
        hold_period: u32,
        rates: InvestorRates,
    ) -> OzProjection {
        calculate_oz_projection(&self.fund, investment_amount, scenario, hold_period, rates)
    }

    pub fn comparison(
        &self,
        projection: &OzProjection,
        current_tax_rate: f64,
        original_gain_amount: f64,
    ) -> ComparisonData {
        calculate_comparison(&self.fund, projection, current_tax_rate, original_gain_amount)
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(TaxTables::federal_2025(), FundModel::hazen_road())
    }
}

use chrono::{Days, NaiveDate};

use super::tables::TaxTables;
use super::types::{InvestorProfile, TaxCalculation};

pub const REINVESTMENT_WINDOW_DAYS: u64 = 180;

pub fn calculate_current_tax_liability(
    tables: &TaxTables,
    profile: &InvestorProfile,
) -> TaxCalculation {
    let status = profile.filing_status;
    let income = profile.annual_income;
    let gain = profile.capital_gain_amount;

    let capital_gains_rate = tables.capital_gains.rate_for(status, income);

    let niit_applies = tables.niit.applies(status, income);
    let niit_rate = if niit_applies { tables.niit.rate } else { 0.0 };

    let state_rate = tables.state_rate(&profile.state);

    let federal_tax = gain * capital_gains_rate;
    let niit_tax = gain * niit_rate;
    let state_tax = gain * state_rate;

    // Approximate marginal rate on ordinary income, used to value depreciation.
    let ordinary_income_rate =
        tables.ordinary_income.rate_for(status, income) + niit_rate + state_rate;

    let deadline = reinvestment_deadline(profile.sale_date);

    TaxCalculation {
        federal_rate: capital_gains_rate + niit_rate,
        state_rate,
        niit_applies,
        total_tax_owed: federal_tax + niit_tax + state_tax,
        deadline,
        deadline_date: format_long_date(deadline),
        federal_tax,
        niit_tax,
        state_tax,
        ordinary_income_rate,
    }
}

pub fn reinvestment_deadline(sale_date: NaiveDate) -> NaiveDate {
    sale_date
        .checked_add_days(Days::new(REINVESTMENT_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// "September 22, 2025"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FilingStatus;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn profile(status: FilingStatus, income: f64, state: &str) -> InvestorProfile {
        InvestorProfile {
            capital_gain_amount: 500_000.0,
            gain_type: None,
            sale_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            state: state.to_string(),
            filing_status: status,
            annual_income: income,
        }
    }

    #[test]
    fn high_income_single_filer_in_zero_tax_state() {
        let tables = TaxTables::federal_2025();
        let calc =
            calculate_current_tax_liability(&tables, &profile(FilingStatus::Single, 600_000.0, "TX"));

        assert!(calc.niit_applies);
        assert_approx(calc.federal_rate, 0.238);
        assert_approx(calc.federal_tax, 100_000.0);
        assert_approx(calc.niit_tax, 19_000.0);
        assert_approx(calc.state_tax, 0.0);
        assert_approx(calc.total_tax_owed, 119_000.0);
        assert_approx(calc.ordinary_income_rate, 0.37 + 0.038);
    }

    #[test]
    fn state_rate_feeds_tax_and_ordinary_rate() {
        let tables = TaxTables::federal_2025();
        let calc = calculate_current_tax_liability(
            &tables,
            &profile(FilingStatus::MarriedJoint, 150_000.0, "AZ"),
        );

        assert!(!calc.niit_applies);
        assert_approx(calc.federal_rate, 0.15);
        assert_approx(calc.state_rate, 0.025);
        assert_approx(calc.state_tax, 12_500.0);
        assert_approx(calc.total_tax_owed, 75_000.0 + 12_500.0);
        assert_approx(calc.ordinary_income_rate, 0.22 + 0.025);
        assert_approx(calc.combined_rate(), 0.175);
    }

    #[test]
    fn income_at_niit_threshold_does_not_trigger_niit() {
        let tables = TaxTables::federal_2025();
        let calc = calculate_current_tax_liability(
            &tables,
            &profile(FilingStatus::MarriedSeparate, 125_000.0, "TX"),
        );
        assert!(!calc.niit_applies);
        assert_approx(calc.niit_tax, 0.0);
    }

    #[test]
    fn deadline_is_180_days_after_sale() {
        let tables = TaxTables::federal_2025();
        let calc =
            calculate_current_tax_liability(&tables, &profile(FilingStatus::Single, 50_000.0, "TX"));
        assert_eq!(calc.deadline, NaiveDate::from_ymd_opt(2025, 9, 11).unwrap());
        assert_eq!(calc.deadline_date, "September 11, 2025");
    }

    #[test]
    fn long_date_has_no_zero_padding() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_long_date(d), "January 5, 2026");
    }
}

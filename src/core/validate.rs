use chrono::{Months, NaiveDate};

use super::types::{InvestorProfile, ProfileDraft};
use crate::error::ValidationError;

pub const MIN_CAPITAL_GAIN: f64 = 1_000.0;
pub const MAX_CAPITAL_GAIN: f64 = 100_000_000.0;

pub fn validate_profile(
    draft: &ProfileDraft,
    today: NaiveDate,
) -> Result<InvestorProfile, ValidationError> {
    if let Some(field) = draft.missing_field() {
        return Err(ValidationError::MissingField(field));
    }
    let profile = draft
        .to_profile()
        .ok_or(ValidationError::MissingField("profile"))?;

    let gain = profile.capital_gain_amount;
    if !gain.is_finite() || gain < MIN_CAPITAL_GAIN {
        return Err(ValidationError::out_of_range(
            "capitalGainAmount",
            "Minimum $1,000 required",
        ));
    }
    if gain > MAX_CAPITAL_GAIN {
        return Err(ValidationError::out_of_range(
            "capitalGainAmount",
            "Maximum $100M allowed",
        ));
    }

    if !profile.annual_income.is_finite() || profile.annual_income < 0.0 {
        return Err(ValidationError::out_of_range(
            "annualIncome",
            "Income must be positive",
        ));
    }

    validate_sale_date(profile.sale_date, today)?;

    Ok(profile)
}

pub fn validate_sale_date(sale_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if sale_date > today {
        return Err(ValidationError::out_of_range(
            "saleDate",
            "Sale date cannot be in the future",
        ));
    }
    let one_year_ago = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    if sale_date < one_year_ago {
        return Err(ValidationError::out_of_range(
            "saleDate",
            "Sale date cannot be more than 1 year ago",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FilingStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> ProfileDraft {
        ProfileDraft {
            capital_gain_amount: Some(500_000.0),
            gain_type: None,
            sale_date: Some(date(2025, 3, 1)),
            state: Some("AZ".to_string()),
            filing_status: Some(FilingStatus::Single),
            annual_income: Some(300_000.0),
        }
    }

    #[test]
    fn complete_profile_passes_without_gain_type() {
        let profile = validate_profile(&draft(), date(2025, 6, 1)).unwrap();
        assert_eq!(profile.state, "AZ");
        assert!(profile.gain_type.is_none());
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let mut d = draft();
        d.filing_status = None;
        assert_eq!(
            validate_profile(&d, date(2025, 6, 1)),
            Err(ValidationError::MissingField("filingStatus"))
        );

        let mut d = draft();
        d.state = Some("   ".to_string());
        assert_eq!(
            validate_profile(&d, date(2025, 6, 1)),
            Err(ValidationError::MissingField("state"))
        );
    }

    #[test]
    fn capital_gain_bounds_are_inclusive() {
        let today = date(2025, 6, 1);
        let mut d = draft();
        d.capital_gain_amount = Some(1_000.0);
        assert!(validate_profile(&d, today).is_ok());
        d.capital_gain_amount = Some(999.99);
        assert!(matches!(
            validate_profile(&d, today),
            Err(ValidationError::OutOfRange { field: "capitalGainAmount", .. })
        ));
        d.capital_gain_amount = Some(100_000_000.0);
        assert!(validate_profile(&d, today).is_ok());
        d.capital_gain_amount = Some(100_000_001.0);
        assert!(validate_profile(&d, today).is_err());
    }

    #[test]
    fn negative_income_is_rejected() {
        let mut d = draft();
        d.annual_income = Some(-1.0);
        assert!(matches!(
            validate_profile(&d, date(2025, 6, 1)),
            Err(ValidationError::OutOfRange { field: "annualIncome", .. })
        ));
    }

    #[test]
    fn sale_date_window_is_today_back_one_year() {
        let today = date(2025, 6, 1);
        assert!(validate_sale_date(today, today).is_ok());
        assert!(validate_sale_date(date(2024, 6, 1), today).is_ok());
        assert!(validate_sale_date(date(2024, 5, 31), today).is_err());
        assert!(validate_sale_date(date(2025, 6, 2), today).is_err());
    }

    #[test]
    fn leap_day_window_does_not_panic() {
        let today = date(2024, 2, 29);
        assert!(validate_sale_date(date(2023, 2, 28), today).is_ok());
        assert!(validate_sale_date(date(2023, 2, 27), today).is_err());
    }
}

mod crm;
mod gateway;

pub use crm::{CrmClient, HttpCrmClient, HttpCrmConfig};
pub use gateway::LeadGateway;

#[cfg(test)]
pub(crate) use gateway::testing;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::OzProjection;
use crate::error::ValidationError;

pub const CONTACT_TAGS: [&str; 3] = ["OZ Calculator", "Opportunity Zone", "Tax Calculator Lead"];
pub const LEAD_SOURCE: &str = "OZ Tax Savings Calculator";
pub const SALE_DATE_FALLBACK: &str = "Not provided";
pub const AMOUNT_FALLBACK: &str = "0";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email pattern")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid phone pattern"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculationSnapshot {
    pub projected_value: Option<f64>,
    pub total_tax_savings: Option<f64>,
    pub investment_amount: Option<f64>,
}

impl CalculationSnapshot {
    pub fn from_projection(projection: &OzProjection) -> Self {
        Self {
            projected_value: Some(projection.projected_value),
            total_tax_savings: Some(projection.total_tax_savings),
            investment_amount: Some(projection.investment_amount),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub has_qualifying_gains: bool,
    #[serde(rename = "interestedInHazen")]
    pub interested_in_fund: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
    #[serde(rename = "calculationData", skip_serializing_if = "Option::is_none")]
    pub calculation: Option<CalculationSnapshot>,
}

impl LeadRecord {
    pub fn check_required(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }

    pub fn validate_contact_details(&self) -> Result<(), ValidationError> {
        self.check_required()?;
        if self.name.trim().chars().count() < 2 {
            return Err(ValidationError::invalid_format(
                "name",
                "Name must be at least 2 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::invalid_format("email", "Invalid email address"));
        }
        if !is_valid_phone(&self.phone) {
            return Err(ValidationError::invalid_format("phone", "Invalid phone number"));
        }
        Ok(())
    }

    pub fn investment_amount(&self) -> Option<f64> {
        self.calculation.as_ref().and_then(|c| c.investment_amount)
    }

    pub fn total_tax_savings(&self) -> Option<f64> {
        self.calculation.as_ref().and_then(|c| c.total_tax_savings)
    }

    pub fn projected_value(&self) -> Option<f64> {
        self.calculation.as_ref().and_then(|c| c.projected_value)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Whitespace, dashes and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&compact)
}

pub fn lead_score(lead: &LeadRecord) -> u8 {
    let mut score: u32 = 50;

    if lead.has_qualifying_gains {
        score += 30;
    }
    if lead.interested_in_fund {
        score += 20;
    }

    match lead.investment_amount() {
        Some(v) if v >= 1_000_000.0 => score += 25,
        Some(v) if v >= 500_000.0 => score += 15,
        _ => {}
    }

    match lead.total_tax_savings() {
        Some(v) if v >= 200_000.0 => score += 20,
        Some(v) if v >= 100_000.0 => score += 10,
        _ => {}
    }

    score.min(100) as u8
}

/// First whitespace-separated word, and everything after it.
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}

impl CustomField {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location_id: String,
    pub tags: Vec<String>,
    pub custom_fields: Vec<CustomField>,
}

impl ContactRequest {
    /// Maps a lead onto the CRM schema. Every optional lead field resolves to
    /// a named fallback here, so the wire payload is always complete.
    pub fn from_lead(lead: &LeadRecord, location_id: &str) -> Self {
        let (first_name, last_name) = split_name(&lead.name);
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let amount = |v: Option<f64>| v.map_or_else(|| AMOUNT_FALLBACK.to_string(), |v| v.to_string());

        let sale_date = lead
            .sale_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(SALE_DATE_FALLBACK);

        Self {
            first_name,
            last_name,
            email: lead.email.trim().to_string(),
            phone: lead.phone.trim().to_string(),
            location_id: location_id.to_string(),
            tags: CONTACT_TAGS.iter().map(|t| (*t).to_string()).collect(),
            custom_fields: vec![
                CustomField::new("has_qualifying_gains", yes_no(lead.has_qualifying_gains)),
                CustomField::new("interested_in_hazen", yes_no(lead.interested_in_fund)),
                CustomField::new("sale_date", sale_date),
                CustomField::new("projected_value", amount(lead.projected_value())),
                CustomField::new("total_tax_savings", amount(lead.total_tax_savings())),
                CustomField::new("investment_amount", amount(lead.investment_amount())),
                CustomField::new("lead_source", LEAD_SOURCE),
                CustomField::new("lead_score", lead_score(lead).to_string()),
            ],
        }
    }

    pub fn custom_field(&self, key: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    Calculator, ComparisonData, InvestorProfile, OzProjection, ProfileDraft, Scenario,
    TaxCalculation, validate_profile,
};
use crate::error::{ValidationError, WizardError};
use crate::lead::{CalculationSnapshot, LeadGateway, LeadRecord};

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Profile = 1,
    TaxLiability = 2,
    Projection = 3,
    Comparison = 4,
    LeadCapture = 5,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Profile),
            2 => Some(Self::TaxLiability),
            3 => Some(Self::Projection),
            4 => Some(Self::Comparison),
            5 => Some(Self::LeadCapture),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LeadStatus {
    Collecting,
    Submitted {
        #[serde(rename = "contactId")]
        contact_id: String,
    },
    Failed,
}

pub struct Wizard {
    calculator: Arc<Calculator>,
    step: WizardStep,
    profile: ProfileDraft,
    calculated_for: Option<ProfileDraft>,
    investor: Option<InvestorProfile>,
    tax: Option<TaxCalculation>,
    projection: Option<OzProjection>,
    comparison: Option<ComparisonData>,
    lead: LeadRecord,
    lead_status: LeadStatus,
}

impl Wizard {
    pub fn new(calculator: Arc<Calculator>) -> Self {
        Self {
            calculator,
            step: WizardStep::Profile,
            profile: ProfileDraft::default(),
            calculated_for: None,
            investor: None,
            tax: None,
            projection: None,
            comparison: None,
            lead: LeadRecord::default(),
            lead_status: LeadStatus::Collecting,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn profile(&self) -> &ProfileDraft {
        &self.profile
    }

    pub fn tax_calculation(&self) -> Option<&TaxCalculation> {
        self.tax.as_ref()
    }

    pub fn projection(&self) -> Option<&OzProjection> {
        self.projection.as_ref()
    }

    pub fn comparison(&self) -> Option<&ComparisonData> {
        self.comparison.as_ref()
    }

    pub fn lead_status(&self) -> &LeadStatus {
        &self.lead_status
    }

    pub fn update_profile(&mut self, update: ProfileDraft) {
        self.profile.merge(update);
    }

    pub fn calculate_taxes(&mut self, today: NaiveDate) -> Result<&TaxCalculation, WizardError> {
        // A failed recalculation must not leave the previous result standing.
        self.calculated_for = None;
        self.investor = None;
        self.tax = None;

        if let Some(field) = self.profile.missing_field() {
            return Err(WizardError::IncompleteProfile(field));
        }
        let investor = validate_profile(&self.profile, today)?;
        let tax = self.calculator.tax_liability(&investor);
        tracing::debug!(
            total_tax_owed = tax.total_tax_owed,
            niit_applies = tax.niit_applies,
            "tax liability calculated"
        );
        self.calculated_for = Some(self.profile.clone());
        self.investor = Some(investor);
        Ok(&*self.tax.insert(tax))
    }

    pub fn submit_profile(&mut self, today: NaiveDate) -> Result<WizardStep, WizardError> {
        self.require_step(WizardStep::Profile)?;
        self.calculate_taxes(today)?;
        self.next_step()
    }

    pub fn calculate_projection(
        &mut self,
        investment_amount: f64,
        scenario: Scenario,
        hold_period: u32,
    ) -> Result<&OzProjection, WizardError> {
        let (Some(tax), Some(investor)) = (self.tax.as_ref(), self.investor.as_ref()) else {
            return Err(WizardError::MissingTaxCalculation);
        };
        if !self.tax_is_current() {
            return Err(WizardError::StaleTaxCalculation);
        }
        if !investment_amount.is_finite() || investment_amount <= 0.0 {
            return Err(ValidationError::out_of_range(
                "investmentAmount",
                "Investment amount must be a positive number",
            )
            .into());
        }
        if !self.calculator.fund.is_offered_hold_period(hold_period) {
            return Err(ValidationError::out_of_range(
                "holdPeriod",
                format!("{hold_period} years is not an offered hold period"),
            )
            .into());
        }

        let rates = tax.rates();
        let projection =
            self.calculator
                .projection(investment_amount, scenario, hold_period, rates);
        let comparison =
            self.calculator
                .comparison(&projection, rates.combined, investor.capital_gain_amount);
        tracing::debug!(
            investment = projection.investment_amount,
            stacked_benefits = projection.total_stacked_benefits,
            net_wealth_difference = comparison.net_wealth_difference,
            "projection calculated"
        );

        self.comparison = Some(comparison);
        Ok(&*self.projection.insert(projection))
    }

    pub fn submit_investment(
        &mut self,
        investment_amount: f64,
        scenario: Scenario,
        hold_period: u32,
    ) -> Result<WizardStep, WizardError> {
        self.require_step(WizardStep::Projection)?;
        self.calculate_projection(investment_amount, scenario, hold_period)?;
        self.next_step()
    }

    /// Advances one step if the current step's prerequisites are met. On
    /// rejection the current step is left unchanged.
    pub fn next_step(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::Profile => {
                if let Some(field) = self.profile.missing_field() {
                    return Err(WizardError::IncompleteProfile(field));
                }
                if self.tax.is_none() {
                    return Err(WizardError::MissingTaxCalculation);
                }
                if !self.tax_is_current() {
                    return Err(WizardError::StaleTaxCalculation);
                }
            }
            WizardStep::Projection => {
                if self.projection.is_none() || self.comparison.is_none() {
                    return Err(WizardError::MissingProjection);
                }
            }
            WizardStep::TaxLiability | WizardStep::Comparison => {}
            WizardStep::LeadCapture => return Err(WizardError::AtFinalStep),
        }
        let next = self.step.next().ok_or(WizardError::AtFinalStep)?;
        self.step = next;
        Ok(next)
    }

    pub fn previous_step(&mut self) -> WizardStep {
        if let Some(prev) = self.step.previous() {
            self.step = prev;
        }
        self.step
    }

    pub fn go_back_to(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        if step > self.step {
            return Err(WizardError::CannotSkipAhead {
                requested: step,
                current: self.step,
            });
        }
        self.step = step;
        Ok(step)
    }

    /// Stores the contact details entered on the lead step. Any calculation
    /// data on `details` is ignored; the snapshot comes from the projection.
    pub fn set_lead_details(&mut self, details: LeadRecord) {
        self.lead = LeadRecord {
            calculation: None,
            ..details
        };
    }

    pub fn lead_record(&self) -> LeadRecord {
        let sale_date = self
            .lead
            .sale_date
            .clone()
            .or_else(|| self.investor.as_ref().map(|p| p.sale_date.to_string()));
        LeadRecord {
            sale_date,
            calculation: self.projection.as_ref().map(CalculationSnapshot::from_projection),
            ..self.lead.clone()
        }
    }

    pub async fn submit_lead(&mut self, gateway: &LeadGateway) -> Result<String, WizardError> {
        self.require_step(WizardStep::LeadCapture)?;
        self.lead.validate_contact_details()?;

        match gateway.submit(&self.lead_record()).await {
            Ok(contact_id) => {
                self.lead_status = LeadStatus::Submitted {
                    contact_id: contact_id.clone(),
                };
                Ok(contact_id)
            }
            Err(err) => {
                self.lead_status = LeadStatus::Failed;
                Err(err.into())
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.calculator));
    }

    fn tax_is_current(&self) -> bool {
        self.tax.is_some() && self.calculated_for.as_ref() == Some(&self.profile)
    }

    fn require_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }
}

pub const DEFAULT_HOLD_PERIOD: u32 = 10;

/// Inputs for a single pass through steps 1 to 4. The investment defaults to
/// the capital gain, the scenario to moderate and the hold to ten years.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(flatten)]
    pub profile: ProfileDraft,
    pub investment_amount: Option<f64>,
    pub scenario: Option<Scenario>,
    pub hold_period: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub tax_calculation: TaxCalculation,
    pub projection: OzProjection,
    pub comparison: ComparisonData,
}

pub fn run_estimate(
    calculator: Arc<Calculator>,
    request: EstimateRequest,
    today: NaiveDate,
) -> Result<Estimate, WizardError> {
    let mut wizard = Wizard::new(calculator);
    wizard.update_profile(request.profile);
    wizard.submit_profile(today)?;
    wizard.next_step()?;

    let amount = request
        .investment_amount
        .or(wizard.profile.capital_gain_amount)
        .ok_or(WizardError::IncompleteProfile("capitalGainAmount"))?;
    wizard.submit_investment(
        amount,
        request.scenario.unwrap_or(Scenario::Moderate),
        request.hold_period.unwrap_or(DEFAULT_HOLD_PERIOD),
    )?;

    match (wizard.tax, wizard.projection, wizard.comparison) {
        (Some(tax_calculation), Some(projection), Some(comparison)) => Ok(Estimate {
            tax_calculation,
            projection,
            comparison,
        }),
        (None, _, _) => Err(WizardError::MissingTaxCalculation),
        _ => Err(WizardError::MissingProjection),
    }
}

use thiserror::Error;

use crate::wizard::WizardStep;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field}: {message}")]
    OutOfRange {
        field: &'static str,
        message: String,
    },

    #[error("{field}: {message}")]
    InvalidFormat {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_format(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("CRM API key is not configured")]
    NotConfigured,

    #[error("CRM transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("CRM API error: {status}")]
    Status { status: u16, body: String },

    #[error("CRM response malformed: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Crm(#[from] CrmError),
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("profile is incomplete: {0} is missing")]
    IncompleteProfile(&'static str),

    #[error("tax liability has not been calculated")]
    MissingTaxCalculation,

    #[error("profile changed since taxes were calculated")]
    StaleTaxCalculation,

    #[error("investment projection has not been calculated")]
    MissingProjection,

    #[error("already at the final step")]
    AtFinalStep,

    #[error("action requires step {expected:?}, wizard is at {actual:?}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("cannot skip ahead to {requested:?} from {current:?}")]
    CannotSkipAhead {
        requested: WizardStep,
        current: WizardStep,
    },

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

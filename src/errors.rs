use chrono::NaiveDate;
use thiserror::Error;

use crate::api::RemoteError;
use crate::currency::Currency;
use crate::wizard::ValidationError;

/// Failures raised by a wizard session, from step gating up to the backend call.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Customer identifier is missing: {0} is required")]
    MissingIdentifier(&'static str),
    #[error("Branch is missing: select the branch that will hold the record")]
    MissingBranch,
    #[error("{0}")]
    Remote(#[from] RemoteError),
    #[error("Submission is only allowed from the final step (currently on step {current} of {total})")]
    NotTerminalStep { current: usize, total: usize },
    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

impl WizardError {
    /// Single-line notification shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            WizardError::Validation(err) => format!("Please correct the form: {}", err),
            WizardError::Remote(err) => err.message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self, WizardError::Configuration(_))
    }
}

/// Missing entry in a static lookup table. Treated as a defect, not user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("no interest rate configured for {currency} over {term_months} months")]
    MissingRate { currency: Currency, term_months: u32 },
    #[error("maturity date out of range: {start} + {months} months")]
    DateOutOfRange { start: NaiveDate, months: u32 },
    #[error("flow `{flow}` defines no steps")]
    EmptyFlow { flow: &'static str },
}

/// Errors raised while loading or saving the persisted configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

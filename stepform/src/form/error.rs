use super::fields::{FieldId, Step};
use thiserror::Error;

/// Misuse of the wizard's navigation API. Validation failures are not errors at this level;
/// they are reported through the step's error map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("already on the first page; there is nothing to go back to")]
    AtFirstStep,

    #[error("submit is only available from the summary page (current page: {0})")]
    NotOnSummary(Step),

    #[error("the form has already been submitted; reset to start over")]
    AlreadySubmitted,

    #[error("field {field} is not on the active page ({active})")]
    InactiveField { field: FieldId, active: Step },

    #[error("account details no longer validate ({} field(s) need attention)", .0.len())]
    CredentialsInvalid(Vec<FieldId>),
}

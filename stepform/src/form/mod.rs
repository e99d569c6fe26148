//! Form core: field validators, step schemas, per-step controllers and the wizard state machine.
//!
//! Everything here is synchronous and UI-agnostic; the terminal front-end in `crate::tui` only
//! routes key presses into [`WizardController`] and renders what it reports.

mod error;
mod fields;
pub mod schema;
mod sink;
mod step;
pub mod validators;
mod values;
mod wizard;

pub use error::WizardError;
pub use fields::{FieldId, Step};
pub use sink::{LogSubmissionSink, MemorySubmissionSink, SharedSink, SubmissionSink};
pub use step::{ChangeOutcome, StepController};
pub use validators::LiveCheck;
pub use values::{ErrorMap, FormValues, TouchedSet};
pub use wizard::{AdvanceOutcome, WizardController, WizardState};

// Wizard controller: page state machine over the three form steps plus the summary.
//
// States: Editing(page) for the four pages, then Submitted until reset.
// Transitions move one page at a time; forward moves are gated on whole-step validation,
// backward moves never validate.

use super::error::WizardError;
use super::fields::{FieldId, Step};
use super::sink::{LogSubmissionSink, SharedSink};
use super::step::{ChangeOutcome, StepController};
use crate::models::submission::FinalizedSubmission;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Editing(Step),
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved forward; now on this page.
    Advanced(Step),
    /// Stayed put; these fields failed and their errors are now visible.
    Blocked(Vec<FieldId>),
    /// "Next" on the summary page submitted the form.
    Submitted(FinalizedSubmission),
}

pub struct WizardController {
    state: WizardState,
    forms: [StepController; 3],
    sink: SharedSink,
    last_submission: Option<FinalizedSubmission>,
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("state", &self.state)
            .field("forms", &self.forms)
            .field("last_submission", &self.last_submission.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(Arc::new(LogSubmissionSink))
    }
}

fn form_index(step: Step) -> Option<usize> {
    match step {
        Step::PersonalInfo => Some(0),
        Step::Address => Some(1),
        Step::Account => Some(2),
        Step::Summary => None,
    }
}

impl WizardController {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            state: WizardState::Editing(Step::PersonalInfo),
            forms: Step::FORMS.map(StepController::new),
            sink,
            last_submission: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// The page being edited, or `None` once submitted.
    pub fn current_step(&self) -> Option<Step> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            WizardState::Submitted => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.state == WizardState::Submitted
    }

    pub fn form(&self, step: Step) -> Option<&StepController> {
        form_index(step).map(|i| &self.forms[i])
    }

    pub(crate) fn form_mut(&mut self, step: Step) -> Option<&mut StepController> {
        form_index(step).map(move |i| &mut self.forms[i])
    }

    /// The form on the current page (none on the summary page or after submission).
    pub fn active_form(&self) -> Option<&StepController> {
        self.current_step().and_then(|s| self.form(s))
    }

    pub fn last_submission(&self) -> Option<&FinalizedSubmission> {
        self.last_submission.as_ref()
    }

    /// Route one edit to the active page. Only the active page accepts input.
    pub fn handle_change(
        &mut self,
        field: FieldId,
        raw: impl Into<String>,
    ) -> Result<ChangeOutcome, WizardError> {
        let active = match self.state {
            WizardState::Submitted => return Err(WizardError::AlreadySubmitted),
            WizardState::Editing(step) => step,
        };
        if field.step() != active {
            return Err(WizardError::InactiveField { field, active });
        }
        match self.form_mut(active) {
            Some(form) => Ok(form.handle_change(field, raw)),
            None => Err(WizardError::InactiveField { field, active }),
        }
    }

    /// "Next" (or "Submit" on the summary page).
    pub fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        let current = match self.state {
            WizardState::Submitted => return Err(WizardError::AlreadySubmitted),
            WizardState::Editing(Step::Summary) => {
                return self.submit().map(AdvanceOutcome::Submitted);
            }
            WizardState::Editing(step) => step,
        };

        let Some(form) = self.form_mut(current) else {
            return Err(WizardError::NotOnSummary(current));
        };

        if !form.force_show_all_errors() {
            let failing: Vec<FieldId> = form.errors().keys().copied().collect();
            info!(
                "[PHASE: wizard] [STEP: advance] Blocked on page {} (failing={:?})",
                current,
                failing.iter().map(|f| f.key()).collect::<Vec<_>>()
            );
            return Ok(AdvanceOutcome::Blocked(failing));
        }

        let Some(next) = current.next() else {
            return Err(WizardError::NotOnSummary(current));
        };
        self.move_to(current, next);
        info!("[PHASE: wizard] [STEP: advance] {} -> {}", current, next);
        Ok(AdvanceOutcome::Advanced(next))
    }

    /// "Previous". No validation; the page being left forgets its reported errors.
    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        let current = match self.state {
            WizardState::Submitted => return Err(WizardError::AlreadySubmitted),
            WizardState::Editing(step) => step,
        };
        let Some(prev) = current.prev() else {
            return Err(WizardError::AtFirstStep);
        };

        if let Some(form) = self.form_mut(current) {
            form.clear_feedback();
        }
        self.move_to(current, prev);
        info!("[PHASE: wizard] [STEP: retreat] {} -> {}", current, prev);
        Ok(prev)
    }

    fn move_to(&mut self, from: Step, to: Step) {
        // The show-all flag never survives a page change, in either direction.
        for step in [from, to] {
            if let Some(form) = self.form_mut(step) {
                form.reset_show_all();
            }
        }
        self.state = WizardState::Editing(to);
    }

    /// Submit from the summary page. Credentials are re-validated (including the confirmation);
    /// on failure the wizard goes back to the account page with its errors visible.
    pub fn submit(&mut self) -> Result<FinalizedSubmission, WizardError> {
        match self.state {
            WizardState::Submitted => return Err(WizardError::AlreadySubmitted),
            WizardState::Editing(Step::Summary) => {}
            WizardState::Editing(step) => return Err(WizardError::NotOnSummary(step)),
        }

        let account = &mut self.forms[2];
        if !account.validate_all_fields() {
            account.force_show_all_errors();
            let failing: Vec<FieldId> = account.errors().keys().copied().collect();
            warn!(
                "[PHASE: submit] [STEP: revalidate] Account page no longer valid (failing={:?})",
                failing.iter().map(|f| f.key()).collect::<Vec<_>>()
            );
            self.state = WizardState::Editing(Step::Account);
            return Err(WizardError::CredentialsInvalid(failing));
        }

        let record = self.preview();
        self.sink.submit(&record);
        self.last_submission = Some(record.clone());
        self.state = WizardState::Submitted;
        info!("[PHASE: submit] [STEP: complete] Form submitted");
        Ok(record)
    }

    /// The record as it would be submitted right now (shown on the summary page).
    pub fn preview(&self) -> FinalizedSubmission {
        FinalizedSubmission::from_steps(
            self.forms[0].values(),
            self.forms[1].values(),
            self.forms[2].values(),
        )
    }

    /// Everything entered so far with the password masked (summary page).
    pub fn summary(&self) -> FinalizedSubmission {
        self.preview().masked()
    }

    /// "Submit Another Form": back to page one with every step emptied.
    pub fn reset(&mut self) {
        for form in self.forms.iter_mut() {
            form.reset();
        }
        self.last_submission = None;
        self.state = WizardState::Editing(Step::PersonalInfo);
        info!("[PHASE: wizard] [STEP: reset] Wizard reset to first page");
    }
}

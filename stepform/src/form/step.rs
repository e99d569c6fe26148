// Step controller: values, touched flags and error visibility for one page of the wizard.

use super::fields::{FieldId, Step};
use super::schema;
use super::validators::{self, LiveCheck};
use super::values::{ErrorMap, FormValues, TouchedSet};
use log::{debug, warn};

/// What happened to a keystroke routed through [`StepController::handle_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The value was stored and live-checked.
    Accepted(LiveCheck),
    /// The input filter dropped the update; nothing changed.
    Rejected,
}

#[derive(Debug, Clone)]
pub struct StepController {
    step: Step,
    values: FormValues,
    touched: TouchedSet,
    errors: ErrorMap,
    show_all_errors: bool,
}

impl StepController {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            values: FormValues::new(),
            touched: TouchedSet::new(),
            errors: ErrorMap::new(),
            show_all_errors: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: FieldId) -> &str {
        self.values.get(field)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn is_touched(&self, field: FieldId) -> bool {
        self.touched.contains(&field)
    }

    pub fn show_all_errors(&self) -> bool {
        self.show_all_errors
    }

    /// Apply one edit of `field`.
    ///
    /// Order matters: filter, mark touched, store, live-check. A failing live check never adds
    /// an error; a passing one removes any existing error for the field.
    pub fn handle_change(&mut self, field: FieldId, raw: impl Into<String>) -> ChangeOutcome {
        if field.step() != self.step {
            warn!(
                "[PHASE: form] [STEP: change] Ignoring field {} on page {}",
                field, self.step
            );
            return ChangeOutcome::Rejected;
        }

        let raw = raw.into();
        if !validators::accepts_input(field, &raw) {
            debug!(
                "[PHASE: form] [STEP: change] Dropped non-digit input for {}",
                field
            );
            return ChangeOutcome::Rejected;
        }

        self.touched.insert(field);
        self.values.set(field, raw);
        let check = self.revalidate_field(field);

        // Keep "passwords match" feedback live without forcing a retype of the confirmation.
        if field == FieldId::Password && self.is_touched(FieldId::ConfirmPassword) {
            self.revalidate_field(FieldId::ConfirmPassword);
        }

        ChangeOutcome::Accepted(check)
    }

    fn revalidate_field(&mut self, field: FieldId) -> LiveCheck {
        let check = validators::live_check(field, &self.values);
        if check.clears_error(field) {
            self.errors.remove(&field);
        }
        check
    }

    /// Whole-step validation. Rebuilds the error map from scratch; returns `true` when the step
    /// is valid. Calling it again with unchanged values yields the same map.
    pub fn validate_all_fields(&mut self) -> bool {
        self.errors = schema::validate_step(self.step, &self.values);
        if !self.errors.is_empty() {
            debug!(
                "[PHASE: form] [STEP: validate] page={} failing_fields={:?}",
                self.step,
                self.errors.keys().map(|f| f.key()).collect::<Vec<_>>()
            );
        }
        self.errors.is_empty()
    }

    /// Make every error on this step visible and validate. Used by Next/Submit.
    pub fn force_show_all_errors(&mut self) -> bool {
        self.show_all_errors = true;
        self.touched.extend(self.step.fields().iter().copied());
        self.validate_all_fields()
    }

    /// Visible iff (touched OR show-all) AND an error exists.
    pub fn should_show_error(&self, field: FieldId) -> bool {
        (self.is_touched(field) || self.show_all_errors)
            && self
                .errors
                .get(&field)
                .map(|m| !m.is_empty())
                .unwrap_or(false)
    }

    pub fn visible_error(&self, field: FieldId) -> Option<&str> {
        if self.should_show_error(field) {
            self.errors.get(&field).map(|s| s.as_str())
        } else {
            None
        }
    }

    /// Drop reported errors and the show-all flag (leaving the page backwards).
    pub fn clear_feedback(&mut self) {
        self.errors.clear();
        self.show_all_errors = false;
    }

    /// Reset the show-all flag only; touched fields and errors are kept.
    pub(crate) fn reset_show_all(&mut self) {
        self.show_all_errors = false;
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.touched.clear();
        self.errors.clear();
        self.show_all_errors = false;
    }

    #[cfg(test)]
    pub(crate) fn set_state_for_test(&mut self, touched: bool, show_all: bool, error: Option<&str>) {
        let field = self.step.fields()[0];
        self.touched.clear();
        if touched {
            self.touched.insert(field);
        }
        self.show_all_errors = show_all;
        self.errors.clear();
        if let Some(msg) = error {
            self.errors.insert(field, msg.to_string());
        }
    }
}

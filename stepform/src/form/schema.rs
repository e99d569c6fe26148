// Step schemas: whole-step validation composed from the field validators plus cross-field rules.

use super::fields::{FieldId, Step};
use super::validators::{self, MSG_PASSWORDS_DONT_MATCH};
use super::values::{ErrorMap, FormValues};

/// A rule that looks at more than one field and reports under a single field's key.
struct CrossFieldRule {
    report_on: FieldId,
    message: &'static str,
    holds: fn(&FormValues) -> bool,
}

fn passwords_match(values: &FormValues) -> bool {
    values.get(FieldId::Password) == values.get(FieldId::ConfirmPassword)
}

fn cross_field_rules(step: Step) -> &'static [CrossFieldRule] {
    const ACCOUNT_RULES: &[CrossFieldRule] = &[CrossFieldRule {
        report_on: FieldId::ConfirmPassword,
        message: MSG_PASSWORDS_DONT_MATCH,
        holds: passwords_match,
    }];

    match step {
        Step::Account => ACCOUNT_RULES,
        _ => &[],
    }
}

/// Validate every field of `step` against `values`.
///
/// Returns an empty map when the step is valid; otherwise exactly one entry per failing field
/// holding that field's first failure. Field rules take precedence over cross-field rules for the
/// same key (an empty confirmation reads "required", not "don't match").
pub fn validate_step(step: Step, values: &FormValues) -> ErrorMap {
    let mut errors = ErrorMap::new();

    for &field in step.fields() {
        if let Some(msg) = validators::full_check(field, values.get(field)) {
            errors.insert(field, msg.to_string());
        }
    }

    for rule in cross_field_rules(step) {
        if !(rule.holds)(values) {
            errors
                .entry(rule.report_on)
                .or_insert_with(|| rule.message.to_string());
        }
    }

    errors
}

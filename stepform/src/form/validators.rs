// Field validators
//
// Two phases, kept separate on purpose:
// - `live_check` runs on every keystroke and is only ever used to CLEAR an error.
// - `full_check` runs during whole-step validation and is the only source of error messages.

use super::fields::FieldId;
use super::values::FormValues;
use log::error;
use regex::Regex;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub const MIN_USERNAME_CHARS: usize = 4;
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MIN_ZIP_DIGITS: usize = 5;

pub const MSG_PASSWORDS_DONT_MATCH: &str = "Passwords don't match";

/// Result of the per-keystroke check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveCheck {
    Valid,
    Invalid,
    /// Too early to say (e.g. an email without `@` yet). Never shown as valid or invalid.
    Indeterminate,
}

impl LiveCheck {
    /// Whether this result removes a previously reported error for `field`.
    ///
    /// An emptied numeric field counts as "starting over": its stale error is dropped and the
    /// whole-step validation reports it again if it is still empty on Next.
    pub fn clears_error(&self, field: FieldId) -> bool {
        match self {
            LiveCheck::Valid => true,
            LiveCheck::Indeterminate => field.is_numeric(),
            LiveCheck::Invalid => false,
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                error!(
                    "[PHASE: validation] [STEP: email_regex] Failed to compile email regex: {}",
                    e
                );
                None
            }
        })
        .as_ref()
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().map(|re| re.is_match(value)).unwrap_or(false)
}

fn is_all_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

/// Keystroke-level input filter. Numeric fields only accept digits; the update is dropped
/// entirely otherwise.
pub fn accepts_input(field: FieldId, raw: &str) -> bool {
    !field.is_numeric() || is_all_digits(raw)
}

/// Cheap per-keystroke check. `values` must already hold the new value for `field`; the
/// confirm-password check reads the current password from it.
pub fn live_check(field: FieldId, values: &FormValues) -> LiveCheck {
    let value = values.get(field);
    match field {
        FieldId::Email => {
            if !value.contains('@') {
                LiveCheck::Indeterminate
            } else if is_valid_email(value) {
                LiveCheck::Valid
            } else {
                LiveCheck::Invalid
            }
        }
        FieldId::PhoneNumber | FieldId::ZipCode => {
            if value.is_empty() {
                LiveCheck::Indeterminate
            } else if full_check(field, value).is_none() {
                LiveCheck::Valid
            } else {
                LiveCheck::Invalid
            }
        }
        FieldId::ConfirmPassword => {
            if !value.is_empty() && value == values.get(FieldId::Password) {
                LiveCheck::Valid
            } else {
                LiveCheck::Invalid
            }
        }
        _ => {
            if full_check(field, value).is_none() {
                LiveCheck::Valid
            } else {
                LiveCheck::Invalid
            }
        }
    }
}

/// Single-field rules used by whole-step validation. Returns the first failing rule's message.
///
/// Cross-field rules (password confirmation) live in the step schema, not here.
pub fn full_check(field: FieldId, value: &str) -> Option<&'static str> {
    let chars = value.chars().count();
    match field {
        FieldId::FullName => value.is_empty().then_some("Full name is required"),
        FieldId::Email => {
            if value.is_empty() {
                Some("Email is required")
            } else if !is_valid_email(value) {
                Some("Please enter a valid email address")
            } else {
                None
            }
        }
        FieldId::PhoneNumber => {
            if value.is_empty() {
                Some("Phone number is required")
            } else if chars < MIN_PHONE_DIGITS {
                Some("Phone number must be at least 10 digits")
            } else if !is_all_digits(value) {
                Some("Phone number must contain only digits")
            } else {
                None
            }
        }
        FieldId::StreetAddress => value.is_empty().then_some("Street address is required"),
        FieldId::City => value.is_empty().then_some("City is required"),
        FieldId::ZipCode => {
            if value.is_empty() {
                Some("Zip code is required")
            } else if chars < MIN_ZIP_DIGITS {
                Some("Zip code must be at least 5 digits")
            } else if !is_all_digits(value) {
                Some("Zip code must contain only numbers")
            } else {
                None
            }
        }
        FieldId::Username => {
            if value.is_empty() {
                Some("Username is required")
            } else if chars < MIN_USERNAME_CHARS {
                Some("Username must be at least 4 characters")
            } else {
                None
            }
        }
        FieldId::Password => {
            if value.is_empty() {
                Some("Password is required")
            } else if chars < MIN_PASSWORD_CHARS {
                Some("Password must be at least 6 characters")
            } else {
                None
            }
        }
        FieldId::ConfirmPassword => value.is_empty().then_some("Confirm password is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(field: FieldId, value: &str) -> LiveCheck {
        live_check(field, &FormValues::from([(field, value)]))
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.io"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn email_is_indeterminate_until_it_contains_at() {
        assert_eq!(live(FieldId::Email, ""), LiveCheck::Indeterminate);
        assert_eq!(live(FieldId::Email, "jane"), LiveCheck::Indeterminate);
        assert_eq!(live(FieldId::Email, "jane@"), LiveCheck::Invalid);
        assert_eq!(live(FieldId::Email, "jane@example.com"), LiveCheck::Valid);
    }

    #[test]
    fn numeric_fields_reject_non_digits_at_input() {
        assert!(accepts_input(FieldId::ZipCode, "12345"));
        assert!(accepts_input(FieldId::ZipCode, ""));
        assert!(!accepts_input(FieldId::ZipCode, "1234a"));
        assert!(!accepts_input(FieldId::PhoneNumber, "555-123"));
        // Text fields accept anything.
        assert!(accepts_input(FieldId::City, "St. Louis 2"));
    }

    #[test]
    fn numeric_live_checks() {
        assert_eq!(live(FieldId::PhoneNumber, ""), LiveCheck::Indeterminate);
        assert_eq!(live(FieldId::PhoneNumber, "555123"), LiveCheck::Invalid);
        assert_eq!(live(FieldId::PhoneNumber, "5551234567"), LiveCheck::Valid);
        assert_eq!(live(FieldId::ZipCode, "1234"), LiveCheck::Invalid);
        assert_eq!(live(FieldId::ZipCode, "12345"), LiveCheck::Valid);
    }

    #[test]
    fn only_empty_numeric_indeterminate_clears() {
        assert!(LiveCheck::Indeterminate.clears_error(FieldId::ZipCode));
        assert!(!LiveCheck::Indeterminate.clears_error(FieldId::Email));
        assert!(LiveCheck::Valid.clears_error(FieldId::Email));
        assert!(!LiveCheck::Invalid.clears_error(FieldId::City));
    }

    #[test]
    fn confirm_password_reads_current_password() {
        let values = FormValues::from([
            (FieldId::Password, "secret1"),
            (FieldId::ConfirmPassword, "secret1"),
        ]);
        assert_eq!(live_check(FieldId::ConfirmPassword, &values), LiveCheck::Valid);

        let values = FormValues::from([
            (FieldId::Password, "secret2"),
            (FieldId::ConfirmPassword, "secret1"),
        ]);
        assert_eq!(
            live_check(FieldId::ConfirmPassword, &values),
            LiveCheck::Invalid
        );

        // Both empty is not a match.
        assert_eq!(
            live_check(FieldId::ConfirmPassword, &FormValues::new()),
            LiveCheck::Invalid
        );
    }

    #[test]
    fn full_check_reports_first_failure() {
        assert_eq!(
            full_check(FieldId::PhoneNumber, ""),
            Some("Phone number is required")
        );
        assert_eq!(
            full_check(FieldId::PhoneNumber, "123"),
            Some("Phone number must be at least 10 digits")
        );
        assert_eq!(
            full_check(FieldId::PhoneNumber, "12345-67890"),
            Some("Phone number must contain only digits")
        );
        assert_eq!(
            full_check(FieldId::Username, "bob"),
            Some("Username must be at least 4 characters")
        );
        assert_eq!(full_check(FieldId::Username, "bobby"), None);
        assert_eq!(
            full_check(FieldId::Password, "12345"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(full_check(FieldId::Password, "123456"), None);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 4 characters, 8 bytes.
        assert_eq!(full_check(FieldId::Username, "ßßßß"), None);
    }
}

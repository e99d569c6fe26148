// Logging utilities
// Structured logging with JSON and human-readable formats

use log::Level;
use serde_json::{json, Value};

const SECRET_KEYS: &[&str] = &["password", "pwd", "confirmpassword", "secret"];

/// Mask sensitive data in logs
pub fn mask_sensitive(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }

    let visible = 4;
    let start: String = chars[..visible].iter().collect();
    let end: String = chars[chars.len() - visible..].iter().collect();

    format!("{}...{}", start, end)
}

fn is_secret_key(key: &str) -> bool {
    let norm_key = key.to_ascii_lowercase().replace([' ', '_', '-'], "");
    SECRET_KEYS.contains(&norm_key.as_str())
}

/// Replace every secret-looking value in a JSON document with `***`, recursively.
///
/// Used before a record is written to any log sink; the record itself is left untouched.
pub fn mask_json_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter_mut() {
                if is_secret_key(k) && v.is_string() {
                    *v = json!("***");
                } else {
                    mask_json_secrets(v);
                }
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                mask_json_secrets(v);
            }
        }
        _ => {}
    }
}

/// Parse phase and step from log message
/// Extracts [PHASE: ...] and [STEP: ...] patterns
pub fn parse_log_metadata(message: &str) -> (Option<String>, Option<String>, String) {
    let (phase, cleaned_message) = extract_tag(message, "[PHASE:");
    let (step, cleaned_message) = extract_tag(&cleaned_message, "[STEP:");
    (phase, step, cleaned_message)
}

fn extract_tag(message: &str, tag: &str) -> (Option<String>, String) {
    let Some(start) = message.find(tag) else {
        return (None, message.to_string());
    };
    let Some(end) = message[start..].find(']') else {
        return (None, message.to_string());
    };

    let value = message[start + tag.len()..start + end].trim().to_string();
    let cleaned = format!("{} {}", &message[..start], &message[start + end + 1..])
        .trim()
        .to_string();
    (Some(value), cleaned)
}

/// Format log entry as JSON for structured logging
pub fn format_json_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_entry = json!({
        "timestamp": timestamp,
        "level": level.as_str(),
        "target": target,
        "message": message,
    });

    if let Some(phase) = phase {
        log_entry["phase"] = json!(phase);
    }

    if let Some(step) = step {
        log_entry["step"] = json!(step);
    }

    serde_json::to_string(&log_entry).unwrap_or_else(|_| "{}".to_string())
}

/// Format log entry as human-readable text
pub fn format_human_readable_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_line = format!("[{}] [{}]", timestamp, level.as_str());

    if let Some(phase) = phase {
        log_line.push_str(&format!(" [PHASE: {}]", phase));
    }

    if let Some(step) = step {
        log_line.push_str(&format!(" [STEP: {}]", step));
    }

    log_line.push_str(&format!(" [{}] {}", target, message));
    log_line
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Secret masking
    // -------------------------------------------------------------------------

    #[test]
    fn mask_sensitive_short_values_fully_masked() {
        assert_eq!(mask_sensitive("abc"), "***");
        assert_eq!(mask_sensitive("12345678"), "***");
    }

    #[test]
    fn mask_sensitive_long_values_partially_masked() {
        let masked = mask_sensitive("abcdefghijklmnop");
        assert!(
            masked.starts_with("abcd") && masked.ends_with("mnop"),
            "First/last 4 chars should be visible: {}",
            masked
        );
        assert!(!masked.contains("efgh"), "Middle leaked: {}", masked);
    }

    #[test]
    fn mask_sensitive_handles_multibyte_input() {
        // Must not split a UTF-8 sequence.
        let masked = mask_sensitive("ääääbbbbcccc");
        assert_eq!(masked, "ääää...cccc");
    }

    #[test]
    fn mask_json_secrets_masks_nested_passwords() {
        let mut doc = json!({
            "personalInfo": { "fullName": "Jane Doe" },
            "account": { "username": "jdoe", "password": "hunter22", "confirm_password": "hunter22" },
            "history": [ { "pwd": "old" } ]
        });
        mask_json_secrets(&mut doc);

        let rendered = doc.to_string();
        assert!(!rendered.contains("hunter22"), "Raw password leaked: {}", rendered);
        assert!(!rendered.contains("\"old\""), "Raw password leaked: {}", rendered);
        assert_eq!(doc["account"]["password"], "***");
        assert_eq!(doc["account"]["username"], "jdoe");
        assert_eq!(doc["personalInfo"]["fullName"], "Jane Doe");
    }

    // -------------------------------------------------------------------------
    // Metadata tags
    // -------------------------------------------------------------------------

    #[test]
    fn parse_log_metadata_extracts_phase_and_step() {
        let (phase, step, msg) =
            parse_log_metadata("[PHASE: wizard] [STEP: advance] moved to address");
        assert_eq!(phase.as_deref(), Some("wizard"));
        assert_eq!(step.as_deref(), Some("advance"));
        assert_eq!(msg, "moved to address");
    }

    #[test]
    fn parse_log_metadata_without_tags_is_passthrough() {
        let (phase, step, msg) = parse_log_metadata("plain message");
        assert!(phase.is_none());
        assert!(step.is_none());
        assert_eq!(msg, "plain message");
    }

    #[test]
    fn format_json_log_includes_optional_fields() {
        let line = format_json_log(
            "2024-01-01T00:00:00Z",
            Level::Info,
            "stepform",
            "hello",
            Some("wizard"),
            None,
        );
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["level"], "INFO");
        assert_eq!(v["phase"], "wizard");
        assert!(v.get("step").is_none());
    }

    #[test]
    fn format_human_readable_log_layout() {
        let line = format_human_readable_log(
            "2024-01-01 00:00:00.000",
            Level::Warn,
            "stepform::tui",
            "careful",
            Some("tui"),
            Some("key"),
        );
        assert_eq!(
            line,
            "[2024-01-01 00:00:00.000] [WARN] [PHASE: tui] [STEP: key] [stepform::tui] careful"
        );
    }
}

// Non-interactive submission smoke
//
// Drives the wizard through a blocked advance, the happy path and a submit, using a collecting
// sink. Writes `stepform_submission_smoke_transcript.log` under the log folder.

use crate::form::{
    AdvanceOutcome, ChangeOutcome, FieldId, MemorySubmissionSink, Step, WizardController,
    WizardState,
};
use crate::models::submission::FinalizedSubmission;
use crate::utils::logging::mask_sensitive;
use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub const TRANSCRIPT_FILE: &str = "stepform_submission_smoke_transcript.log";

/// Fixed inputs so transcripts are comparable between runs.
pub const HAPPY_PATH: [(FieldId, &str); 9] = [
    (FieldId::FullName, "Ada Lovelace"),
    (FieldId::Email, "ada@example.com"),
    (FieldId::PhoneNumber, "5551234567"),
    (FieldId::StreetAddress, "12 Analytical Row"),
    (FieldId::City, "London"),
    (FieldId::ZipCode, "10101"),
    (FieldId::Username, "ada_l"),
    (FieldId::Password, "engine1"),
    (FieldId::ConfirmPassword, "engine1"),
];

/// Returns the transcript path. The transcript is written even when the run fails.
pub fn submission_smoke(log_dir: &Path) -> Result<PathBuf> {
    let started = Instant::now();
    let transcript_path = log_dir.join(TRANSCRIPT_FILE);

    let mut transcript = String::new();
    let mut push = |line: String| {
        transcript.push_str(&line);
        transcript.push('\n');
    };

    push("SUBMISSION_SMOKE begin".to_string());
    push(format!("log_dir={}", log_dir.to_string_lossy()));

    let sink = MemorySubmissionSink::new();
    let mut wizard = WizardController::new(Arc::new(sink.clone()));
    let result = drive(&mut wizard, &mut push).and_then(|record| {
        let stored = sink.records();
        anyhow::ensure!(
            stored.len() == 1 && stored[0] == record,
            "sink received {} records, expected exactly the submitted one",
            stored.len()
        );
        Ok(record)
    });

    match &result {
        Ok(record) => {
            push(format!(
                "EVENT submitted username={} password={}",
                record.account.username,
                mask_sensitive(&record.account.password)
            ));
            push("result=ok".to_string());
        }
        Err(e) => push(format!("result=err error={:#}", e)),
    }
    push(format!(
        "SUBMISSION_SMOKE end elapsed_ms={}",
        started.elapsed().as_millis()
    ));
    push(format!("ExitCode={}", if result.is_ok() { 0 } else { 1 }));

    std::fs::write(&transcript_path, transcript)
        .with_context(|| format!("Failed to write transcript: {:?}", transcript_path))?;
    info!(
        "[PHASE: smoke] [STEP: submission] Wrote transcript to {:?}",
        transcript_path
    );

    result.map(|_| transcript_path)
}

fn drive(
    wizard: &mut WizardController,
    push: &mut impl FnMut(String),
) -> Result<FinalizedSubmission> {
    // An empty first page must not advance.
    match wizard.advance()? {
        AdvanceOutcome::Blocked(failing) => push(format!(
            "EVENT blocked page={} failing={}",
            Step::PersonalInfo.number(),
            failing.iter().map(|f| f.key()).collect::<Vec<_>>().join(",")
        )),
        other => anyhow::bail!("empty first page was not blocked: {:?}", other),
    }

    for step in Step::FORMS {
        for (field, value) in HAPPY_PATH.iter().filter(|(f, _)| f.step() == step) {
            match wizard.handle_change(*field, *value)? {
                ChangeOutcome::Accepted(_) => {}
                ChangeOutcome::Rejected => anyhow::bail!("input for {} was rejected", field),
            }
        }
        match wizard.advance()? {
            AdvanceOutcome::Advanced(next) => {
                push(format!("EVENT advanced from={} to={}", step.number(), next.number()))
            }
            other => anyhow::bail!("page {} did not advance: {:?}", step, other),
        }
    }

    anyhow::ensure!(
        wizard.state() == WizardState::Editing(Step::Summary),
        "expected the summary page, found {:?}",
        wizard.state()
    );

    let record = match wizard.advance()? {
        AdvanceOutcome::Submitted(record) => record,
        other => anyhow::bail!("summary page did not submit: {:?}", other),
    };
    anyhow::ensure!(wizard.is_submitted(), "wizard did not enter the submitted state");
    Ok(record)
}

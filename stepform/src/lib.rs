// Stepform: multi-step registration wizard
// Main library entry point

pub mod config;
pub mod form;
pub mod models;
mod smoke;
pub mod theme;
pub mod tui;
pub(crate) mod utils;

use config::AppConfig;
use log::{error, info};
use std::path::PathBuf;
use theme::{JsonFilePreferenceStore, SystemThemeSignal, ThemeController};

/// Initialize logging system with dual format (JSON + human-readable)
fn init_logging(with_stdout: bool, config: &AppConfig) -> anyhow::Result<PathBuf> {
    let log_dir = utils::path_resolver::resolve_log_folder(config.log_dir.as_deref())?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S");

    // JSON log file for structured parsing
    let json_log_file = log_dir.join(format!("stepform-{}.log", timestamp));

    // Human-readable log file (.txt)
    let txt_log_file = log_dir.join(format!("stepform-{}.txt", timestamp));

    // stdout stays off in interactive mode so the terminal UI is not corrupted.
    let mut dispatch = fern::Dispatch::new().level(config.log_level_filter());

    if with_stdout {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let txt_line = utils::logging::format_human_readable_log(
                        &timestamp_local.to_string(),
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}", txt_line));
                })
                .chain(std::io::stdout()),
        );
    }

    dispatch = dispatch
        .chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_utc = chrono::Utc::now().to_rfc3339();
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let json_line = utils::logging::format_json_log(
                        &timestamp_utc,
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", json_line));
                })
                .chain(fern::log_file(&json_log_file)?),
        )
        .chain(
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let message_str = format!("{}", message);
                    let (phase, step, cleaned_message) =
                        utils::logging::parse_log_metadata(&message_str);
                    let txt_line = utils::logging::format_human_readable_log(
                        &timestamp_local.to_string(),
                        record.level(),
                        record.target(),
                        &cleaned_message,
                        phase.as_deref(),
                        step.as_deref(),
                    );
                    out.finish(format_args!("{}\n", txt_line));
                })
                .chain(fern::log_file(&txt_log_file)?),
        );

    dispatch.apply()?;

    log::info!(
        "[PHASE: initialization] Logging initialized, log directory: {:?}",
        log_dir
    );
    Ok(log_dir)
}

/// Load configuration; a broken config file is reported and defaults are used.
fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {:#}", e);
            AppConfig::default()
        }
    }
}

fn start(mode: &str, with_stdout: bool) -> (AppConfig, Option<PathBuf>) {
    let config = load_config();
    let log_dir = match init_logging(with_stdout, &config) {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            None
        }
    };

    info!(
        "[PHASE: initialization] {} starting at {}",
        mode,
        chrono::Utc::now()
    );
    info!(
        "[PHASE: initialization] [STEP: deployment_folder] Deployment folder: {:?}",
        utils::path_resolver::resolve_deployment_folder()
    );
    (config, log_dir)
}

fn load_theme(config: &AppConfig) -> ThemeController {
    let prefs_path =
        utils::path_resolver::resolve_preferences_path(config.preferences_path.as_deref());
    info!(
        "[PHASE: initialization] [STEP: preferences] Preferences file: {:?}",
        prefs_path
    );
    ThemeController::load(
        Box::new(JsonFilePreferenceStore::new(prefs_path)),
        &SystemThemeSignal::from_config(config),
    )
}

/// Interactive terminal wizard.
pub fn run_tui() {
    // Initialize logging (no stdout to avoid corrupting the TUI)
    let (config, _) = start("Terminal wizard", false);
    let theme = load_theme(&config);

    if let Err(e) = tui::run(theme) {
        error!("[PHASE: tui] [STEP: fatal] TUI exited with error: {:?}", e);
        eprintln!("Stepform error: {}", e);
        std::process::exit(1);
    }
}

/// Non-interactive TUI smoke mode (for automated checks).
/// Renders a single frame of a seeded page into an in-memory backend and exits 0/1.
pub fn run_tui_smoke(target: Option<String>) {
    let (config, _) = start("TUI smoke", false);
    let theme = load_theme(&config);

    let target = target.as_deref().unwrap_or("personal");
    if let Err(e) = tui::smoke(theme, target) {
        error!(
            "[PHASE: tui] [STEP: smoke] TUI smoke exited with error: {:?}",
            e
        );
        eprintln!("Stepform error: {}", e);
        std::process::exit(1);
    }
}

/// Non-interactive submission smoke (for automated verification / log capture).
/// Writes a transcript under the log folder and exits 0/1.
pub fn run_submission_smoke() {
    let (config, log_dir) = start("Submission smoke", true);

    let log_dir = match log_dir {
        Some(dir) => dir,
        None => match utils::path_resolver::resolve_log_folder(config.log_dir.as_deref()) {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Stepform error: {:#}", e);
                std::process::exit(1);
            }
        },
    };

    match smoke::submission_smoke(&log_dir) {
        Ok(path) => {
            info!(
                "[PHASE: smoke] [STEP: submission] Submission smoke passed, transcript: {:?}",
                path
            );
        }
        Err(e) => {
            error!(
                "[PHASE: smoke] [STEP: submission] Submission smoke failed: {:?}",
                e
            );
            eprintln!("Stepform error: {:#}", e);
            std::process::exit(1);
        }
    }
}

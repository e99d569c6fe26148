use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "stepform";

/// Resolve deployment folder (absolute path)
pub fn resolve_deployment_folder() -> PathBuf {
    // Prefer the folder where the binary is running from
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(dir) = exe_path.parent() {
            return dir.to_path_buf();
        }
    }

    // Fallback: current working directory
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Per-user configuration folder (`<config_dir>/stepform`). Not created here.
pub fn resolve_config_folder() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR),
        None => resolve_deployment_folder(),
    }
}

/// Resolve log folder (absolute path), creating it if needed.
///
/// An explicit override wins; otherwise `<data_local_dir>/stepform/logs`, falling back to a
/// `logs/` folder next to the binary.
pub fn resolve_log_folder(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match override_dir {
        Some(p) => p.to_path_buf(),
        None => match dirs::data_local_dir() {
            Some(base) => base.join(APP_DIR).join("logs"),
            None => resolve_deployment_folder().join("logs"),
        },
    };

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log folder: {:?}", dir))?;
    Ok(dir)
}

/// Location of the theme preference file.
pub fn resolve_preferences_path(override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(p) => p.to_path_buf(),
        None => resolve_config_folder().join("preferences.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_folder_override_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let wanted = tmp.path().join("nested").join("logs");
        let got = resolve_log_folder(Some(&wanted)).unwrap();
        assert_eq!(got, wanted);
        assert!(wanted.is_dir());
    }

    #[test]
    fn preferences_override_wins() {
        let p = PathBuf::from("/tmp/custom-prefs.json");
        assert_eq!(resolve_preferences_path(Some(&p)), p);
        assert!(resolve_preferences_path(None).ends_with("preferences.json"));
    }
}

// Theme preference persistence
//
// A tiny key-value store holding one boolean under a fixed key. The form core never depends on
// it; only the front-end reads it at startup and writes it on toggle.

use anyhow::{Context, Result};
use log::debug;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Mutex;

pub const DARK_MODE_KEY: &str = "darkMode";

pub trait PreferenceStore: Send {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<bool>>;
    fn write(&self, dark_mode: bool) -> Result<()>;
}

/// JSON document on disk, e.g. `{ "darkMode": true }`. Unknown keys are preserved on write.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences file: {:?}", self.path))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        let doc: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Preferences file is not valid JSON: {:?}", self.path))?;
        match doc {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("Preferences file must contain a JSON object: {:?}", self.path),
        }
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn read(&self) -> Result<Option<bool>> {
        let doc = self.load_document()?;
        // Older files stored the flag as a string.
        let value = match doc.get(DARK_MODE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => Some(s.trim() == "true"),
            Some(other) => anyhow::bail!(
                "Preference {} has unexpected value {} in {:?}",
                DARK_MODE_KEY,
                other,
                self.path
            ),
        };
        Ok(value)
    }

    fn write(&self, dark_mode: bool) -> Result<()> {
        // A corrupt file is replaced rather than blocking the toggle forever.
        let mut doc = self.load_document().unwrap_or_default();
        doc.insert(DARK_MODE_KEY.to_string(), Value::Bool(dark_mode));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create preferences folder: {:?}", parent))?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(doc))
            .context("Failed to serialize preferences")?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("Failed to write preferences file: {:?}", self.path))?;

        debug!(
            "[PHASE: theme] [STEP: persist] {}={} written to {:?}",
            DARK_MODE_KEY, dark_mode, self.path
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    value: Mutex<Option<bool>>,
}

impl InMemoryPreferenceStore {
    pub fn new(initial: Option<bool>) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn read(&self) -> Result<Option<bool>> {
        let guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("Preference store lock poisoned"))?;
        Ok(*guard)
    }

    fn write(&self, dark_mode: bool) -> Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("Preference store lock poisoned"))?;
        *guard = Some(dark_mode);
        Ok(())
    }
}

//! Light/dark theme state for the terminal front-end.
//!
//! The stored preference wins; with nothing stored the system signal decides. Toggling flips the
//! mode and persists it. Persistence failures are logged and never block the toggle.

mod store;

pub use store::{InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceStore, DARK_MODE_KEY};

use crate::config::AppConfig;
use log::{info, warn};
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Where "the system prefers dark" comes from when no preference is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemThemeSignal {
    /// Explicit value (configuration or tests).
    Fixed(bool),
    /// Derived from the terminal's `COLORFGBG` hint; light when absent.
    Terminal,
}

impl SystemThemeSignal {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.system_dark_mode {
            Some(dark) => SystemThemeSignal::Fixed(dark),
            None => SystemThemeSignal::Terminal,
        }
    }

    pub fn prefers_dark(&self) -> bool {
        match self {
            SystemThemeSignal::Fixed(dark) => *dark,
            SystemThemeSignal::Terminal => std::env::var("COLORFGBG")
                .ok()
                .and_then(|v| colorfgbg_prefers_dark(&v))
                .unwrap_or(false),
        }
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). Backgrounds 0-6 and 8 are dark ANSI colours.
pub fn colorfgbg_prefers_dark(value: &str) -> Option<bool> {
    let bg = value.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(bg < 7 || bg == 8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub primary: Color,
    pub error: Color,
    pub success: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(0xF9, 0xFA, 0xFB),
        surface: Color::Rgb(0xFF, 0xFF, 0xFF),
        text: Color::Rgb(0x1F, 0x29, 0x37),
        muted: Color::Rgb(0x6B, 0x72, 0x80),
        primary: Color::Rgb(0x25, 0x63, 0xEB),
        error: Color::Rgb(0xDC, 0x26, 0x26),
        success: Color::Rgb(0x16, 0xA3, 0x4A),
    };

    pub const DARK: Palette = Palette {
        background: Color::Rgb(0x11, 0x18, 0x27),
        surface: Color::Rgb(0x1F, 0x29, 0x37),
        text: Color::Rgb(0xF3, 0xF4, 0xF6),
        muted: Color::Rgb(0x9C, 0xA3, 0xAF),
        primary: Color::Rgb(0x60, 0xA5, 0xFA),
        error: Color::Rgb(0xF8, 0x71, 0x71),
        success: Color::Rgb(0x4A, 0xDE, 0x80),
    };

    pub fn for_mode(mode: ThemeMode) -> Palette {
        match mode {
            ThemeMode::Light => Palette::LIGHT,
            ThemeMode::Dark => Palette::DARK,
        }
    }
}

pub struct ThemeController {
    mode: ThemeMode,
    store: Box<dyn PreferenceStore>,
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl ThemeController {
    pub fn load(store: Box<dyn PreferenceStore>, signal: &SystemThemeSignal) -> Self {
        let dark = match store.read() {
            Ok(Some(stored)) => stored,
            Ok(None) => signal.prefers_dark(),
            Err(e) => {
                warn!(
                    "[PHASE: theme] [STEP: load] Stored preference unreadable, using system signal: {:#}",
                    e
                );
                signal.prefers_dark()
            }
        };
        let mode = ThemeMode::from_dark(dark);
        info!("[PHASE: theme] [STEP: load] Theme mode: {}", mode.label());
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode)
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        if let Err(e) = self.store.write(self.mode.is_dark()) {
            warn!(
                "[PHASE: theme] [STEP: persist] Failed to persist theme preference: {:#}",
                e
            );
        }
        info!("[PHASE: theme] [STEP: toggle] Theme mode: {}", self.mode.label());
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::Arc;

    /// Shares its state so the test can inspect writes after the controller takes ownership.
    struct SharedStore(Arc<InMemoryPreferenceStore>);

    impl PreferenceStore for SharedStore {
        fn read(&self) -> Result<Option<bool>> {
            self.0.read()
        }
        fn write(&self, dark_mode: bool) -> Result<()> {
            self.0.write(dark_mode)
        }
    }

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn read(&self) -> Result<Option<bool>> {
            anyhow::bail!("storage unavailable")
        }
        fn write(&self, _dark_mode: bool) -> Result<()> {
            anyhow::bail!("storage unavailable")
        }
    }

    #[test]
    fn stored_preference_beats_system_signal() {
        let store = Box::new(InMemoryPreferenceStore::new(Some(false)));
        let theme = ThemeController::load(store, &SystemThemeSignal::Fixed(true));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn system_signal_used_when_nothing_stored() {
        let store = Box::new(InMemoryPreferenceStore::new(None));
        let theme = ThemeController::load(store, &SystemThemeSignal::Fixed(true));
        assert!(theme.is_dark());
        assert_eq!(theme.palette(), Palette::DARK);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let shared = Arc::new(InMemoryPreferenceStore::new(None));
        let mut theme = ThemeController::load(
            Box::new(SharedStore(shared.clone())),
            &SystemThemeSignal::Fixed(false),
        );
        assert_eq!(theme.toggle(), ThemeMode::Dark);
        assert_eq!(shared.read().unwrap(), Some(true));
        assert_eq!(theme.toggle(), ThemeMode::Light);
        assert_eq!(shared.read().unwrap(), Some(false));
    }

    #[test]
    fn broken_store_falls_back_and_still_toggles() {
        let mut theme = ThemeController::load(Box::new(BrokenStore), &SystemThemeSignal::Fixed(true));
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert_eq!(theme.toggle(), ThemeMode::Light);
    }

    #[test]
    fn file_store_survives_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");

        let mut first = ThemeController::load(
            Box::new(JsonFilePreferenceStore::new(&path)),
            &SystemThemeSignal::Fixed(false),
        );
        first.toggle();

        let second = ThemeController::load(
            Box::new(JsonFilePreferenceStore::new(&path)),
            &SystemThemeSignal::Fixed(false),
        );
        assert!(second.is_dark());
    }

    #[test]
    fn colorfgbg_hint_parsing() {
        assert_eq!(colorfgbg_prefers_dark("15;0"), Some(true));
        assert_eq!(colorfgbg_prefers_dark("0;15"), Some(false));
        assert_eq!(colorfgbg_prefers_dark("12;default;8"), Some(true));
        assert_eq!(colorfgbg_prefers_dark("0;7"), Some(false));
        assert_eq!(colorfgbg_prefers_dark("garbage"), None);
    }

    #[test]
    fn system_signal_from_config() {
        let cfg = AppConfig {
            system_dark_mode: Some(true),
            ..AppConfig::default()
        };
        assert_eq!(SystemThemeSignal::from_config(&cfg), SystemThemeSignal::Fixed(true));
        assert_eq!(
            SystemThemeSignal::from_config(&AppConfig::default()),
            SystemThemeSignal::Terminal
        );
    }
}

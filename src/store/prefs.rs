use color_eyre::eyre::Result;
use std::{fmt, str::FromStr};

use super::{Storage, SHOW_ONLY_SAVED_KEY, THEME_KEY};

/// The rendered color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Load the stored preference, defaulting to light for anything absent
    /// or unrecognized.
    pub fn load(storage: &Storage) -> Theme {
        storage
            .get(THEME_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }

    pub fn store(self, storage: &Storage) -> Result<()> {
        storage.set(THEME_KEY, self.name())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Persisted view state that survives between runs but is cleared on sign-out.
#[derive(Debug, Default)]
pub struct ViewState {
    pub show_only_saved: bool,
}

impl ViewState {
    pub fn load(storage: &Storage) -> ViewState {
        ViewState {
            show_only_saved: storage
                .get(SHOW_ONLY_SAVED_KEY)
                .map_or(false, |raw| raw.trim() == "true"),
        }
    }

    pub fn set_show_only_saved(&mut self, storage: &Storage, show: bool) -> Result<()> {
        self.show_only_saved = show;
        if show {
            storage.set(SHOW_ONLY_SAVED_KEY, "true")
        } else {
            storage.remove(SHOW_ONLY_SAVED_KEY)
        }
    }
}

//! Theme modes and resolved color schemes.
//!
//! [`ThemeMode`] is what the user picks and what gets persisted. `Auto` is a
//! resolution strategy, not a visual state: it is turned into a concrete
//! [`ColorScheme`] from the OS preference whenever something has to be drawn.
//! Only `ColorScheme` values are ever written to the DOM.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The user's theme choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    /// Follow the OS color-scheme preference.
    Auto,
}

impl ThemeMode {
    /// Resolves the mode against an OS preference.
    ///
    /// `prefers_dark` is `None` when no OS preference can be queried; auto
    /// mode then falls back to light.
    pub fn resolve(self, prefers_dark: Option<bool>) -> ColorScheme {
        match self {
            ThemeMode::Light => ColorScheme::Light,
            ThemeMode::Dark => ColorScheme::Dark,
            ThemeMode::Auto => {
                if prefers_dark.unwrap_or(false) {
                    ColorScheme::Dark
                } else {
                    ColorScheme::Light
                }
            }
        }
    }

    /// The mode `toggle_mode` moves to.
    ///
    /// Auto counts as light here, so toggling from auto always lands on dark.
    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light | ThemeMode::Auto => ThemeMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "auto" | "system" => Ok(ThemeMode::Auto),
            other => Err(format!("unknown theme mode '{}'", other)),
        }
    }
}

impl From<ColorScheme> for ThemeMode {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => ThemeMode::Light,
            ColorScheme::Dark => ThemeMode::Dark,
        }
    }
}

/// A concrete, drawable color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Value written to the `data-theme` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

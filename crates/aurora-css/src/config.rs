//! Utility generation configuration.
//!
//! [`UtilityConfig`] selects which utility categories are emitted, the class
//! prefix, an optional custom spacing scale and whether responsive variants
//! are added. It can be built in code or loaded from YAML / JSON:
//!
//! ```rust
//! use aurora_css::UtilityConfig;
//!
//! let config = UtilityConfig::from_yaml(r#"
//! prefix: app
//! generate_borders: false
//! custom_spacing:
//!   sm: 0.5rem
//!   lg: 2rem
//! "#).unwrap();
//!
//! assert_eq!(config.prefix, "app");
//! assert!(!config.generate_border_colors);
//! ```
//!
//! Missing fields take their defaults, so partial files are fine.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tokens::{spacing_step_value, DEFAULT_SPACING_STEPS};

/// Default class prefix.
pub const DEFAULT_PREFIX: &str = "aurora";

/// Ordered spacing scale: key used in class names → CSS length.
pub type SpacingScale = IndexMap<String, String>;

/// Which utilities to generate and how to name them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityConfig {
    /// Class name prefix (`<prefix>-bg-primary`).
    pub prefix: String,
    #[serde(alias = "backgrounds")]
    pub generate_backgrounds: bool,
    #[serde(alias = "text_colors")]
    pub generate_text_colors: bool,
    #[serde(alias = "generate_borders", alias = "borders")]
    pub generate_border_colors: bool,
    #[serde(alias = "spacing")]
    pub generate_spacing: bool,
    /// Replaces the default spacing scale when set.
    pub custom_spacing: Option<SpacingScale>,
    #[serde(alias = "responsive")]
    pub include_responsive: bool,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl UtilityConfig {
    /// All four categories enabled, default spacing, no responsive variants.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            generate_backgrounds: true,
            generate_text_colors: true,
            generate_border_colors: true,
            generate_spacing: true,
            custom_spacing: None,
            include_responsive: false,
        }
    }

    pub fn backgrounds(mut self, enabled: bool) -> Self {
        self.generate_backgrounds = enabled;
        self
    }

    pub fn text_colors(mut self, enabled: bool) -> Self {
        self.generate_text_colors = enabled;
        self
    }

    pub fn border_colors(mut self, enabled: bool) -> Self {
        self.generate_border_colors = enabled;
        self
    }

    pub fn spacing(mut self, enabled: bool) -> Self {
        self.generate_spacing = enabled;
        self
    }

    pub fn responsive(mut self, enabled: bool) -> Self {
        self.include_responsive = enabled;
        self
    }

    /// Replaces the spacing scale. Entry order is preserved in the output.
    pub fn custom_spacing<I, K, V>(mut self, scale: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_spacing = Some(
            scale
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// The spacing scale in effect: the custom one if set, else the default.
    pub fn spacing_scale(&self) -> SpacingScale {
        match &self.custom_spacing {
            Some(scale) => scale.clone(),
            None => default_spacing_scale(),
        }
    }

    /// Checks that the prefix can start a CSS class name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self
            .prefix
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false)
            && self
                .prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidPrefix(self.prefix.clone()))
        }
    }

    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing the format by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let parsed = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        parsed.map_err(|err| match err {
            ConfigError::Yaml { message, .. } => ConfigError::Yaml {
                path: Some(path.to_path_buf()),
                message,
            },
            ConfigError::Json { message, .. } => ConfigError::Json {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }
}

/// The default spacing scale: `0` to `24` in quarter-rem steps.
pub fn default_spacing_scale() -> SpacingScale {
    DEFAULT_SPACING_STEPS
        .iter()
        .map(|step| (step.to_string(), spacing_step_value(*step)))
        .collect()
}

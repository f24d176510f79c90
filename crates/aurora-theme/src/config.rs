//! Theme configuration values.
//!
//! [`ThemeConfig`] is the state the provider owns and the shape persisted
//! under the storage key:
//!
//! ```json
//! { "mode": "auto", "colors": { "primary": "#6750a4" }, "customProperties": { "--radius": "8px" } }
//! ```
//!
//! Configs are never mutated in place by consumers. A [`ThemeUpdate`] (every
//! field optional) is shallow-merged into the current config to produce the
//! next one: fields present in the update replace the old value wholesale,
//! absent fields are kept.
//!
//! Stored data has no version field. Decoding is lenient: unknown modes,
//! non-string map values and unknown keys are dropped rather than failing the
//! whole document, so older or newer shapes degrade to "use the default for
//! that field".

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::mode::{ColorScheme, ThemeMode};

/// Ordered CSS property map (key → CSS value).
pub type PropertyMap = IndexMap<String, String>;

/// The complete theme state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    /// Written as `--color-<key>` custom properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<PropertyMap>,
    /// Written verbatim as custom property names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_properties: Option<PropertyMap>,
}

impl ThemeConfig {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            colors: None,
            custom_properties: None,
        }
    }

    pub fn light() -> Self {
        Self::new(ThemeMode::Light)
    }

    pub fn dark() -> Self {
        Self::new(ThemeMode::Dark)
    }

    pub fn auto() -> Self {
        Self::new(ThemeMode::Auto)
    }

    /// Adds one color override, returning `self` for chaining.
    pub fn with_color(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Adds one custom property, returning `self` for chaining.
    pub fn with_custom_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_properties
            .get_or_insert_with(PropertyMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Shallow merge: fields set in `update` win.
    pub fn merge(&self, update: &ThemeUpdate) -> ThemeConfig {
        ThemeConfig {
            mode: update.mode.unwrap_or(self.mode),
            colors: update.colors.clone().or_else(|| self.colors.clone()),
            custom_properties: update
                .custom_properties
                .clone()
                .or_else(|| self.custom_properties.clone()),
        }
    }

    /// Resolves the mode against an OS preference.
    pub fn scheme(&self, prefers_dark: Option<bool>) -> ColorScheme {
        self.mode.resolve(prefers_dark)
    }
}

/// A partial [`ThemeConfig`], used for mutations and for decoded storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeUpdate {
    #[serde(
        deserialize_with = "lenient_mode",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<ThemeMode>,
    #[serde(
        deserialize_with = "lenient_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub colors: Option<PropertyMap>,
    #[serde(
        deserialize_with = "lenient_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_properties: Option<PropertyMap>,
}

impl ThemeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// An update that only changes the mode.
    pub fn mode(mode: ThemeMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ThemeMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Replaces the whole color map.
    pub fn with_colors<I, K, V>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.colors = Some(collect_map(colors));
        self
    }

    /// Replaces the whole custom property map.
    pub fn with_custom_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.custom_properties = Some(collect_map(properties));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.colors.is_none() && self.custom_properties.is_none()
    }
}

impl From<ThemeConfig> for ThemeUpdate {
    fn from(config: ThemeConfig) -> Self {
        Self {
            mode: Some(config.mode),
            colors: config.colors,
            custom_properties: config.custom_properties,
        }
    }
}

impl From<ThemeMode> for ThemeUpdate {
    fn from(mode: ThemeMode) -> Self {
        ThemeUpdate::mode(mode)
    }
}

fn collect_map<I, K, V>(entries: I) -> PropertyMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn lenient_mode<'de, D>(deserializer: D) -> Result<Option<ThemeMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.as_str().and_then(|s| s.parse().ok())))
}

fn lenient_map<'de, D>(deserializer: D) -> Result<Option<PropertyMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::Object(entries) => Some(
            entries
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect(),
        ),
        _ => None,
    }))
}

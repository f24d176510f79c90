//! Provider options as data.
//!
//! [`ThemeSettings`] is the serializable subset of [`ThemeOptions`]: what an
//! application would keep in a config file. Live objects (a custom storage,
//! a custom target) cannot be expressed in a file, so storage is picked by
//! [`StorageKind`] and the target is always the environment's root element.
//!
//! ```yaml
//! storage_key: my-app-theme
//! storage: file
//! storage_dir: ~/.config/my-app
//! css_variables_prefix: app
//! auto_global_styles: true
//! generate_utilities: true
//! default_theme:
//!   mode: auto
//!   colors:
//!     primary: "#6750a4"
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use aurora_css::{ConfigError, UtilityConfig, DEFAULT_PREFIX};
use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;
use crate::environment::Environment;
use crate::provider::{ThemeOptions, DEFAULT_STORAGE_KEY};
use crate::storage::{FileStorage, MemoryStorage, NoopStorage};

/// Errors raised while loading [`ThemeSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse YAML settings{}: {message}", location(.path))]
    Yaml {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Failed to parse JSON settings{}: {message}", location(.path))]
    Json {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Unsupported settings format for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Storage key must not be empty")]
    EmptyStorageKey,

    /// `storage: file` without a `storage_dir`.
    #[error("File storage requires storage_dir")]
    MissingStorageDir,

    #[error(transparent)]
    Prefix(#[from] ConfigError),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Which storage adapter the provider persists to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// The environment's persistent storage.
    #[default]
    Persistent,
    /// The environment's session storage.
    Session,
    /// A private in-memory store.
    Memory,
    /// JSON files under `storage_dir`.
    File,
    /// No persistence.
    None,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Persistent => "persistent",
            StorageKind::Session => "session",
            StorageKind::Memory => "memory",
            StorageKind::File => "file",
            StorageKind::None => "none",
        };
        f.write_str(name)
    }
}

/// Serializable provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub storage_key: String,
    pub storage: StorageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    #[serde(alias = "prefix")]
    pub css_variables_prefix: String,
    pub auto_global_styles: bool,
    pub generate_utilities: bool,
    pub default_theme: ThemeConfig,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage: StorageKind::default(),
            storage_dir: None,
            css_variables_prefix: DEFAULT_PREFIX.to_string(),
            auto_global_styles: false,
            generate_utilities: false,
            default_theme: ThemeConfig::default(),
        }
    }
}

impl ThemeSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.storage_key.trim().is_empty() {
            return Err(SettingsError::EmptyStorageKey);
        }
        if self.storage == StorageKind::File && self.storage_dir.is_none() {
            return Err(SettingsError::MissingStorageDir);
        }
        UtilityConfig::new(self.css_variables_prefix.clone()).validate()?;
        Ok(())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_yaml::from_str(yaml).map_err(|e| SettingsError::Yaml {
            path: None,
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json).map_err(|e| SettingsError::Json {
            path: None,
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
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
            _ => return Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        };

        parsed.map_err(|err| match err {
            SettingsError::Yaml { message, .. } => SettingsError::Yaml {
                path: Some(path.to_path_buf()),
                message,
            },
            SettingsError::Json { message, .. } => SettingsError::Json {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Builds provider options for `environment`.
    pub fn into_options(self, environment: Environment) -> Result<ThemeOptions, SettingsError> {
        self.validate()?;

        let mut options = ThemeOptions::new(environment)
            .default_theme(self.default_theme)
            .storage_key(self.storage_key)
            .auto_global_styles(self.auto_global_styles)
            .generate_utilities(self.generate_utilities)
            .css_variables_prefix(self.css_variables_prefix);

        options = match self.storage {
            StorageKind::Persistent => options,
            StorageKind::Session => {
                let session = options.environment.session_storage();
                options.storage(session)
            }
            StorageKind::Memory => options.storage(Rc::new(MemoryStorage::new())),
            StorageKind::File => match self.storage_dir {
                Some(dir) => options.storage(Rc::new(FileStorage::new(dir))),
                None => return Err(SettingsError::MissingStorageDir),
            },
            StorageKind::None => options.storage(Rc::new(NoopStorage)),
        };
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MemoryDocument;
    use crate::mode::ThemeMode;
    use crate::storage::ThemeStorage;

    #[test]
    fn defaults_match_provider_defaults() {
        let settings = ThemeSettings::default();
        assert_eq!(settings.storage_key, "aurora-ui-theme");
        assert_eq!(settings.css_variables_prefix, "aurora");
        assert_eq!(settings.storage, StorageKind::Persistent);
        assert!(!settings.generate_utilities);
    }

    #[test]
    fn parses_yaml() {
        let settings = ThemeSettings::from_yaml(
            r##"
storage_key: app-theme
storage: session
prefix: app
generate_utilities: true
default_theme:
  mode: dark
  customProperties:
    "--radius": 8px
"##,
        )
        .unwrap();
        assert_eq!(settings.storage_key, "app-theme");
        assert_eq!(settings.storage, StorageKind::Session);
        assert_eq!(settings.css_variables_prefix, "app");
        assert_eq!(settings.default_theme.mode, ThemeMode::Dark);
        assert_eq!(
            settings.default_theme.custom_properties.unwrap()["--radius"],
            "8px"
        );
    }

    #[test]
    fn parses_json() {
        let settings =
            ThemeSettings::from_json(r#"{"storage":"none","auto_global_styles":true}"#).unwrap();
        assert_eq!(settings.storage, StorageKind::None);
        assert!(settings.auto_global_styles);
    }

    #[test]
    fn rejects_invalid_prefix() {
        let err = ThemeSettings::from_yaml("prefix: 9lives").unwrap_err();
        assert!(matches!(err, SettingsError::Prefix(ConfigError::InvalidPrefix(_))));
    }

    #[test]
    fn file_storage_needs_dir() {
        let err = ThemeSettings::from_yaml("storage: file").unwrap_err();
        assert!(matches!(err, SettingsError::MissingStorageDir));
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("theme.yaml");
        std::fs::write(&path, "storage: [oops").unwrap();

        let err = ThemeSettings::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("theme.yaml"));
    }

    #[test]
    fn from_file_rejects_unknown_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("theme.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            ThemeSettings::from_file(&path),
            Err(SettingsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn session_kind_uses_environment_session_storage() {
        let doc = MemoryDocument::new();
        let settings = ThemeSettings {
            storage: StorageKind::Session,
            ..ThemeSettings::default()
        };
        let options = settings.into_options(doc.environment()).unwrap();
        options
            .resolved_storage()
            .set_theme("k", &ThemeConfig::dark())
            .unwrap();
        assert_eq!(doc.session.write_count(), 1);
        assert_eq!(doc.storage.write_count(), 0);
    }

    #[test]
    fn file_kind_writes_into_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = ThemeSettings {
            storage: StorageKind::File,
            storage_dir: Some(dir.path().to_path_buf()),
            ..ThemeSettings::default()
        };
        let options = settings.into_options(MemoryDocument::new().environment()).unwrap();
        options
            .resolved_storage()
            .set_theme(&options.storage_key, &ThemeConfig::auto())
            .unwrap();
        assert!(dir.path().join("aurora-ui-theme.json").exists());
    }
}

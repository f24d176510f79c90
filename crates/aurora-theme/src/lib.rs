//! # Aurora Theme - Flicker-Free Theme State for Aurora UI
//!
//! `aurora-theme` owns the light/dark/auto theme of an Aurora UI application:
//! it restores the persisted choice before the first paint, keeps the root
//! element's `data-theme` attribute and custom properties in sync, follows the
//! OS preference in auto mode, and injects the stylesheets generated by
//! [`aurora_css`].
//!
//! ## Core Concepts
//!
//! - [`ThemeProvider`]: owns the state and the DOM synchronization effects
//! - [`ThemeContext`] / [`use_theme`]: read and change the theme
//! - [`Environment`]: headless, or a document with its storage, root element,
//!   `<head>` and OS preference
//! - [`ThemeStorage`], [`ThemeTarget`], [`StyleHost`], [`ColorSchemeQuery`]:
//!   the seams every platform adapter implements
//! - [`resolve_initial_theme`] / [`initialize_theme`]: synchronous bootstrap
//!
//! ## Quick Start
//!
//! ```rust
//! use aurora_theme::{use_theme, MemoryDocument, ThemeConfig, ThemeOptions, ThemeProvider};
//!
//! let doc = MemoryDocument::new().prefers_dark(true);
//! let provider = ThemeProvider::mount(
//!     ThemeOptions::new(doc.environment())
//!         .default_theme(ThemeConfig::auto())
//!         .generate_utilities(true),
//! );
//!
//! // Auto mode already resolved against the OS preference.
//! assert_eq!(doc.root.theme().as_deref(), Some("dark"));
//!
//! provider.scope(|| {
//!     let theme = use_theme();
//!     assert!(theme.is_dark());
//!     theme.toggle_mode();
//! });
//! assert_eq!(doc.root.theme().as_deref(), Some("dark"));
//! assert_eq!(doc.head.len(), 1);
//! ```
//!
//! ## Persisted Layout
//!
//! Themes are stored as JSON under the storage key (`aurora-ui-theme` by
//! default):
//!
//! ```json
//! { "mode": "dark", "colors": { "primary": "#d0bcff" }, "customProperties": { "--radius": "8px" } }
//! ```
//!
//! Missing, unknown or malformed fields are ignored when reading.
//!
//! ## Features
//!
//! - `web`: browser adapters built on `web-sys` (see the `web` module)

mod bootstrap;
mod config;
mod context;
mod dom;
mod effect;
mod environment;
mod error;
mod injector;
mod media;
mod mode;
mod provider;
mod settings;
mod storage;

#[cfg(feature = "web")]
pub mod web;

pub use bootstrap::{initialize_theme, resolve_initial_theme};
pub use config::{PropertyMap, ThemeConfig, ThemeUpdate};
pub use context::{try_use_theme, use_theme, ProviderScope};
pub use dom::{
    apply_color_scheme, apply_custom_properties, MemoryHead, MemoryTarget, NoopHead, NoopTarget,
    StyleElement, StyleHost, StyleNode, ThemeTarget, THEME_ATTRIBUTE,
};
pub use environment::{Dom, Environment, MemoryDocument};
pub use error::ThemeError;
pub use injector::{inject_global_styles, inject_style, inject_utilities, StyleHandle};
pub use media::{
    detect_color_scheme, reset_scheme_detector, set_scheme_detector, ColorSchemeQuery,
    ManualColorScheme, SchemeListener, Subscription, SystemColorScheme,
};
pub use mode::{ColorScheme, ThemeMode};
pub use provider::{
    Reconfiguration, ThemeContext, ThemeOptions, ThemeProvider, DEFAULT_STORAGE_KEY,
};
pub use settings::{SettingsError, StorageKind, ThemeSettings};
pub use storage::{
    decode_theme, encode_theme, FileStorage, MemoryStorage, NoopStorage, SessionStorage,
    StorageError, ThemeStorage,
};

//! # Aurora CSS - Utility Stylesheets for Aurora UI
//!
//! `aurora-css` generates the utility classes and the baseline global
//! stylesheet of the Aurora UI design system. It knows nothing about the DOM;
//! the `aurora-theme` crate injects what this crate produces.
//!
//! ## Core Concepts
//!
//! - [`UtilityConfig`]: Which categories to emit, class prefix, spacing scale
//! - [`generate`]: Pure function from config to [`UtilityOutput`]
//! - [`ColorToken`]: Closed catalogue of Material 3 color roles
//! - [`global_styles`]: Reset and typography stylesheet text
//!
//! ## Quick Start
//!
//! ```rust
//! use aurora_css::{generate, UtilityConfig};
//!
//! let config = UtilityConfig::new("custom")
//!     .backgrounds(false)
//!     .text_colors(false)
//!     .border_colors(false)
//!     .custom_spacing([("sm", "0.25rem")]);
//!
//! let output = generate(&config);
//! assert!(output.css.contains(".custom-p-sm { padding: 0.25rem; }"));
//! assert!(output.class_names.contains(&"custom-m-sm".to_string()));
//! ```
//!
//! ## Class Names
//!
//! | Category | Pattern |
//! |----------|---------|
//! | Backgrounds | `<prefix>-bg-<token>` |
//! | Text | `<prefix>-text-<token>` |
//! | Borders | `<prefix>-border-<token>` |
//! | Spacing | `<prefix>-p<dir>-<scale>`, `<prefix>-m<dir>-<scale>` |
//! | Responsive | `<breakpoint>\:<name>` |
//!
//! Direction suffixes are empty (all sides), `t`, `r`, `b`, `l`, `x`, `y`.

mod config;
mod error;
mod generator;
mod global;
pub mod tokens;

pub use config::{default_spacing_scale, SpacingScale, UtilityConfig, DEFAULT_PREFIX};
pub use error::ConfigError;
pub use generator::{
    escape_class, generate, responsive_class_name, Rule, UtilityCategory, UtilityOutput,
    UtilityStats,
};
pub use global::global_styles;
pub use tokens::{Breakpoint, ColorToken, Direction};

/// Namespace shared by every injected stylesheet id.
pub const STYLE_ID_NAMESPACE: &str = "aurora-ui";

/// Element id of the global stylesheet for `prefix`.
pub fn global_styles_id(prefix: &str) -> String {
    format!("{}-global-styles-{}", STYLE_ID_NAMESPACE, prefix)
}

/// Element id of the utility stylesheet for `prefix`.
pub fn utility_styles_id(prefix: &str) -> String {
    format!("{}-utility-styles-{}", STYLE_ID_NAMESPACE, prefix)
}

//! Theme setup errors.

/// Errors raised when consuming the theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// `use_theme` was called with no provider scope entered, or the
    /// innermost scope's provider has unmounted.
    #[error(
        "use_theme must be called within a ThemeProvider scope; \
         enter one with ThemeProvider::enter or ThemeProvider::scope"
    )]
    MissingProvider,
}

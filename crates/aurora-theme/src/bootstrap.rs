//! Flicker-free initial theme resolution.
//!
//! The resolved scheme has to be on the root element before anything is
//! drawn, otherwise a dark-mode user sees one light frame. Resolution is
//! therefore synchronous: read storage, merge over the default, write
//! `data-theme` immediately.
//!
//! [`ThemeProvider::mount`](crate::ThemeProvider::mount) calls
//! [`resolve_initial_theme`] for its initial state. Hosts that want the
//! attribute set before the provider exists (an inline boot script, a native
//! splash screen) call [`initialize_theme`] with the same options and reach
//! the same DOM state.

use crate::config::ThemeConfig;
use crate::dom::{apply_color_scheme, ThemeTarget};
use crate::environment::Environment;
use crate::provider::ThemeOptions;
use crate::storage::ThemeStorage;

/// Resolves the starting theme and applies its scheme to `target`.
///
/// - headless: returns `default` without touching storage or the target
/// - stored theme: merged over `default`, its scheme written, merged config
///   returned (mode may still be auto)
/// - nothing stored: `default`'s scheme written and `default` persisted
///
/// Storage failures are logged and treated as "nothing stored".
pub fn resolve_initial_theme(
    default: &ThemeConfig,
    key: &str,
    storage: &dyn ThemeStorage,
    target: &dyn ThemeTarget,
    environment: &Environment,
) -> ThemeConfig {
    if environment.is_headless() {
        return default.clone();
    }

    let stored = storage.get_theme(key).unwrap_or_else(|err| {
        tracing::warn!(key, error = %err, "failed to read stored theme, using default");
        None
    });
    let prefers_dark = environment.prefers_dark();

    match stored {
        Some(update) => {
            let config = default.merge(&update);
            apply_color_scheme(target, config.scheme(prefers_dark));
            tracing::debug!(key, mode = %config.mode, "restored stored theme");
            config
        }
        None => {
            apply_color_scheme(target, default.scheme(prefers_dark));
            if let Err(err) = storage.set_theme(key, default) {
                tracing::warn!(key, error = %err, "failed to persist default theme");
            }
            default.clone()
        }
    }
}

/// Standalone entry point: resolves with the storage and target `options`
/// would give a provider.
pub fn initialize_theme(options: &ThemeOptions) -> ThemeConfig {
    let storage = options.resolved_storage();
    let target = options.resolved_target();
    resolve_initial_theme(
        &options.default_theme,
        &options.storage_key,
        &*storage,
        &*target,
        &options.environment,
    )
}

//! Scoped provider lookup.
//!
//! Components do not receive a [`ThemeContext`] explicitly; they call
//! [`use_theme`], which finds the innermost provider scope entered on the
//! current thread. Scopes nest, and leaving one (dropping its
//! [`ProviderScope`] guard) removes exactly that scope, whatever order the
//! guards drop in. A scope whose provider has unmounted no longer resolves.
//!
//! ```rust
//! use aurora_theme::{try_use_theme, use_theme, Environment, ThemeOptions, ThemeProvider};
//!
//! let provider = ThemeProvider::mount(ThemeOptions::new(Environment::Headless));
//! provider.scope(|| {
//!     let theme = use_theme();
//!     theme.toggle_mode();
//! });
//! assert!(try_use_theme().is_err());
//! ```

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::ThemeError;
use crate::provider::{ThemeContext, ThemeProvider};

thread_local! {
    static SCOPES: RefCell<Vec<(u64, ThemeContext)>> = const { RefCell::new(Vec::new()) };
    static NEXT_SCOPE: Cell<u64> = const { Cell::new(0) };
}

/// Guard for an entered provider scope. Leaves the scope on drop.
#[must_use = "the scope is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ProviderScope {
    id: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for ProviderScope {
    fn drop(&mut self) {
        let id = self.id;
        SCOPES.with(|scopes| scopes.borrow_mut().retain(|(scope, _)| *scope != id));
    }
}

impl ThemeProvider {
    /// Makes this provider the one [`use_theme`] returns until the guard drops.
    pub fn enter(&self) -> ProviderScope {
        let id = NEXT_SCOPE.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        let context = self.context();
        SCOPES.with(|scopes| scopes.borrow_mut().push((id, context)));
        ProviderScope {
            id,
            _not_send: PhantomData,
        }
    }

    /// Runs `f` with this provider's scope entered.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let _scope = self.enter();
        f()
    }
}

/// The innermost provider's context.
///
/// # Panics
///
/// Panics when called outside every provider scope. Use [`try_use_theme`] to
/// handle that case.
pub fn use_theme() -> ThemeContext {
    match try_use_theme() {
        Ok(context) => context,
        Err(err) => panic!("{}", err),
    }
}

/// The innermost provider's context, or [`ThemeError::MissingProvider`].
///
/// An innermost scope whose provider has unmounted is an error too; the
/// lookup never falls through to an outer provider.
pub fn try_use_theme() -> Result<ThemeContext, ThemeError> {
    SCOPES
        .with(|scopes| {
            scopes
                .borrow()
                .last()
                .map(|(_, context)| context.clone())
        })
        .filter(ThemeContext::is_mounted)
        .ok_or(ThemeError::MissingProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use crate::environment::Environment;
    use crate::mode::ThemeMode;
    use crate::provider::ThemeOptions;

    fn headless(theme: ThemeConfig) -> ThemeProvider {
        ThemeProvider::mount(ThemeOptions::new(Environment::Headless).default_theme(theme))
    }

    #[test]
    fn missing_provider_is_error() {
        assert_eq!(try_use_theme().unwrap_err(), ThemeError::MissingProvider);
    }

    #[test]
    #[should_panic(expected = "within a ThemeProvider scope")]
    fn use_theme_panics_without_provider() {
        let _ = use_theme();
    }

    #[test]
    fn nested_scopes_resolve_innermost() {
        let outer = headless(ThemeConfig::light());
        let inner = headless(ThemeConfig::dark());

        let _outer_scope = outer.enter();
        assert_eq!(use_theme().mode(), ThemeMode::Light);
        {
            let _inner_scope = inner.enter();
            assert_eq!(use_theme().mode(), ThemeMode::Dark);
        }
        assert_eq!(use_theme().mode(), ThemeMode::Light);
    }

    #[test]
    fn scope_returns_value_and_leaves() {
        let provider = headless(ThemeConfig::auto());
        let mode = provider.scope(|| use_theme().mode());
        assert_eq!(mode, ThemeMode::Auto);
        assert!(try_use_theme().is_err());
    }

    #[test]
    fn unmounted_provider_does_not_resolve() {
        let provider = headless(ThemeConfig::light());
        let _scope = provider.enter();
        assert!(try_use_theme().is_ok());

        drop(provider);
        assert_eq!(try_use_theme().unwrap_err(), ThemeError::MissingProvider);
    }

    #[test]
    fn explicit_unmount_inside_scope_is_missing_provider() {
        let outer = headless(ThemeConfig::dark());
        let inner = headless(ThemeConfig::light());
        let _outer_scope = outer.enter();
        let _inner_scope = inner.enter();

        inner.unmount();
        assert!(try_use_theme().is_err());
    }

    #[test]
    fn out_of_order_drop_keeps_inner_scope() {
        let outer = headless(ThemeConfig::light());
        let inner = headless(ThemeConfig::dark());

        let outer_scope = outer.enter();
        let inner_scope = inner.enter();
        drop(outer_scope);
        assert_eq!(use_theme().mode(), ThemeMode::Dark);

        drop(inner_scope);
        assert!(try_use_theme().is_err());
    }

    #[test]
    fn mutations_through_hook_reach_provider() {
        let provider = headless(ThemeConfig::light());
        provider.scope(|| use_theme().toggle_mode());
        assert_eq!(provider.context().mode(), ThemeMode::Dark);
    }
}

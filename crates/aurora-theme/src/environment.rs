//! The runtime environment the theme engine runs in.
//!
//! Everything that touches a document is reached through an [`Environment`].
//! `Headless` is the server-side / no-DOM case: bootstrap returns the default
//! theme untouched, injection hands out inert handles, and effects write
//! nowhere. `Dom` bundles the capabilities of a live document:
//!
//! | Capability | Trait | Browser (`web` feature) | In memory |
//! |------------|-------|-------------------------|-----------|
//! | Root element | [`ThemeTarget`] | `DocumentElement` | [`MemoryTarget`] |
//! | `<head>` | [`StyleHost`] | `DocumentHead` | [`MemoryHead`] |
//! | Persistent storage | [`ThemeStorage`] | `LocalStorage` | [`MemoryStorage`] |
//! | Session storage | [`ThemeStorage`] | `BrowserSessionStorage` | [`MemoryStorage`] |
//! | OS preference | [`ColorSchemeQuery`] | `MediaQueryColorScheme` | [`ManualColorScheme`] |
//!
//! ```rust
//! use aurora_theme::{Environment, MemoryDocument};
//!
//! let doc = MemoryDocument::new().prefers_dark(true);
//! let env = doc.environment();
//! assert_eq!(env.prefers_dark(), Some(true));
//! assert!(Environment::Headless.prefers_dark().is_none());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::dom::{MemoryHead, MemoryTarget, NoopHead, NoopTarget, StyleHost, ThemeTarget};
use crate::media::{ColorSchemeQuery, ManualColorScheme};
use crate::storage::{MemoryStorage, NoopStorage, ThemeStorage};

/// Where the theme engine is running.
#[derive(Clone, Default)]
pub enum Environment {
    /// No document. Every DOM code path is a no-op.
    #[default]
    Headless,
    /// A live (or simulated) document.
    Dom(Dom),
}

impl Environment {
    /// The environment of the current process.
    ///
    /// On `wasm32` with the `web` feature this is the browser document when a
    /// `window` exists. Everywhere else it is [`Environment::Headless`].
    pub fn detect() -> Self {
        #[cfg(all(feature = "web", target_arch = "wasm32"))]
        {
            if let Some(dom) = crate::web::browser_dom() {
                return Environment::Dom(dom);
            }
        }
        Environment::Headless
    }

    pub fn is_headless(&self) -> bool {
        matches!(self, Environment::Headless)
    }

    pub fn dom(&self) -> Option<&Dom> {
        match self {
            Environment::Headless => None,
            Environment::Dom(dom) => Some(dom),
        }
    }

    /// The OS dark-mode preference, `None` when it cannot be queried.
    pub fn prefers_dark(&self) -> Option<bool> {
        self.dom()
            .and_then(|dom| dom.color_scheme.as_ref())
            .map(|query| query.prefers_dark())
    }

    pub fn color_scheme(&self) -> Option<Rc<dyn ColorSchemeQuery>> {
        self.dom().and_then(|dom| dom.color_scheme.clone())
    }

    /// Root element, or a no-op target when headless.
    pub fn root(&self) -> Rc<dyn ThemeTarget> {
        match self {
            Environment::Headless => Rc::new(NoopTarget),
            Environment::Dom(dom) => Rc::clone(&dom.root),
        }
    }

    /// Document head, or a no-op host when headless.
    pub fn head(&self) -> Rc<dyn StyleHost> {
        match self {
            Environment::Headless => Rc::new(NoopHead),
            Environment::Dom(dom) => Rc::clone(&dom.head),
        }
    }

    /// Storage that survives reloads, or no-op storage when headless.
    pub fn persistent_storage(&self) -> Rc<dyn ThemeStorage> {
        match self {
            Environment::Headless => Rc::new(NoopStorage),
            Environment::Dom(dom) => Rc::clone(&dom.persistent),
        }
    }

    /// Storage scoped to the session, or no-op storage when headless.
    pub fn session_storage(&self) -> Rc<dyn ThemeStorage> {
        match self {
            Environment::Headless => Rc::new(NoopStorage),
            Environment::Dom(dom) => Rc::clone(&dom.session),
        }
    }
}

impl From<Dom> for Environment {
    fn from(dom: Dom) -> Self {
        Environment::Dom(dom)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Headless => f.write_str("Headless"),
            Environment::Dom(dom) => f.debug_tuple("Dom").field(dom).finish(),
        }
    }
}

/// Capabilities of a document.
#[derive(Clone)]
pub struct Dom {
    root: Rc<dyn ThemeTarget>,
    head: Rc<dyn StyleHost>,
    persistent: Rc<dyn ThemeStorage>,
    session: Rc<dyn ThemeStorage>,
    color_scheme: Option<Rc<dyn ColorSchemeQuery>>,
}

impl Dom {
    /// A document with the given root and head.
    ///
    /// Both storages start as fresh [`MemoryStorage`] instances and no OS
    /// preference is available until one is attached.
    pub fn new(root: Rc<dyn ThemeTarget>, head: Rc<dyn StyleHost>) -> Self {
        Self {
            root,
            head,
            persistent: Rc::new(MemoryStorage::new()),
            session: Rc::new(MemoryStorage::new()),
            color_scheme: None,
        }
    }

    /// A fully in-memory document with a light OS preference.
    pub fn in_memory() -> Self {
        MemoryDocument::new().dom()
    }

    pub fn with_persistent_storage(mut self, storage: Rc<dyn ThemeStorage>) -> Self {
        self.persistent = storage;
        self
    }

    pub fn with_session_storage(mut self, storage: Rc<dyn ThemeStorage>) -> Self {
        self.session = storage;
        self
    }

    pub fn with_color_scheme(mut self, query: Rc<dyn ColorSchemeQuery>) -> Self {
        self.color_scheme = Some(query);
        self
    }

    pub fn root(&self) -> &Rc<dyn ThemeTarget> {
        &self.root
    }

    pub fn head(&self) -> &Rc<dyn StyleHost> {
        &self.head
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("color_scheme", &self.color_scheme.is_some())
            .finish_non_exhaustive()
    }
}

/// An in-memory document whose parts stay inspectable.
///
/// Keeps typed handles to every part so hosts and tests can read back what
/// the engine wrote, while [`environment`](Self::environment) hands the same
/// parts to the engine as trait objects.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub root: Rc<MemoryTarget>,
    pub head: Rc<MemoryHead>,
    pub storage: Rc<MemoryStorage>,
    pub session: Rc<MemoryStorage>,
    pub color_scheme: ManualColorScheme,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            root: Rc::new(MemoryTarget::new()),
            head: Rc::new(MemoryHead::new()),
            storage: Rc::new(MemoryStorage::new()),
            session: Rc::new(MemoryStorage::new()),
            color_scheme: ManualColorScheme::light(),
        }
    }

    /// Sets the initial OS preference.
    pub fn prefers_dark(self, dark: bool) -> Self {
        self.color_scheme.set_prefers_dark(dark);
        self
    }

    /// Replaces the persistent storage, e.g. to share one across documents.
    pub fn with_storage(mut self, storage: Rc<MemoryStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn dom(&self) -> Dom {
        Dom::new(self.root.clone(), self.head.clone())
            .with_persistent_storage(self.storage.clone())
            .with_session_storage(self.session.clone())
            .with_color_scheme(Rc::new(self.color_scheme.clone()))
    }

    pub fn environment(&self) -> Environment {
        Environment::Dom(self.dom())
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

//! The theme provider.
//!
//! A [`ThemeProvider`] owns the current [`ThemeConfig`] and keeps the document
//! in sync with it. Mounting resolves the initial theme synchronously (see
//! [`resolve_initial_theme`]) and then commits four effects, in this order:
//!
//! 1. **mode**: writes the resolved scheme to `data-theme`. In auto mode it
//!    also subscribes to the OS preference and rewrites on every change; the
//!    subscription is dropped when the mode leaves auto or on unmount.
//! 2. **custom properties**: writes `--color-<key>` for each color and every
//!    custom property verbatim.
//! 3. **global styles**: injects the global stylesheet when enabled.
//! 4. **utilities**: injects the generated utility stylesheet when enabled.
//!
//! Each effect re-runs only when its own dependencies change, running the
//! previous cleanup first. Consumers read and mutate the theme through a
//! [`ThemeContext`].
//!
//! ```rust
//! use aurora_theme::{MemoryDocument, ThemeMode, ThemeOptions, ThemeProvider};
//!
//! let doc = MemoryDocument::new();
//! let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()));
//! assert_eq!(doc.root.theme().as_deref(), Some("light"));
//!
//! let theme = provider.context();
//! theme.toggle_mode();
//! assert_eq!(theme.theme().mode, ThemeMode::Dark);
//! assert_eq!(doc.root.theme().as_deref(), Some("dark"));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use aurora_css::{UtilityConfig, DEFAULT_PREFIX};

use crate::bootstrap::resolve_initial_theme;
use crate::config::{PropertyMap, ThemeConfig, ThemeUpdate};
use crate::dom::{apply_color_scheme, apply_custom_properties, ThemeTarget};
use crate::effect::{Cleanup, Effect};
use crate::environment::Environment;
use crate::injector::{inject_global_styles, inject_utilities};
use crate::mode::{ColorScheme, ThemeMode};
use crate::storage::ThemeStorage;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "aurora-ui-theme";

/// Construction options for a [`ThemeProvider`].
#[derive(Clone)]
pub struct ThemeOptions {
    /// Theme used when nothing is stored.
    pub default_theme: ThemeConfig,
    pub storage_key: String,
    /// Defaults to the environment's persistent storage.
    pub storage: Option<Rc<dyn ThemeStorage>>,
    /// Defaults to the environment's root element.
    pub target: Option<Rc<dyn ThemeTarget>>,
    pub auto_global_styles: bool,
    /// Injects all four utility categories, without responsive variants.
    pub generate_utilities: bool,
    pub css_variables_prefix: String,
    pub environment: Environment,
}

impl ThemeOptions {
    pub fn new(environment: Environment) -> Self {
        Self {
            default_theme: ThemeConfig::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage: None,
            target: None,
            auto_global_styles: false,
            generate_utilities: false,
            css_variables_prefix: DEFAULT_PREFIX.to_string(),
            environment,
        }
    }

    pub fn default_theme(mut self, theme: ThemeConfig) -> Self {
        self.default_theme = theme;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn storage(mut self, storage: Rc<dyn ThemeStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn target(mut self, target: Rc<dyn ThemeTarget>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn auto_global_styles(mut self, enabled: bool) -> Self {
        self.auto_global_styles = enabled;
        self
    }

    pub fn generate_utilities(mut self, enabled: bool) -> Self {
        self.generate_utilities = enabled;
        self
    }

    pub fn css_variables_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.css_variables_prefix = prefix.into();
        self
    }

    /// The configured storage, or the environment's persistent storage.
    pub fn resolved_storage(&self) -> Rc<dyn ThemeStorage> {
        self.storage
            .clone()
            .unwrap_or_else(|| self.environment.persistent_storage())
    }

    /// The configured target, or the environment's root element.
    pub fn resolved_target(&self) -> Rc<dyn ThemeTarget> {
        self.target
            .clone()
            .unwrap_or_else(|| self.environment.root())
    }

    /// Utility generation settings implied by these options.
    pub fn utility_config(&self) -> UtilityConfig {
        UtilityConfig::new(self.css_variables_prefix.clone())
    }
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self::new(Environment::detect())
    }
}

impl fmt::Debug for ThemeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeOptions")
            .field("default_theme", &self.default_theme)
            .field("storage_key", &self.storage_key)
            .field("storage", &self.storage.is_some())
            .field("target", &self.target.is_some())
            .field("auto_global_styles", &self.auto_global_styles)
            .field("generate_utilities", &self.generate_utilities)
            .field("css_variables_prefix", &self.css_variables_prefix)
            .field("environment", &self.environment)
            .finish()
    }
}

/// Changes applied to a mounted provider by [`ThemeProvider::reconfigure`].
///
/// Unset fields keep their current value.
#[derive(Default, Clone)]
pub struct Reconfiguration {
    target: Option<Option<Rc<dyn ThemeTarget>>>,
    auto_global_styles: Option<bool>,
    generate_utilities: Option<bool>,
    css_variables_prefix: Option<String>,
}

impl Reconfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: Rc<dyn ThemeTarget>) -> Self {
        self.target = Some(Some(target));
        self
    }

    /// Goes back to the environment's root element.
    pub fn default_target(mut self) -> Self {
        self.target = Some(None);
        self
    }

    pub fn auto_global_styles(mut self, enabled: bool) -> Self {
        self.auto_global_styles = Some(enabled);
        self
    }

    pub fn generate_utilities(mut self, enabled: bool) -> Self {
        self.generate_utilities = Some(enabled);
        self
    }

    pub fn css_variables_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.css_variables_prefix = Some(prefix.into());
        self
    }

    fn apply_to(self, options: &mut ThemeOptions) {
        if let Some(target) = self.target {
            options.target = target;
        }
        if let Some(enabled) = self.auto_global_styles {
            options.auto_global_styles = enabled;
        }
        if let Some(enabled) = self.generate_utilities {
            options.generate_utilities = enabled;
        }
        if let Some(prefix) = self.css_variables_prefix {
            options.css_variables_prefix = prefix;
        }
    }
}

impl fmt::Debug for Reconfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconfiguration")
            .field("target", &self.target.as_ref().map(|t| t.is_some()))
            .field("auto_global_styles", &self.auto_global_styles)
            .field("generate_utilities", &self.generate_utilities)
            .field("css_variables_prefix", &self.css_variables_prefix)
            .finish()
    }
}

type TargetId = *const ();

fn target_id(target: &Rc<dyn ThemeTarget>) -> TargetId {
    Rc::as_ptr(target) as *const ()
}

struct Effects {
    mode: Effect<(ThemeMode, TargetId)>,
    properties: Effect<(Option<PropertyMap>, Option<PropertyMap>, TargetId)>,
    global_styles: Effect<(bool, String)>,
    utilities: Effect<(bool, String)>,
}

impl Effects {
    fn new() -> Self {
        Self {
            mode: Effect::new(),
            properties: Effect::new(),
            global_styles: Effect::new(),
            utilities: Effect::new(),
        }
    }

    fn teardown(&mut self) {
        self.utilities.teardown();
        self.global_styles.teardown();
        self.properties.teardown();
        self.mode.teardown();
    }
}

struct State {
    theme: ThemeConfig,
    options: ThemeOptions,
    storage: Rc<dyn ThemeStorage>,
    target: Rc<dyn ThemeTarget>,
    mounted: bool,
    effects: Effects,
}

impl State {
    fn commit(&mut self) {
        if !self.mounted || self.options.environment.is_headless() {
            return;
        }
        let State {
            ref theme,
            ref options,
            ref target,
            ref mut effects,
            ..
        } = *self;
        let environment = &options.environment;
        let id = target_id(target);

        effects.mode.update((theme.mode, id), |(mode, _)| {
            sync_mode(*mode, target, environment)
        });

        effects.properties.update(
            (theme.colors.clone(), theme.custom_properties.clone(), id),
            |_| {
                apply_custom_properties(&**target, theme);
                None
            },
        );

        let prefix = options.css_variables_prefix.clone();
        effects
            .global_styles
            .update((options.auto_global_styles, prefix.clone()), |(enabled, prefix)| {
                if !*enabled {
                    return None;
                }
                let handle = inject_global_styles(environment, prefix);
                Some(Box::new(move || handle.dispose()) as Cleanup)
            });

        effects
            .utilities
            .update((options.generate_utilities, prefix), |(enabled, _)| {
                if !*enabled {
                    return None;
                }
                let handle = inject_utilities(environment, &options.utility_config());
                Some(Box::new(move || handle.dispose()) as Cleanup)
            });
    }
}

fn sync_mode(
    mode: ThemeMode,
    target: &Rc<dyn ThemeTarget>,
    environment: &Environment,
) -> Option<Cleanup> {
    apply_color_scheme(&**target, mode.resolve(environment.prefers_dark()));
    if mode != ThemeMode::Auto {
        return None;
    }

    let query = environment.color_scheme()?;
    let listener_target = Rc::clone(target);
    let subscription = query.subscribe(Rc::new(move |scheme: ColorScheme| {
        apply_color_scheme(&*listener_target, scheme);
    }));
    tracing::debug!("following OS color scheme");
    Some(Box::new(move || drop(subscription)))
}

struct Shared {
    state: RefCell<State>,
}

/// Owner of the theme state and its DOM synchronization.
///
/// Dropping the provider unmounts it.
pub struct ThemeProvider {
    shared: Rc<Shared>,
}

impl ThemeProvider {
    /// Resolves the initial theme and commits all effects.
    pub fn mount(options: ThemeOptions) -> Self {
        let storage = options.resolved_storage();
        let target = options.resolved_target();
        let theme = resolve_initial_theme(
            &options.default_theme,
            &options.storage_key,
            &*storage,
            &*target,
            &options.environment,
        );
        tracing::debug!(
            mode = %theme.mode,
            prefix = %options.css_variables_prefix,
            "mounting theme provider"
        );

        let shared = Rc::new(Shared {
            state: RefCell::new(State {
                theme,
                options,
                storage,
                target,
                mounted: true,
                effects: Effects::new(),
            }),
        });
        shared.state.borrow_mut().commit();
        Self { shared }
    }

    /// A handle for reading and changing the theme.
    pub fn context(&self) -> ThemeContext {
        ThemeContext {
            shared: Rc::clone(&self.shared),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.state.borrow().mounted
    }

    /// Applies `changes` and re-runs the effects whose dependencies moved.
    pub fn reconfigure(&self, changes: Reconfiguration) {
        let mut state = self.shared.state.borrow_mut();
        if !state.mounted {
            tracing::debug!("ignoring reconfigure on unmounted provider");
            return;
        }
        tracing::debug!(?changes, "reconfiguring theme provider");
        changes.apply_to(&mut state.options);
        state.target = state.options.resolved_target();
        state.commit();
    }

    /// Runs every effect cleanup. Later mutations through contexts are ignored.
    pub fn unmount(&self) {
        let mut state = self.shared.state.borrow_mut();
        if !state.mounted {
            return;
        }
        state.mounted = false;
        state.effects.teardown();
        tracing::debug!("unmounted theme provider");
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("ThemeProvider")
            .field("theme", &state.theme)
            .field("mounted", &state.mounted)
            .finish_non_exhaustive()
    }
}

/// Consumer handle onto a provider's theme.
#[derive(Clone)]
pub struct ThemeContext {
    shared: Rc<Shared>,
}

impl ThemeContext {
    pub(crate) fn is_mounted(&self) -> bool {
        self.shared.state.borrow().mounted
    }

    /// The current theme.
    pub fn theme(&self) -> ThemeConfig {
        self.shared.state.borrow().theme.clone()
    }

    pub fn mode(&self) -> ThemeMode {
        self.shared.state.borrow().theme.mode
    }

    /// The scheme the theme resolves to right now.
    pub fn color_scheme(&self) -> ColorScheme {
        let state = self.shared.state.borrow();
        state
            .theme
            .scheme(state.options.environment.prefers_dark())
    }

    /// Whether the theme currently resolves to dark. Auto mode is resolved
    /// against the OS preference at call time.
    pub fn is_dark(&self) -> bool {
        self.color_scheme().is_dark()
    }

    /// Merges `update` into the theme, persists it and synchronizes the
    /// document. Persistence failures are logged; the new theme still applies.
    pub fn set_theme(&self, update: impl Into<ThemeUpdate>) {
        let update = update.into();
        let mut state = self.shared.state.borrow_mut();
        if !state.mounted {
            tracing::debug!("ignoring set_theme on unmounted provider");
            return;
        }

        state.theme = state.theme.merge(&update);
        if let Err(err) = state.storage.set_theme(&state.options.storage_key, &state.theme) {
            tracing::warn!(
                key = %state.options.storage_key,
                error = %err,
                "failed to persist theme"
            );
        }
        state.commit();
    }

    /// Light becomes dark, dark becomes light, auto becomes dark.
    pub fn toggle_mode(&self) {
        let next = self.mode().toggled();
        self.set_theme(ThemeUpdate::mode(next));
    }
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("theme", &self.shared.state.borrow().theme)
            .finish()
    }
}

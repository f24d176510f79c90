//! OS color-scheme preference.
//!
//! [`ColorSchemeQuery`] is the Rust face of
//! `matchMedia('(prefers-color-scheme: dark)')`: a synchronous `matches`
//! check plus change notifications. Subscriptions are RAII guards; dropping a
//! [`Subscription`] unregisters the listener, so a notification can never
//! reach code that has already been torn down.
//!
//! Implementations:
//!
//! - [`ManualColorScheme`]: the host (or a test) sets the preference
//! - [`SystemColorScheme`]: asks the OS through `dark-light`; [`poll`] re-reads
//!   the preference and notifies subscribers when it changed
//! - `MediaQueryColorScheme` (`web` feature): the browser media query
//!
//! OS detection can be overridden for testing with [`set_scheme_detector`]:
//!
//! ```rust
//! use aurora_theme::{detect_color_scheme, reset_scheme_detector, set_scheme_detector, ColorScheme};
//!
//! set_scheme_detector(|| ColorScheme::Dark);
//! assert_eq!(detect_color_scheme(), ColorScheme::Dark);
//! reset_scheme_detector();
//! ```
//!
//! [`poll`]: SystemColorScheme::poll

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Mutex;

use dark_light::Mode as OsThemeMode;
use once_cell::sync::Lazy;

use crate::mode::ColorScheme;

/// Callback invoked with the new scheme when the OS preference changes.
pub type SchemeListener = Rc<dyn Fn(ColorScheme)>;

/// A live view of the OS dark-mode preference.
pub trait ColorSchemeQuery {
    /// Whether the OS currently prefers a dark scheme.
    fn prefers_dark(&self) -> bool;

    /// Registers `listener` until the returned guard is dropped.
    fn subscribe(&self, listener: SchemeListener) -> Subscription;
}

impl fmt::Debug for dyn ColorSchemeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ColorSchemeQuery")
    }
}

/// Guard for a registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribes now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Listener registry shared by the query implementations.
#[derive(Default)]
struct Listeners {
    entries: RefCell<Vec<(u64, SchemeListener)>>,
    next_id: Cell<u64>,
}

impl Listeners {
    fn add(self: &Rc<Self>, listener: SchemeListener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));

        let weak: Weak<Listeners> = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.entries.borrow_mut().retain(|(i, _)| *i != id);
            }
        })
    }

    fn notify(&self, scheme: ColorScheme) {
        // Snapshot so listeners may unsubscribe while being notified.
        let snapshot: Vec<SchemeListener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(scheme);
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

// === Manual ===

struct ManualInner {
    dark: Cell<bool>,
    listeners: Rc<Listeners>,
}

/// A preference set by the host application.
///
/// Clones share state: setting the preference on one clone notifies the
/// subscribers of all of them.
#[derive(Clone)]
pub struct ManualColorScheme {
    inner: Rc<ManualInner>,
}

impl ManualColorScheme {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            inner: Rc::new(ManualInner {
                dark: Cell::new(prefers_dark),
                listeners: Rc::new(Listeners::default()),
            }),
        }
    }

    pub fn light() -> Self {
        Self::new(false)
    }

    pub fn dark() -> Self {
        Self::new(true)
    }

    /// Changes the preference, notifying subscribers if it differs.
    pub fn set_prefers_dark(&self, dark: bool) {
        if self.inner.dark.replace(dark) != dark {
            self.inner.listeners.notify(ColorScheme::from_dark(dark));
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl ColorSchemeQuery for ManualColorScheme {
    fn prefers_dark(&self) -> bool {
        self.inner.dark.get()
    }

    fn subscribe(&self, listener: SchemeListener) -> Subscription {
        self.inner.listeners.add(listener)
    }
}

impl fmt::Debug for ManualColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualColorScheme")
            .field("prefers_dark", &self.inner.dark.get())
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

// === System ===

type SchemeDetector = fn() -> ColorScheme;

static SCHEME_DETECTOR: Lazy<Mutex<SchemeDetector>> = Lazy::new(|| Mutex::new(os_scheme_detector));

/// Overrides the detector used to read the OS preference.
pub fn set_scheme_detector(detector: SchemeDetector) {
    let mut guard = SCHEME_DETECTOR.lock().unwrap_or_else(|p| p.into_inner());
    *guard = detector;
}

/// Restores OS detection through `dark-light`.
pub fn reset_scheme_detector() {
    set_scheme_detector(os_scheme_detector);
}

/// Reads the OS color-scheme preference.
///
/// Falls back to [`ColorScheme::Light`] when the OS does not report one.
pub fn detect_color_scheme() -> ColorScheme {
    let detector = *SCHEME_DETECTOR.lock().unwrap_or_else(|p| p.into_inner());
    detector()
}

fn os_scheme_detector() -> ColorScheme {
    match dark_light::detect() {
        Ok(OsThemeMode::Dark) => ColorScheme::Dark,
        Ok(_) => ColorScheme::Light,
        Err(err) => {
            tracing::debug!(error = ?err, "OS color scheme unavailable, using light");
            ColorScheme::Light
        }
    }
}

struct SystemInner {
    current: Cell<ColorScheme>,
    listeners: Rc<Listeners>,
}

/// The OS preference, re-read on [`poll`](SystemColorScheme::poll).
///
/// Desktop platforms have no push notification shared by all of them, so the
/// host calls `poll` (on focus, on a timer, ...) and subscribers hear about
/// changes from there.
#[derive(Clone)]
pub struct SystemColorScheme {
    inner: Rc<SystemInner>,
}

impl SystemColorScheme {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SystemInner {
                current: Cell::new(detect_color_scheme()),
                listeners: Rc::new(Listeners::default()),
            }),
        }
    }

    /// The last detected scheme.
    pub fn current(&self) -> ColorScheme {
        self.inner.current.get()
    }

    /// Re-reads the OS preference. Returns whether it changed.
    pub fn poll(&self) -> bool {
        let detected = detect_color_scheme();
        if self.inner.current.replace(detected) == detected {
            return false;
        }
        tracing::debug!(scheme = %detected, "OS color scheme changed");
        self.inner.listeners.notify(detected);
        true
    }
}

impl Default for SystemColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeQuery for SystemColorScheme {
    fn prefers_dark(&self) -> bool {
        self.current().is_dark()
    }

    fn subscribe(&self, listener: SchemeListener) -> Subscription {
        self.inner.listeners.add(listener)
    }
}

impl fmt::Debug for SystemColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemColorScheme")
            .field("current", &self.current())
            .finish()
    }
}

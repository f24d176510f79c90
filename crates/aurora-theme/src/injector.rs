//! Stylesheet injection.
//!
//! Each `(kind, prefix)` pair owns at most one `<style>` element, identified by
//! [`aurora_css::global_styles_id`] or [`aurora_css::utility_styles_id`].
//! Injecting removes whatever element already holds the id before appending
//! the new one, so repeated injection never stacks duplicates.
//!
//! The returned [`StyleHandle`] releases exactly the element it appended.
//! Disposing twice is harmless, and disposing a stale handle after a newer
//! injection reused the id leaves the newer element alone.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use aurora_css::{generate, global_styles, global_styles_id, utility_styles_id, UtilityConfig};

use crate::dom::{StyleHost, StyleNode};
use crate::environment::Environment;

/// Ownership of one injected `<style>` element.
pub struct StyleHandle {
    attached: Option<Attached>,
    disposed: Cell<bool>,
}

struct Attached {
    host: Rc<dyn StyleHost>,
    node: StyleNode,
    id: String,
}

impl StyleHandle {
    /// A handle that owns nothing.
    pub fn inert() -> Self {
        Self {
            attached: None,
            disposed: Cell::new(true),
        }
    }

    /// Id of the owned element, `None` for inert handles.
    pub fn id(&self) -> Option<&str> {
        self.attached.as_ref().map(|a| a.id.as_str())
    }

    /// Whether the handle still owns an attached element.
    pub fn is_active(&self) -> bool {
        !self.disposed.get()
    }

    /// Removes the owned element. Subsequent calls do nothing.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(attached) = &self.attached {
            let removed = attached.host.remove_node(attached.node);
            tracing::debug!(id = %attached.id, removed, "disposed stylesheet");
        }
    }
}

impl fmt::Debug for StyleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleHandle")
            .field("id", &self.id())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Replaces the element with `id` by a fresh `<style>` holding `css`.
pub fn inject_style(environment: &Environment, id: &str, css: &str) -> StyleHandle {
    let Some(dom) = environment.dom() else {
        return StyleHandle::inert();
    };
    let host = Rc::clone(dom.head());
    if host.remove_by_id(id) {
        tracing::debug!(id, "replaced existing stylesheet");
    }
    let node = host.append_style(id, css);
    StyleHandle {
        attached: Some(Attached {
            host,
            node,
            id: id.to_string(),
        }),
        disposed: Cell::new(false),
    }
}

/// Generates and injects the utility stylesheet for `config.prefix`.
pub fn inject_utilities(environment: &Environment, config: &UtilityConfig) -> StyleHandle {
    if environment.is_headless() {
        return StyleHandle::inert();
    }
    let output = generate(config);
    tracing::debug!(
        prefix = %config.prefix,
        classes = output.stats.total,
        "injecting utility stylesheet"
    );
    inject_style(environment, &utility_styles_id(&config.prefix), &output.css)
}

/// Injects the global stylesheet for `prefix`.
pub fn inject_global_styles(environment: &Environment, prefix: &str) -> StyleHandle {
    if environment.is_headless() {
        return StyleHandle::inert();
    }
    tracing::debug!(prefix, "injecting global stylesheet");
    inject_style(environment, &global_styles_id(prefix), &global_styles(prefix))
}

//! DOM abstractions.
//!
//! Two capabilities decouple the theme engine from any concrete document:
//!
//! - [`ThemeTarget`]: the element carrying `data-theme` and the inline custom
//!   properties (normally the root `<html>` element)
//! - [`StyleHost`]: the place `<style>` elements are appended to and removed
//!   from (normally `<head>`)
//!
//! The in-memory implementations ([`MemoryTarget`], [`MemoryHead`]) model a
//! document faithfully enough for native hosts and tests, and count mutations
//! so tests can assert that nothing is written redundantly. The no-op
//! implementations satisfy the traits without doing anything.

use std::cell::{Cell, RefCell};
use std::fmt;

use indexmap::IndexMap;

use crate::config::ThemeConfig;
use crate::mode::ColorScheme;

/// Attribute holding the resolved color scheme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// An element the theme is applied to.
///
/// `get_attribute` must reflect the most recent `set_attribute` with the
/// same name on the same target.
pub trait ThemeTarget {
    fn set_attribute(&self, name: &str, value: &str);
    fn get_attribute(&self, name: &str) -> Option<String>;
    fn set_style_property(&self, name: &str, value: &str);
}

impl fmt::Debug for dyn ThemeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThemeTarget")
    }
}

/// Writes `scheme` to the theme attribute unless it already holds it.
///
/// Every scheme write goes through here, whether it comes from bootstrap, a
/// mode change or an OS preference change. Returns whether a write happened.
pub fn apply_color_scheme(target: &dyn ThemeTarget, scheme: ColorScheme) -> bool {
    if target.get_attribute(THEME_ATTRIBUTE).as_deref() == Some(scheme.as_str()) {
        tracing::trace!(scheme = %scheme, "theme attribute unchanged");
        return false;
    }
    target.set_attribute(THEME_ATTRIBUTE, scheme.as_str());
    true
}

/// Writes a theme's colors as `--color-<key>` and its custom properties
/// verbatim. Values are written even when unchanged.
pub fn apply_custom_properties(target: &dyn ThemeTarget, config: &ThemeConfig) {
    if let Some(colors) = &config.colors {
        for (key, value) in colors {
            target.set_style_property(&format!("--color-{}", key), value);
        }
    }
    if let Some(properties) = &config.custom_properties {
        for (name, value) in properties {
            target.set_style_property(name, value);
        }
    }
}

/// Opaque handle to one appended `<style>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleNode(u64);

impl StyleNode {
    pub fn new(raw: u64) -> Self {
        StyleNode(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A document head that owns `<style>` elements.
pub trait StyleHost {
    /// Appends a `<style id=id>` element containing `css`.
    fn append_style(&self, id: &str, css: &str) -> StyleNode;

    /// Removes every element with `id`. Returns whether anything was removed.
    fn remove_by_id(&self, id: &str) -> bool;

    /// Removes one specific element if it is still attached.
    fn remove_node(&self, node: StyleNode) -> bool;
}

impl fmt::Debug for dyn StyleHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StyleHost")
    }
}

// === In-memory document ===

/// An in-memory element with attributes and inline style properties.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    attributes: RefCell<IndexMap<String, String>>,
    style: RefCell<IndexMap<String, String>>,
    attribute_writes: Cell<usize>,
    style_writes: Cell<usize>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `data-theme` value.
    pub fn theme(&self) -> Option<String> {
        self.get_attribute(THEME_ATTRIBUTE)
    }

    pub fn style_property(&self, name: &str) -> Option<String> {
        self.style.borrow().get(name).cloned()
    }

    /// Inline style properties in write order.
    pub fn style_properties(&self) -> Vec<(String, String)> {
        self.style
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of `set_attribute` calls received.
    pub fn attribute_writes(&self) -> usize {
        self.attribute_writes.get()
    }

    /// Number of `set_style_property` calls received.
    pub fn style_writes(&self) -> usize {
        self.style_writes.get()
    }
}

impl ThemeTarget for MemoryTarget {
    fn set_attribute(&self, name: &str, value: &str) {
        self.attribute_writes.set(self.attribute_writes.get() + 1);
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.style_writes.set(self.style_writes.get() + 1);
        self.style
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }
}

/// A `<style>` element held by [`MemoryHead`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub node: StyleNode,
    pub id: String,
    pub css: String,
}

/// An in-memory `<head>`: an ordered list of style elements.
#[derive(Debug, Default)]
pub struct MemoryHead {
    elements: RefCell<Vec<StyleElement>>,
    next_node: Cell<u64>,
}

impl MemoryHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached elements with `id`.
    pub fn count(&self, id: &str) -> usize {
        self.elements.borrow().iter().filter(|e| e.id == id).count()
    }

    /// Text content of the first element with `id`.
    pub fn css(&self, id: &str) -> Option<String> {
        self.elements
            .borrow()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.css.clone())
    }

    /// Element ids in document order.
    pub fn ids(&self) -> Vec<String> {
        self.elements.borrow().iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }
}

impl StyleHost for MemoryHead {
    fn append_style(&self, id: &str, css: &str) -> StyleNode {
        let node = StyleNode(self.next_node.get());
        self.next_node.set(node.0 + 1);
        self.elements.borrow_mut().push(StyleElement {
            node,
            id: id.to_string(),
            css: css.to_string(),
        });
        node
    }

    fn remove_by_id(&self, id: &str) -> bool {
        let mut elements = self.elements.borrow_mut();
        let before = elements.len();
        elements.retain(|e| e.id != id);
        elements.len() != before
    }

    fn remove_node(&self, node: StyleNode) -> bool {
        let mut elements = self.elements.borrow_mut();
        let before = elements.len();
        elements.retain(|e| e.node != node);
        elements.len() != before
    }
}

// === No-op ===

/// A target that ignores writes and reports no attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTarget;

impl ThemeTarget for NoopTarget {
    fn set_attribute(&self, _name: &str, _value: &str) {}

    fn get_attribute(&self, _name: &str) -> Option<String> {
        None
    }

    fn set_style_property(&self, _name: &str, _value: &str) {}
}

/// A head that never holds elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHead;

impl StyleHost for NoopHead {
    fn append_style(&self, _id: &str, _css: &str) -> StyleNode {
        StyleNode(0)
    }

    fn remove_by_id(&self, _id: &str) -> bool {
        false
    }

    fn remove_node(&self, _node: StyleNode) -> bool {
        false
    }
}

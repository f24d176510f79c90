//! Browser adapters (`web` feature).
//!
//! These wire the engine to a real document through `web-sys`:
//!
//! - [`LocalStorage`] / [`BrowserSessionStorage`]: `window.localStorage` and
//!   `window.sessionStorage`; security errors (privacy mode, sandboxed
//!   iframes) surface as [`StorageError::Unavailable`]
//! - [`DocumentElement`]: `<html>` as the theme target
//! - [`DocumentHead`]: `<head>` as the style host
//! - [`MediaQueryColorScheme`]: `matchMedia('(prefers-color-scheme: dark)')`
//!
//! [`browser_dom`] assembles all of them; [`Environment::detect`] calls it on
//! `wasm32`.
//!
//! [`Environment::detect`]: crate::Environment::detect

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::config::{ThemeConfig, ThemeUpdate};
use crate::dom::{StyleHost, StyleNode, ThemeTarget};
use crate::environment::Dom;
use crate::media::{ColorSchemeQuery, SchemeListener, Subscription};
use crate::mode::ColorScheme;
use crate::storage::{decode_theme, encode_theme, StorageError, ThemeStorage};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// The browser document, if there is one.
pub fn browser_dom() -> Option<Dom> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let root = document.document_element()?;
    let head = document.head()?;

    let mut dom = Dom::new(
        Rc::new(DocumentElement::new(root)),
        Rc::new(DocumentHead::new(document, head)),
    )
    .with_persistent_storage(Rc::new(LocalStorage))
    .with_session_storage(Rc::new(BrowserSessionStorage));

    if let Some(query) = MediaQueryColorScheme::new() {
        dom = dom.with_color_scheme(Rc::new(query));
    }
    Some(dom)
}

fn js_error(context: &str, err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{}: {:?}", context, err))
}

// === Storage ===

#[derive(Clone, Copy)]
enum Area {
    Local,
    Session,
}

fn web_storage(area: Area) -> Result<web_sys::Storage, StorageError> {
    let window =
        web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
    let storage = match area {
        Area::Local => window.local_storage(),
        Area::Session => window.session_storage(),
    };
    storage
        .map_err(|e| js_error("storage access denied", e))?
        .ok_or_else(|| StorageError::Unavailable("storage disabled".to_string()))
}

fn read(area: Area, key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
    let raw = web_storage(area)?
        .get_item(key)
        .map_err(|e| js_error("getItem failed", e))?;
    Ok(raw.and_then(|raw| decode_theme(key, &raw)))
}

fn write(area: Area, key: &str, config: &ThemeConfig) -> Result<(), StorageError> {
    let raw = encode_theme(config)?;
    web_storage(area)?
        .set_item(key, &raw)
        .map_err(|e| js_error("setItem failed", e))
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl ThemeStorage for LocalStorage {
    fn get_theme(&self, key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        read(Area::Local, key)
    }

    fn set_theme(&self, key: &str, config: &ThemeConfig) -> Result<(), StorageError> {
        write(Area::Local, key, config)
    }
}

/// `window.sessionStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStorage;

impl ThemeStorage for BrowserSessionStorage {
    fn get_theme(&self, key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        read(Area::Session, key)
    }

    fn set_theme(&self, key: &str, config: &ThemeConfig) -> Result<(), StorageError> {
        write(Area::Session, key, config)
    }
}

// === Document ===

/// An element (normally `<html>`) used as the theme target.
#[derive(Debug, Clone)]
pub struct DocumentElement {
    element: web_sys::Element,
}

impl DocumentElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }
}

impl ThemeTarget for DocumentElement {
    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.element.set_attribute(name, value) {
            tracing::warn!(name, error = ?err, "failed to set attribute");
        }
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_style_property(&self, name: &str, value: &str) {
        let Some(html) = self.element.dyn_ref::<web_sys::HtmlElement>() else {
            tracing::warn!(name, "theme target has no inline style");
            return;
        };
        if let Err(err) = html.style().set_property(name, value) {
            tracing::warn!(name, error = ?err, "failed to set style property");
        }
    }
}

/// `<head>` as the style host.
#[derive(Debug)]
pub struct DocumentHead {
    document: web_sys::Document,
    head: web_sys::HtmlHeadElement,
    nodes: RefCell<HashMap<u64, web_sys::Element>>,
    next_node: Cell<u64>,
}

impl DocumentHead {
    pub fn new(document: web_sys::Document, head: web_sys::HtmlHeadElement) -> Self {
        Self {
            document,
            head,
            nodes: RefCell::new(HashMap::new()),
            next_node: Cell::new(0),
        }
    }
}

impl StyleHost for DocumentHead {
    fn append_style(&self, id: &str, css: &str) -> StyleNode {
        let node = StyleNode::new(self.next_node.get());
        self.next_node.set(node.raw() + 1);

        let element = match self.document.create_element("style") {
            Ok(element) => element,
            Err(err) => {
                tracing::warn!(id, error = ?err, "failed to create style element");
                return node;
            }
        };
        element.set_id(id);
        element.set_text_content(Some(css));
        if let Err(err) = self.head.append_child(&element) {
            tracing::warn!(id, error = ?err, "failed to append style element");
            return node;
        }
        self.nodes.borrow_mut().insert(node.raw(), element);
        node
    }

    fn remove_by_id(&self, id: &str) -> bool {
        let mut removed = false;
        while let Some(element) = self.document.get_element_by_id(id) {
            element.remove();
            removed = true;
        }
        self.nodes.borrow_mut().retain(|_, element| element.id() != id);
        removed
    }

    fn remove_node(&self, node: StyleNode) -> bool {
        match self.nodes.borrow_mut().remove(&node.raw()) {
            Some(element) => {
                let attached = element.is_connected();
                element.remove();
                attached
            }
            None => false,
        }
    }
}

// === Media query ===

/// `matchMedia('(prefers-color-scheme: dark)')`.
#[derive(Debug, Clone)]
pub struct MediaQueryColorScheme {
    list: web_sys::MediaQueryList,
}

impl MediaQueryColorScheme {
    /// `None` when `matchMedia` is unavailable.
    pub fn new() -> Option<Self> {
        let list = web_sys::window()?.match_media(DARK_QUERY).ok().flatten()?;
        Some(Self { list })
    }
}

impl ColorSchemeQuery for MediaQueryColorScheme {
    fn prefers_dark(&self) -> bool {
        self.list.matches()
    }

    fn subscribe(&self, listener: SchemeListener) -> Subscription {
        let closure = Closure::wrap(Box::new(move |event: web_sys::MediaQueryListEvent| {
            listener(ColorScheme::from_dark(event.matches()));
        }) as Box<dyn FnMut(_)>);

        if let Err(err) = self
            .list
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?err, "failed to subscribe to color scheme changes");
            return Subscription::inert();
        }

        let list = self.list.clone();
        Subscription::new(move || {
            let _ = list
                .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        })
    }
}

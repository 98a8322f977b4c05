//! Browser binding: `web-sys` page, global command functions, startup.
//!
//! SYSTEM CONTEXT
//! ==============
//! The popup reaches this script through `chrome.scripting.executeScript`,
//! which runs a small function in the content script's world. That function
//! calls one of the globals installed here, so each global is a thin shim
//! that turns its arguments into a [`Command`] for the controller.
//!
//! ERROR HANDLING
//! ==============
//! DOM exceptions become [`PageError::Script`]; a failure to install a global
//! is logged and the remaining globals are still installed.

use std::cell::RefCell;
use std::rc::Rc;

use protocol::chrome::{ChromeStorage, describe_js_error};
use protocol::config::Config;
use protocol::keys::PreferenceKeys;
use protocol::{
    Command, DISPATCH_FN, GET_THEME_FN, SET_DARK_FN, SET_IGNORE_IF_DARK_FN, decode_command, encode_reply,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;

use crate::consts::{PREFERS_DARK_QUERY, SUSPENDED_MEDIA};
use crate::overlay::OverlayController;
use crate::page::{Element, PageError, StyleHost, ThemeSource};
use crate::startup;

type SharedController = Rc<RefCell<OverlayController<BrowserPage>>>;

fn script_error(err: &JsValue) -> PageError {
    PageError::Script(describe_js_error(err))
}

/// The live document this content script runs in.
#[derive(Debug, Clone)]
pub struct BrowserPage {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl BrowserPage {
    /// Bind to the current window; `None` outside a document context.
    #[must_use]
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn element(&self, element: Element) -> Option<web_sys::Element> {
        match element {
            Element::Root => self.document.document_element(),
            Element::Body => self.document.body().map(Into::into),
        }
    }

    fn computed(&self, element: Element, property: &str) -> Result<Option<String>, PageError> {
        let Some(node) = self.element(element) else {
            return Ok(None);
        };
        let Some(style) = self.window.get_computed_style(&node).map_err(|e| script_error(&e))? else {
            return Ok(None);
        };
        style.get_property_value(property).map(Some).map_err(|e| script_error(&e))
    }

    fn origin(&self) -> String {
        self.window
            .location()
            .origin()
            .unwrap_or_else(|err| {
                log::debug!("page: origin unavailable: {}", describe_js_error(&err));
                String::new()
            })
    }
}

impl ThemeSource for BrowserPage {
    fn class_name(&self, element: Element) -> Result<Option<String>, PageError> {
        // The attribute, not `className`, which is an object on SVG roots.
        Ok(self.element(element).and_then(|node| node.get_attribute("class")))
    }

    fn background_color(&self, element: Element) -> Result<Option<String>, PageError> {
        self.computed(element, "background-color")
    }

    fn text_color(&self, element: Element) -> Result<Option<String>, PageError> {
        self.computed(element, "color")
    }

    fn prefers_dark(&self) -> bool {
        match self.window.match_media(PREFERS_DARK_QUERY) {
            Ok(Some(query)) => query.matches(),
            Ok(None) => false,
            Err(err) => {
                log::debug!("page: matchMedia failed: {}", describe_js_error(&err));
                false
            }
        }
    }
}

impl StyleHost for BrowserPage {
    fn has_style(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn insert_style(&mut self, id: &str, css: &str) -> Result<(), PageError> {
        let style = self.document.create_element("style").map_err(|e| script_error(&e))?;
        style.set_id(id);
        style.set_text_content(Some(css));
        let root = self.document.document_element().ok_or(PageError::MissingElement("html"))?;
        root.append_child(&style).map_err(|e| script_error(&e))?;
        Ok(())
    }

    fn remove_style(&mut self, id: &str) -> Result<(), PageError> {
        if let Some(node) = self.document.get_element_by_id(id) {
            node.remove();
        }
        Ok(())
    }

    fn set_style_enabled(&mut self, id: &str, enabled: bool) -> Result<(), PageError> {
        let Some(node) = self.document.get_element_by_id(id) else {
            return Ok(());
        };
        if enabled {
            node.remove_attribute("media").map_err(|e| script_error(&e))
        } else {
            node.set_attribute("media", SUSPENDED_MEDIA).map_err(|e| script_error(&e))
        }
    }
}

/// Content-script entry point.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).unwrap_or_default();

    let Some(page) = BrowserPage::current() else {
        log::warn!("nophoton: no document, content script idle");
        return;
    };
    let config = Config::from_build_env().unwrap_or_else(|err| {
        log::warn!("nophoton: {err}; using default config");
        Config::default()
    });

    let keys = PreferenceKeys::for_scope(config.scope, &page.origin());
    let window = page.window.clone();
    let controller: SharedController = Rc::new(RefCell::new(OverlayController::new(page, config.absent_policy)));

    install_globals(&window, &controller);

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = startup::restore(&controller, &ChromeStorage, &keys).await {
            log::warn!("nophoton: startup restore failed: {err}");
        }
    });
}

fn install_globals(window: &web_sys::Window, controller: &SharedController) {
    let ctl = Rc::clone(controller);
    let set_dark = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |enabled: JsValue, ignore: JsValue| {
        let command = Command::SetDark { enabled: enabled.is_truthy(), ignore_if_dark: ignore.as_bool() };
        ctl.borrow_mut().handle(command);
    });
    install(window, SET_DARK_FN, set_dark);

    let ctl = Rc::clone(controller);
    let get_theme = Closure::<dyn FnMut() -> JsValue>::new(move || match ctl.borrow_mut().handle(Command::GetTheme) {
        protocol::Reply::Theme(theme) => JsValue::from_str(theme.as_str()),
        protocol::Reply::Ack => JsValue::UNDEFINED,
    });
    install(window, GET_THEME_FN, get_theme);

    let ctl = Rc::clone(controller);
    let set_ignore = Closure::<dyn FnMut(JsValue)>::new(move |ignore: JsValue| {
        ctl.borrow_mut().handle(Command::SetIgnoreIfDark { ignore: ignore.is_truthy() });
    });
    install(window, SET_IGNORE_IF_DARK_FN, set_ignore);

    let ctl = Rc::clone(controller);
    let dispatch = Closure::<dyn FnMut(String) -> JsValue>::new(move |raw: String| {
        let reply = match decode_command(&raw) {
            Ok(command) => ctl.borrow_mut().handle(command),
            Err(err) => {
                log::warn!("nophoton: rejected command: {err}");
                return JsValue::NULL;
            }
        };
        match encode_reply(&reply) {
            Ok(encoded) => JsValue::from_str(&encoded),
            Err(err) => {
                log::warn!("nophoton: could not encode reply: {err}");
                JsValue::NULL
            }
        }
    });
    install(window, DISPATCH_FN, dispatch);
}

/// Attach `closure` to `window[name]` for the lifetime of the page.
fn install<T: ?Sized + WasmClosure>(window: &web_sys::Window, name: &str, closure: Closure<T>) {
    let function: &js_sys::Function = closure.as_ref().unchecked_ref();
    if let Err(err) = js_sys::Reflect::set(window, &JsValue::from_str(name), function) {
        log::warn!("nophoton: could not install {name}: {}", describe_js_error(&err));
        return;
    }
    closure.forget();
}

//! Browser binding: `chrome.tabs`/`chrome.scripting` bridge and popup DOM.
//!
//! TRADE-OFFS
//! ==========
//! The injected function is defined in inline JS rather than built with
//! `new Function`, which the extension CSP forbids. It is serialized by the
//! browser and run inside the target tab, so it must be self-contained.

use std::rc::Rc;

use async_trait::async_trait;
use protocol::chrome::{ChromeStorage, describe_js_error};
use protocol::config::Config;
use protocol::{Command, Reply, decode_reply, encode_command};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::bridge::{BridgeError, Tab, TabBridge, TabId};
use crate::controller::Popup;
use crate::state::PopupState;

#[wasm_bindgen(inline_js = r#"
export function page_dispatch() {
  return function (raw) {
    const dispatch = window.__nophotonDispatch;
    return typeof dispatch === "function" ? dispatch(raw) : null;
  };
}
"#)]
extern "C" {
    fn page_dispatch() -> js_sys::Function;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    fn tabs_query(query: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "scripting"], js_name = executeScript)]
    fn execute_script(injection: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

#[derive(Deserialize)]
struct RawTab {
    id: Option<TabId>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct InjectionResult {
    result: Option<String>,
}

/// Await a promise-returning chrome call and decode its JSON-shaped result.
async fn call<T: for<'de> Deserialize<'de>>(
    invoke: Result<js_sys::Promise, JsValue>,
    fail: impl Fn(String) -> BridgeError,
) -> Result<T, BridgeError> {
    let promise = invoke.map_err(|e| fail(describe_js_error(&e)))?;
    let value = JsFuture::from(promise).await.map_err(|e| fail(describe_js_error(&e)))?;
    let raw: String = js_sys::JSON::stringify(&value)
        .map_err(|e| fail(describe_js_error(&e)))?
        .into();
    serde_json::from_str(&raw).map_err(|e| fail(e.to_string()))
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

/// `chrome.tabs` + `chrome.scripting`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl ChromeTabs {
    async fn query(&self, filter: serde_json::Value) -> Result<Vec<Tab>, BridgeError> {
        let raw: Vec<RawTab> = call(to_js(&filter).and_then(|q| tabs_query(&q)), BridgeError::Query).await?;
        Ok(raw
            .into_iter()
            .filter_map(|tab| tab.id.map(|id| Tab { id, url: tab.url }))
            .collect())
    }
}

#[async_trait(?Send)]
impl TabBridge for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<Tab>, BridgeError> {
        let tabs = self.query(serde_json::json!({ "active": true, "currentWindow": true })).await?;
        Ok(tabs.into_iter().next())
    }

    async fn tabs(&self) -> Result<Vec<Tab>, BridgeError> {
        self.query(serde_json::json!({})).await
    }

    async fn execute(&self, tab: TabId, command: &Command) -> Result<Reply, BridgeError> {
        let payload = encode_command(command)?;
        let rejected = |reason: String| BridgeError::Rejected { tab, reason };

        let injection = to_js(&serde_json::json!({ "target": { "tabId": tab }, "args": [payload] }))
            .and_then(|injection| {
                js_sys::Reflect::set(&injection, &JsValue::from_str("func"), &page_dispatch())?;
                Ok(injection)
            });
        let results: Vec<InjectionResult> = call(injection.and_then(|i| execute_script(&i)), rejected).await?;

        let raw = results
            .into_iter()
            .next()
            .and_then(|r| r.result)
            .ok_or(BridgeError::NoResult(tab))?;
        Ok(decode_reply(&raw)?)
    }
}

// --- Popup page ---

const DARK_TOGGLE_ID: &str = "darkToggle";
const IGNORE_TOGGLE_ID: &str = "ignoreIfDark";
const STATUS_TEXT_ID: &str = "statusText";
const PAGE_THEME_ID: &str = "pageTheme";

type ChromePopup = Popup<ChromeTabs, ChromeStorage>;

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

fn checkbox(id: &str) -> Option<web_sys::HtmlInputElement> {
    document()?.get_element_by_id(id)?.dyn_ref::<web_sys::HtmlInputElement>().cloned()
}

fn render(state: PopupState) {
    let Some(doc) = document() else {
        return;
    };
    if let Some(toggle) = checkbox(DARK_TOGGLE_ID) {
        toggle.set_checked(state.enabled);
    }
    if let Some(ignore) = checkbox(IGNORE_TOGGLE_ID) {
        ignore.set_checked(state.ignore_if_dark);
    }
    if let Some(status) = doc.get_element_by_id(STATUS_TEXT_ID) {
        status.set_text_content(Some(state.status_label()));
        status.set_class_name(state.status_class());
    }
    if let Some(theme) = doc.get_element_by_id(PAGE_THEME_ID) {
        theme.set_text_content(Some(state.theme_label()));
    }
}

/// Wire a checkbox's `change` event to an async popup action.
fn on_change<F, Fut>(popup: &Rc<ChromePopup>, id: &str, action: F)
where
    F: Fn(Rc<ChromePopup>, bool) -> Fut + 'static,
    Fut: std::future::Future<Output = ()> + 'static,
{
    let Some(input) = checkbox(id) else {
        log::warn!("popup: missing #{id}");
        return;
    };
    let popup = Rc::clone(popup);
    let target = input.clone();
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let checked = target.checked();
        let pending = action(Rc::clone(&popup), checked);
        let popup = Rc::clone(&popup);
        wasm_bindgen_futures::spawn_local(async move {
            pending.await;
            render(popup.state());
        });
    });
    if let Err(err) = input.add_event_listener_with_callback("change", handler.as_ref().unchecked_ref()) {
        log::warn!("popup: could not listen on #{id}: {}", describe_js_error(&err));
        return;
    }
    handler.forget();
}

/// Popup entry point.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).unwrap_or_default();

    let config = Config::from_build_env().unwrap_or_else(|err| {
        log::warn!("popup: {err}; using default config");
        Config::default()
    });
    let popup: Rc<ChromePopup> = Rc::new(Popup::new(ChromeTabs, ChromeStorage, config));

    on_change(&popup, DARK_TOGGLE_ID, |popup, checked| async move {
        popup.toggle_dark(checked).await;
    });
    on_change(&popup, IGNORE_TOGGLE_ID, |popup, checked| async move {
        popup.toggle_ignore(checked).await;
    });

    wasm_bindgen_futures::spawn_local(async move {
        render(popup.load().await);
    });
}

//! `chrome.storage.local` binding for [`PreferenceStore`].
//!
//! ERROR HANDLING
//! ==============
//! Read failures surface as [`StoreError`] so callers can fall back to
//! defaults. Write failures are logged and dropped: writes are fire-and-forget.

use std::collections::HashMap;

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::store::{PreferenceStore, StoreError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    fn storage_local_get(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    fn storage_local_set(items: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Render a thrown JS value for logs and error messages.
pub fn describe_js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// The extension's local storage area.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

#[async_trait(?Send)]
impl PreferenceStore for ChromeStorage {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, bool>, StoreError> {
        let request = js_sys::Array::new();
        for key in keys {
            request.push(&JsValue::from_str(key));
        }

        let promise = storage_local_get(&request).map_err(|e| StoreError::Unavailable(describe_js_error(&e)))?;
        let result = JsFuture::from(promise)
            .await
            .map_err(|e| StoreError::Unavailable(describe_js_error(&e)))?;
        let raw: String = js_sys::JSON::stringify(&result)
            .map_err(|e| StoreError::Malformed(describe_js_error(&e)))?
            .into();

        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(map
            .into_iter()
            .filter_map(|(key, value)| value.as_bool().map(|flag| (key, flag)))
            .collect())
    }

    fn set(&self, key: &str, value: bool) {
        let items = js_sys::Object::new();
        if let Err(err) = js_sys::Reflect::set(&items, &JsValue::from_str(key), &JsValue::from_bool(value)) {
            log::warn!("storage: failed to build write for {key}: {}", describe_js_error(&err));
            return;
        }

        match storage_local_set(&items) {
            Ok(promise) => {
                let key = key.to_owned();
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(err) = JsFuture::from(promise).await {
                        log::warn!("storage: write of {key} rejected: {}", describe_js_error(&err));
                    }
                });
            }
            Err(err) => log::warn!("storage: write of {key} failed: {}", describe_js_error(&err)),
        }
    }
}

//! Page-load reconciliation: read persisted flags, then apply them once.

#[cfg(test)]
#[path = "startup_test.rs"]
mod startup_test;

use std::cell::RefCell;

use protocol::keys::PreferenceKeys;
use protocol::store::{PreferenceStore, Preferences, load_preferences};

use crate::overlay::OverlayController;
use crate::page::{PageError, StyleHost, ThemeSource};

/// Read the flags for `keys`, treating an unreadable store as empty.
pub async fn read_preferences<S: PreferenceStore + ?Sized>(store: &S, keys: &PreferenceKeys) -> Preferences {
    match load_preferences(store, keys).await {
        Ok(prefs) => prefs,
        Err(err) => {
            log::warn!("startup: {err}; using defaults");
            Preferences::default()
        }
    }
}

/// Restore persisted preferences into `controller`.
///
/// The controller is only borrowed after the store read completes, so
/// commands arriving in the meantime are handled normally. Whatever flag
/// they set takes precedence over its stored value; the other flag is
/// still restored.
///
/// # Errors
///
/// Returns the page's [`PageError`] if the stylesheet cannot be changed.
pub async fn restore<P, S>(
    controller: &RefCell<OverlayController<P>>,
    store: &S,
    keys: &PreferenceKeys,
) -> Result<Preferences, PageError>
where
    P: ThemeSource + StyleHost,
    S: PreferenceStore + ?Sized,
{
    let prefs = read_preferences(store, keys).await;
    let mut controller = controller.borrow_mut();
    if controller.restore(prefs)? {
        log::info!(
            "startup: restored dark_mode={:?} ignore_if_dark={} active={}",
            prefs.dark_mode,
            prefs.ignore_if_dark,
            controller.is_active()
        );
    }
    Ok(controller.preferences())
}

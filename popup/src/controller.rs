//! Popup controller: load preferences, persist toggles, drive the pages.
//!
//! DESIGN
//! ======
//! Methods take `&self` and keep their borrows of the view state short, so
//! overlapping event handlers awaiting the bridge never contend for it.
//! Preferences are written before commands go out; a tab that misses the
//! command picks the new value up from the store on its next load.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::RefCell;

use protocol::config::{AbsentPolicy, Config};
use protocol::keys::{PreferenceKeys, Scope};
use protocol::store::{PreferenceStore, load_preferences, save_dark_mode, save_ignore_if_dark};
use protocol::{Command, Reply, Theme};

use crate::bridge::{Tab, TabBridge};
use crate::dispatch::{DispatchReport, broadcast, select_targets};
use crate::state::PopupState;

pub struct Popup<B, S> {
    bridge: B,
    store: S,
    config: Config,
    state: RefCell<PopupState>,
    active: RefCell<Option<Tab>>,
}

impl<B: TabBridge, S: PreferenceStore> Popup<B, S> {
    #[must_use]
    pub fn new(bridge: B, store: S, config: Config) -> Self {
        Self { bridge, store, config, state: RefCell::new(PopupState::default()), active: RefCell::new(None) }
    }

    #[must_use]
    pub fn state(&self) -> PopupState {
        *self.state.borrow()
    }

    /// Populate the view: active tab, persisted flags, page classification.
    pub async fn load(&self) -> PopupState {
        let active = match self.bridge.active_tab().await {
            Ok(tab) => tab,
            Err(err) => {
                log::warn!("popup: {err}");
                None
            }
        };
        self.active.replace(active.clone());

        let prefs = match self.keys() {
            Some(keys) => match load_preferences(&self.store, &keys).await {
                Ok(prefs) => prefs,
                Err(err) => {
                    log::warn!("popup: {err}; showing defaults");
                    protocol::store::Preferences::default()
                }
            },
            None => protocol::store::Preferences::default(),
        };

        let page_theme = match &active {
            Some(tab) => self.query_theme(tab).await,
            None => None,
        };

        let mut state = self.state.borrow_mut();
        state.enabled = prefs.dark_mode.unwrap_or(self.config.absent_policy == AbsentPolicy::Enable);
        state.ignore_if_dark = prefs.ignore_if_dark;
        state.page_theme = page_theme;
        *state
    }

    /// The dark toggle changed.
    pub async fn toggle_dark(&self, enabled: bool) -> DispatchReport {
        let ignore_if_dark = {
            let mut state = self.state.borrow_mut();
            state.enabled = enabled;
            state.ignore_if_dark
        };
        match self.keys() {
            Some(keys) => save_dark_mode(&self.store, &keys, enabled),
            None => log::debug!("popup: active page has no origin; not persisting"),
        }
        self.send(&Command::SetDark { enabled, ignore_if_dark: Some(ignore_if_dark) }).await
    }

    /// The ignore-if-dark checkbox changed.
    pub async fn toggle_ignore(&self, ignore: bool) -> DispatchReport {
        self.state.borrow_mut().ignore_if_dark = ignore;
        match self.keys() {
            Some(keys) => save_ignore_if_dark(&self.store, &keys, ignore),
            None => log::debug!("popup: active page has no origin; not persisting"),
        }
        self.send(&Command::SetIgnoreIfDark { ignore }).await
    }

    /// Storage keys for the current scope; `None` for per-origin scope on an
    /// origin-less page.
    fn keys(&self) -> Option<PreferenceKeys> {
        match self.config.scope {
            Scope::Global => Some(PreferenceKeys::for_scope(Scope::Global, "")),
            Scope::PerOrigin => {
                let origin = self.active.borrow().as_ref().and_then(Tab::origin)?;
                Some(PreferenceKeys::for_scope(Scope::PerOrigin, &origin))
            }
        }
    }

    async fn query_theme(&self, tab: &Tab) -> Option<Theme> {
        match self.bridge.execute(tab.id, &Command::GetTheme).await {
            Ok(Reply::Theme(theme)) => Some(theme),
            Ok(Reply::Ack) => None,
            Err(err) => {
                log::debug!("popup: theme unavailable: {err}");
                None
            }
        }
    }

    async fn send(&self, command: &Command) -> DispatchReport {
        let active = self.active.borrow().clone();
        let all = if self.config.scope == Scope::PerOrigin && active.is_none() {
            Vec::new()
        } else {
            match self.bridge.tabs().await {
                Ok(tabs) => tabs,
                Err(err) => {
                    log::warn!("popup: {err}; reaching active tab only");
                    active.iter().cloned().collect()
                }
            }
        };
        let targets = select_targets(self.config.scope, active.as_ref(), all);
        let report = broadcast(&self.bridge, &targets, command).await;
        log::info!("popup: {:?} delivered to {}/{} tabs", command, report.delivered.len(), report.attempted());
        report
    }
}

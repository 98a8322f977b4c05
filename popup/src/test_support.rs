//! Scripted tab bridge used by the popup tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use protocol::{Command, Reply, Theme};

use crate::bridge::{BridgeError, Tab, TabBridge, TabId};

#[derive(Debug, Default)]
pub struct FakeBridge {
    pub tabs: Vec<Tab>,
    pub active: Option<TabId>,
    /// Tabs whose injection is rejected.
    pub restricted: HashSet<TabId>,
    pub themes: HashMap<TabId, Theme>,
    pub fail_query: bool,
    /// Every (tab, command) that reached a content script.
    pub executed: RefCell<Vec<(TabId, Command)>>,
}

impl FakeBridge {
    pub fn with_tabs(urls: &[&str]) -> Self {
        let tabs = urls
            .iter()
            .zip(1..)
            .map(|(url, id)| Tab { id, url: Some((*url).to_owned()) })
            .collect();
        Self { tabs, active: Some(1), ..Self::default() }
    }

    pub fn executed_on(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self.executed.borrow().iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait(?Send)]
impl TabBridge for FakeBridge {
    async fn active_tab(&self) -> Result<Option<Tab>, BridgeError> {
        Ok(self.active.and_then(|id| self.tabs.iter().find(|tab| tab.id == id).cloned()))
    }

    async fn tabs(&self) -> Result<Vec<Tab>, BridgeError> {
        if self.fail_query {
            return Err(BridgeError::Query("tabs.query unavailable".into()));
        }
        Ok(self.tabs.clone())
    }

    async fn execute(&self, tab: TabId, command: &Command) -> Result<Reply, BridgeError> {
        if self.restricted.contains(&tab) {
            return Err(BridgeError::Rejected { tab, reason: "Cannot access a chrome:// URL".into() });
        }
        self.executed.borrow_mut().push((tab, command.clone()));
        Ok(match command {
            Command::GetTheme => Reply::Theme(self.themes.get(&tab).copied().unwrap_or_default()),
            _ => Reply::Ack,
        })
    }
}

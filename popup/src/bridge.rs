//! Popup-to-page command channel.
//!
//! Each call targets one tab and succeeds or fails on its own. Restricted
//! pages (`chrome://`, the web store, PDF viewers) reject injection outright;
//! that is an expected outcome, not a fault.

use async_trait::async_trait;
use protocol::{Command, ProtocolError, Reply};

/// Browser tab identifier.
pub type TabId = i32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    /// Absent when the extension lacks permission to see the URL.
    pub url: Option<String>,
}

impl Tab {
    #[must_use]
    pub fn origin(&self) -> Option<String> {
        self.url.as_deref().and_then(protocol::keys::origin_of)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The tab refused the injection (restricted scheme, closed, crashed).
    #[error("tab {tab} rejected injection: {reason}")]
    Rejected { tab: TabId, reason: String },
    /// The injection ran but the content script was not there to answer.
    #[error("tab {0} returned no result")]
    NoResult(TabId),
    /// Listing tabs failed.
    #[error("tab query failed: {0}")]
    Query(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Asynchronous access to tabs and their content scripts.
#[async_trait(?Send)]
pub trait TabBridge {
    /// The focused tab of the current window, if any.
    async fn active_tab(&self) -> Result<Option<Tab>, BridgeError>;

    /// Every open tab.
    async fn tabs(&self) -> Result<Vec<Tab>, BridgeError>;

    /// Run `command` in `tab`'s content script and return its reply.
    async fn execute(&self, tab: TabId, command: &Command) -> Result<Reply, BridgeError>;
}

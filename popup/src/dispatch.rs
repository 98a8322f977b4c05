//! Fan a command out to many tabs at once.
//!
//! ERROR HANDLING
//! ==============
//! A failing tab is recorded in the report and logged at debug level. It
//! never aborts the other deliveries and is never retried.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use futures::future::join_all;
use protocol::keys::Scope;
use protocol::{Command, Reply};

use crate::bridge::{Tab, TabBridge, TabId};

/// Outcome of one [`broadcast`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<(TabId, Reply)>,
    pub failed: Vec<TabId>,
}

impl DispatchReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Send `command` to every tab in `targets` concurrently.
pub async fn broadcast<B: TabBridge + ?Sized>(bridge: &B, targets: &[Tab], command: &Command) -> DispatchReport {
    let attempts = targets
        .iter()
        .map(|tab| async move { (tab.id, bridge.execute(tab.id, command).await) });

    let mut report = DispatchReport::default();
    for (id, result) in join_all(attempts).await {
        match result {
            Ok(reply) => report.delivered.push((id, reply)),
            Err(err) => {
                log::debug!("dispatch: skipping tab {id}: {err}");
                report.failed.push(id);
            }
        }
    }
    report
}

/// Tabs a preference change should reach.
///
/// Global flags reach every tab. Per-origin flags reach tabs sharing the
/// active tab's origin, and always the active tab itself.
#[must_use]
pub fn select_targets(scope: Scope, active: Option<&Tab>, all: Vec<Tab>) -> Vec<Tab> {
    match scope {
        Scope::Global => all,
        Scope::PerOrigin => {
            let Some(active) = active else {
                return Vec::new();
            };
            let origin = active.origin();
            let mut targets: Vec<Tab> = all
                .into_iter()
                .filter(|tab| tab.id != active.id && origin.is_some() && tab.origin() == origin)
                .collect();
            targets.insert(0, active.clone());
            targets
        }
    }
}

//! Popup control surface for the nophoton extension.
//!
//! Reads and writes the persisted flags and pushes each change to the
//! content scripts of the affected tabs. Tabs that cannot be reached are
//! skipped; the rest still get the command.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Load/toggle flow: persist, then dispatch |
//! | [`dispatch`] | Concurrent per-tab fan-out and target selection |
//! | [`bridge`] | Tab and injection seam |
//! | [`state`] | View state and labels |
//! | `browser` | `chrome.*` bindings and DOM wiring (`hydrate` only) |

pub mod bridge;
pub mod controller;
pub mod dispatch;
pub mod state;

#[cfg(feature = "hydrate")]
pub mod browser;

#[cfg(test)]
mod test_support;

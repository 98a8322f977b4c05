//! Shared command model and JSON codec for the popup/page bridge.
//!
//! This crate owns everything that crosses the boundary between the popup
//! and the content script running in each tab: the theme classification the
//! page reports, the commands the popup sends, the replies it gets back, the
//! preference key scheme and the persisted-store seam. Payloads travel as
//! JSON strings because the injection bridge only carries serializable values.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`keys`] | Preference scoping and storage key names |
//! | [`config`] | Build-time configuration (scope, absent-key policy) |
//! | [`store`] | Async preference store seam and load/save helpers |
//! | `chrome` | `chrome.storage.local` binding (`hydrate` only) |

pub mod config;
pub mod keys;
pub mod store;

#[cfg(feature = "hydrate")]
pub mod chrome;

#[cfg(test)]
#[path = "lib_test.rs"]
mod lib_test;

use serde::{Deserialize, Serialize};

/// Global function the content script installs for `Command::SetDark`.
pub const SET_DARK_FN: &str = "__nophotonSetDark";
/// Global function the content script installs for `Command::GetTheme`.
pub const GET_THEME_FN: &str = "__nophotonGetTheme";
/// Global function the content script installs for `Command::SetIgnoreIfDark`.
pub const SET_IGNORE_IF_DARK_FN: &str = "__nophotonSetIgnoreIfDark";
/// Global JSON entry point: takes an encoded [`Command`], returns an encoded [`Reply`].
pub const DISPATCH_FN: &str = "__nophotonDispatch";

/// Label shown when a page could not be queried (restricted scheme, no content script).
pub const UNAVAILABLE_LABEL: &str = "N/A";

/// Error returned by the codec functions.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The payload was not valid JSON for the expected type.
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Classification of a page's existing color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// The page already renders light-on-dark.
    Dark,
    /// The page renders dark-on-light.
    Light,
    /// No confident signal either way.
    #[default]
    Unknown,
}

impl Theme {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Unknown => "unknown",
        }
    }

    /// Capitalized name for display in the popup.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request from the popup to one page's content script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Turn the forced-dark overlay on or off.
    ///
    /// `ignore_if_dark` replaces the page's current ignore flag when present.
    SetDark {
        enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ignore_if_dark: Option<bool>,
    },
    /// Ask the page for its current classification.
    GetTheme,
    /// Update the "ignore if already dark" flag and re-evaluate.
    SetIgnoreIfDark { ignore: bool },
}

/// The content script's answer to a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Reply {
    /// The command was applied; nothing to report.
    Ack,
    /// Result of [`Command::GetTheme`].
    Theme(Theme),
}

/// Encode a command as a JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] if serialization fails, which does not
/// happen for the plain variants defined here.
pub fn encode_command(command: &Command) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(command)?)
}

/// Decode a command from a JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] for malformed JSON or unknown operations.
pub fn decode_command(raw: &str) -> Result<Command, ProtocolError> {
    Ok(serde_json::from_str(raw)?)
}

/// Encode a reply as a JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] if serialization fails.
pub fn encode_reply(reply: &Reply) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(reply)?)
}

/// Decode a reply from a JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] for malformed JSON or unknown kinds.
pub fn decode_reply(raw: &str) -> Result<Reply, ProtocolError> {
    Ok(serde_json::from_str(raw)?)
}

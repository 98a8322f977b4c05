//! Preference scoping and storage key names.
//!
//! Two flags are persisted: whether the overlay is enabled and whether it
//! should stand down on pages that are already dark. Under [`Scope::Global`]
//! they live under flat keys shared by every tab; under [`Scope::PerOrigin`]
//! each origin gets its own pair.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use serde::{Deserialize, Serialize};

/// Flat key for the enable flag.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Flat key for the ignore-if-dark flag.
pub const IGNORE_IF_DARK_KEY: &str = "ignoreIfDark";

/// Where preference flags are keyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// One pair of flags for every page; changes broadcast to all tabs.
    #[default]
    Global,
    /// One pair of flags per page origin.
    PerOrigin,
}

/// The concrete storage keys for one page under a given scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferenceKeys {
    pub dark_mode: String,
    pub ignore_if_dark: String,
}

impl PreferenceKeys {
    /// Resolve the keys for `origin` under `scope`.
    ///
    /// `origin` is ignored for [`Scope::Global`].
    #[must_use]
    pub fn for_scope(scope: Scope, origin: &str) -> Self {
        match scope {
            Scope::Global => Self {
                dark_mode: DARK_MODE_KEY.to_owned(),
                ignore_if_dark: IGNORE_IF_DARK_KEY.to_owned(),
            },
            Scope::PerOrigin => Self {
                dark_mode: format!("{DARK_MODE_KEY}_{origin}"),
                ignore_if_dark: format!("{IGNORE_IF_DARK_KEY}_{origin}"),
            },
        }
    }

    /// Both keys, enable flag first.
    #[must_use]
    pub fn all(&self) -> [&str; 2] {
        [&self.dark_mode, &self.ignore_if_dark]
    }
}

/// Extract `scheme://host[:port]` from a URL.
///
/// Scheme and host are lowercased and the default port for `http`/`https`
/// is dropped. Returns `None` for URLs without an authority (`about:blank`,
/// `data:`) or with an empty host (`file:///...`), which have no usable origin.
#[must_use]
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.trim().split_once("://")?;
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    let scheme = scheme.to_ascii_lowercase();

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    if host_port.is_empty() {
        return None;
    }

    let (host, port) = split_port(host_port);
    let host = host.to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }

    let default_port = match scheme.as_str() {
        "http" | "ws" => Some("80"),
        "https" | "wss" => Some("443"),
        _ => None,
    };
    match port {
        Some(p) if Some(p) != default_port => Some(format!("{scheme}://{host}:{p}")),
        _ => Some(format!("{scheme}://{host}")),
    }
}

/// Split an authority into host and optional port, keeping IPv6 brackets intact.
fn split_port(host_port: &str) -> (&str, Option<&str>) {
    if host_port.starts_with('[') {
        return match host_port.split_once("]:") {
            Some((host, port)) => (&host_port[..=host.len()], Some(port)),
            None => (host_port, None),
        };
    }
    match host_port.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => (host, Some(port)),
        Some((host, "")) => (host, None),
        _ => (host_port, None),
    }
}

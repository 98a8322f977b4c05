//! What the popup shows.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use protocol::{Theme, UNAVAILABLE_LABEL};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopupState {
    /// Dark toggle checkbox.
    pub enabled: bool,
    /// Ignore-if-dark checkbox.
    pub ignore_if_dark: bool,
    /// The active page's classification; `None` when it could not be queried.
    pub page_theme: Option<Theme>,
}

impl PopupState {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.enabled { "ON" } else { "OFF" }
    }

    /// CSS class for the status label.
    #[must_use]
    pub fn status_class(&self) -> &'static str {
        if self.enabled { "on" } else { "off" }
    }

    #[must_use]
    pub fn theme_label(&self) -> &'static str {
        self.page_theme.map_or(UNAVAILABLE_LABEL, Theme::label)
    }
}

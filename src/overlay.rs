//! Forced-dark overlay lifecycle and reconciliation.
//!
//! DESIGN
//! ======
//! The controller owns its page handle and the preferences last pushed to it.
//! Whether the stylesheet is present is always recomputed from those
//! preferences and a fresh classification; there is no separate "on" flag
//! that could drift. Apply and remove are idempotent so any command can be
//! replayed safely.
//!
//! While classifying, an active overlay is suspended so the page's own
//! colors are measured rather than the forced ones.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use protocol::config::AbsentPolicy;
use protocol::store::Preferences;
use protocol::{Command, Reply, Theme};

use crate::consts::{OVERLAY_CSS, STYLE_ID};
use crate::detect::detect_theme;
use crate::page::{PageError, StyleHost, ThemeSource};

/// Owns the injected stylesheet for one document.
#[derive(Debug)]
pub struct OverlayController<P> {
    page: P,
    prefs: Preferences,
    absent_policy: AbsentPolicy,
    /// Fields set by a command; a later startup restore leaves these alone.
    commanded: Commanded,
}

#[derive(Debug, Default, Clone, Copy)]
struct Commanded {
    dark_mode: bool,
    ignore_if_dark: bool,
}

impl<P: ThemeSource + StyleHost> OverlayController<P> {
    #[must_use]
    pub fn new(page: P, absent_policy: AbsentPolicy) -> Self {
        Self { page, prefs: Preferences::default(), absent_policy, commanded: Commanded::default() }
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    /// Whether the stylesheet is currently in the document.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.page.has_style(STYLE_ID)
    }

    // --- Stylesheet lifecycle ---

    /// Insert the stylesheet unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns the page's [`PageError`] if insertion fails.
    pub fn apply_overlay(&mut self) -> Result<(), PageError> {
        if self.is_active() {
            return Ok(());
        }
        self.page.insert_style(STYLE_ID, OVERLAY_CSS)?;
        log::info!("overlay: applied");
        Ok(())
    }

    /// Delete the stylesheet if present.
    ///
    /// # Errors
    ///
    /// Returns the page's [`PageError`] if removal fails.
    pub fn remove_overlay(&mut self) -> Result<(), PageError> {
        if !self.is_active() {
            return Ok(());
        }
        self.page.remove_style(STYLE_ID)?;
        log::info!("overlay: removed");
        Ok(())
    }

    // --- Queries ---

    /// Classify the page as it looks without the overlay.
    pub fn theme(&mut self) -> Theme {
        if !self.is_active() {
            return detect_theme(&self.page);
        }
        if let Err(err) = self.page.set_style_enabled(STYLE_ID, false) {
            log::warn!("overlay: could not suspend for detection: {err}");
        }
        let theme = detect_theme(&self.page);
        if let Err(err) = self.page.set_style_enabled(STYLE_ID, true) {
            log::warn!("overlay: could not resume after detection: {err}; reinserting");
            if let Err(err) = self.reinsert() {
                log::warn!("overlay: reinsert failed: {err}");
            }
        }
        theme
    }

    /// Replace a stylesheet stuck in the suspended state with a fresh one.
    fn reinsert(&mut self) -> Result<(), PageError> {
        self.page.remove_style(STYLE_ID)?;
        self.page.insert_style(STYLE_ID, OVERLAY_CSS)
    }

    // --- Commands ---

    /// Set the enable flag, optionally replacing the ignore flag, and reconcile.
    ///
    /// # Errors
    ///
    /// Returns the page's [`PageError`] if the stylesheet cannot be changed.
    pub fn set_dark_enabled(&mut self, enabled: bool, ignore_if_dark: Option<bool>) -> Result<(), PageError> {
        self.commanded.dark_mode = true;
        self.prefs.dark_mode = Some(enabled);
        if let Some(ignore) = ignore_if_dark {
            self.commanded.ignore_if_dark = true;
            self.prefs.ignore_if_dark = ignore;
        }
        self.reconcile()
    }

    /// Set the ignore flag and reconcile immediately.
    ///
    /// # Errors
    ///
    /// Returns the page's [`PageError`] if the stylesheet cannot be changed.
    pub fn set_ignore_if_dark(&mut self, ignore: bool) -> Result<(), PageError> {
        self.commanded.ignore_if_dark = true;
        self.prefs.ignore_if_dark = ignore;
        self.reconcile()
    }

    /// Install persisted preferences read at page load and reconcile.
    ///
    /// Fields already set by a command while the preferences were being read
    /// keep their commanded value. Returns `Ok(false)` without touching
    /// anything if every field was commanded.
    ///
    /// # Errors
    ///
    /// Returns the page's [`PageError`] if the stylesheet cannot be changed.
    pub fn restore(&mut self, prefs: Preferences) -> Result<bool, PageError> {
        let Commanded { dark_mode, ignore_if_dark } = self.commanded;
        if dark_mode && ignore_if_dark {
            log::debug!("overlay: startup restore superseded by commands");
            return Ok(false);
        }
        if !dark_mode {
            self.prefs.dark_mode = prefs.dark_mode;
        }
        if !ignore_if_dark {
            self.prefs.ignore_if_dark = prefs.ignore_if_dark;
        }
        self.reconcile()?;
        Ok(true)
    }

    /// Bring the stylesheet in line with the current preferences.
    ///
    /// # Errors
    ///
    /// Returns the page's [`PageError`] if the stylesheet cannot be changed.
    pub fn reconcile(&mut self) -> Result<(), PageError> {
        if self.wants_overlay() {
            self.apply_overlay()
        } else {
            self.remove_overlay()
        }
    }

    /// Execute a bridge command. Failures are logged; the reply is still sent.
    pub fn handle(&mut self, command: Command) -> Reply {
        let result = match command {
            Command::GetTheme => return Reply::Theme(self.theme()),
            Command::SetDark { enabled, ignore_if_dark } => self.set_dark_enabled(enabled, ignore_if_dark),
            Command::SetIgnoreIfDark { ignore } => self.set_ignore_if_dark(ignore),
        };
        if let Err(err) = result {
            log::warn!("overlay: command failed: {err}");
        }
        Reply::Ack
    }

    /// The reconciliation policy.
    ///
    /// - enable flag off: no overlay
    /// - enable flag on: overlay, unless ignoring dark pages and this one is dark
    /// - enable flag never stored: per [`AbsentPolicy`]; `AutoDetect` applies
    ///   only to pages that classify as [`Theme::Unknown`], and only while
    ///   not ignoring dark pages
    fn wants_overlay(&mut self) -> bool {
        let enabled = match (self.prefs.dark_mode, self.absent_policy) {
            (Some(flag), _) => flag,
            (None, AbsentPolicy::Enable) => true,
            (None, AbsentPolicy::Disable) => false,
            (None, AbsentPolicy::AutoDetect) => {
                return !self.prefs.ignore_if_dark && self.theme() == Theme::Unknown;
            }
        };
        enabled && !(self.prefs.ignore_if_dark && self.theme() == Theme::Dark)
    }
}

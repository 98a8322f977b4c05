//! The page seams the detector and overlay controller run against.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser binding implements these traits over `web-sys`; tests use an
//! in-memory page. Keeping the DOM behind a trait lets the controller own its
//! page as a plain value instead of reaching for ambient globals.

/// Error raised by a page implementation while reading or mutating the DOM.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// A DOM call threw.
    #[error("dom call failed: {0}")]
    Script(String),
    /// A required element does not exist (yet).
    #[error("missing element: {0}")]
    MissingElement(&'static str),
}

/// Elements the detector inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// `document.documentElement`.
    Root,
    /// `document.body`.
    Body,
}

impl Element {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "html",
            Self::Body => "body",
        }
    }
}

/// Read-only view of the signals theme detection uses.
///
/// Every accessor returns `Ok(None)` when the element does not exist.
pub trait ThemeSource {
    /// Raw `class` attribute.
    fn class_name(&self, element: Element) -> Result<Option<String>, PageError>;

    /// Computed `background-color`.
    fn background_color(&self, element: Element) -> Result<Option<String>, PageError>;

    /// Computed `color`.
    fn text_color(&self, element: Element) -> Result<Option<String>, PageError>;

    /// Whether the OS reports a dark color-scheme preference. `false` when unavailable.
    fn prefers_dark(&self) -> bool;
}

/// Mutation side: stylesheet nodes looked up by element id.
pub trait StyleHost {
    fn has_style(&self, id: &str) -> bool;

    /// Append a new `<style>` node. Callers check [`StyleHost::has_style`] first.
    fn insert_style(&mut self, id: &str, css: &str) -> Result<(), PageError>;

    /// Delete the node if present.
    fn remove_style(&mut self, id: &str) -> Result<(), PageError>;

    /// Toggle whether an existing node's rules apply. No-op if absent.
    fn set_style_enabled(&mut self, id: &str, enabled: bool) -> Result<(), PageError>;
}

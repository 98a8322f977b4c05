//! In-memory page used by the content-script tests.

use std::collections::HashMap;

use crate::consts::STYLE_ID;
use crate::page::{Element, PageError, StyleHost, ThemeSource};

/// Computed colors the overlay rules force onto every element.
const OVERLAY_BACKGROUND: &str = "rgb(27, 27, 27)";
const OVERLAY_TEXT: &str = "rgb(255, 255, 255)";

#[derive(Debug, Default, Clone)]
pub struct FakePage {
    pub classes: HashMap<Element, String>,
    pub backgrounds: HashMap<Element, String>,
    pub text: HashMap<Element, String>,
    pub prefers_dark: bool,
    pub has_body: bool,
    /// Element ids of `<style>` nodes, in insertion order, with their enabled flag.
    pub styles: Vec<(String, bool)>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Re-enabling a suspended stylesheet fails.
    pub fail_resume: bool,
}

impl FakePage {
    pub fn new() -> Self {
        Self { has_body: true, ..Self::default() }
    }

    pub fn with_class(mut self, element: Element, classes: &str) -> Self {
        self.classes.insert(element, classes.to_owned());
        self
    }

    pub fn with_background(mut self, element: Element, color: &str) -> Self {
        self.backgrounds.insert(element, color.to_owned());
        self
    }

    pub fn with_text(mut self, element: Element, color: &str) -> Self {
        self.text.insert(element, color.to_owned());
        self
    }

    pub fn with_prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    /// A page painted dark natively: near-black background, white text.
    pub fn dark() -> Self {
        Self::new()
            .with_background(Element::Body, "rgb(10, 10, 10)")
            .with_text(Element::Root, "rgb(255, 255, 255)")
    }

    /// A page painted light natively: near-white background, black text.
    pub fn light() -> Self {
        Self::new()
            .with_background(Element::Body, "rgb(250, 250, 250)")
            .with_text(Element::Root, "rgb(0, 0, 0)")
    }

    /// A page with no opaque background and no OS preference.
    pub fn unknown() -> Self {
        Self::new()
            .with_background(Element::Body, "rgba(0, 0, 0, 0)")
            .with_background(Element::Root, "rgba(0, 0, 0, 0)")
    }

    pub fn style_count(&self, id: &str) -> usize {
        self.styles.iter().filter(|(style_id, _)| style_id == id).count()
    }

    fn overlay_painting(&self) -> bool {
        self.styles.iter().any(|(id, enabled)| id == STYLE_ID && *enabled)
    }

    fn read<'a>(&self, map: &'a HashMap<Element, String>, element: Element) -> Result<Option<&'a String>, PageError> {
        if self.fail_reads {
            return Err(PageError::Script("getComputedStyle threw".into()));
        }
        if element == Element::Body && !self.has_body {
            return Ok(None);
        }
        Ok(map.get(&element))
    }
}

impl ThemeSource for FakePage {
    fn class_name(&self, element: Element) -> Result<Option<String>, PageError> {
        Ok(self.read(&self.classes, element)?.cloned())
    }

    fn background_color(&self, element: Element) -> Result<Option<String>, PageError> {
        let declared = self.read(&self.backgrounds, element)?.cloned();
        if self.overlay_painting() && (element == Element::Root || self.has_body) {
            return Ok(Some(OVERLAY_BACKGROUND.to_owned()));
        }
        Ok(declared)
    }

    fn text_color(&self, element: Element) -> Result<Option<String>, PageError> {
        let declared = self.read(&self.text, element)?.cloned();
        if self.overlay_painting() {
            return Ok(Some(OVERLAY_TEXT.to_owned()));
        }
        Ok(declared)
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }
}

impl StyleHost for FakePage {
    fn has_style(&self, id: &str) -> bool {
        self.style_count(id) > 0
    }

    fn insert_style(&mut self, id: &str, _css: &str) -> Result<(), PageError> {
        if self.fail_writes {
            return Err(PageError::Script("appendChild threw".into()));
        }
        self.styles.push((id.to_owned(), true));
        Ok(())
    }

    fn remove_style(&mut self, id: &str) -> Result<(), PageError> {
        if self.fail_writes {
            return Err(PageError::Script("remove threw".into()));
        }
        if let Some(pos) = self.styles.iter().position(|(style_id, _)| style_id == id) {
            self.styles.remove(pos);
        }
        Ok(())
    }

    fn set_style_enabled(&mut self, id: &str, enabled: bool) -> Result<(), PageError> {
        if enabled && self.fail_resume {
            return Err(PageError::Script("removeAttribute threw".into()));
        }
        if let Some(style) = self.styles.iter_mut().find(|(style_id, _)| style_id == id) {
            style.1 = enabled;
        }
        Ok(())
    }
}

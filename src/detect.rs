//! Theme detection: is the page already dark, already light, or unclear?
//!
//! Signals are consulted in priority order, first match wins:
//!
//! 1. Class names on `<html>` and `<body>`. Dark tokens are checked before
//!    light tokens; a substring hit on either element counts.
//! 2. The first non-transparent computed background along `body -> html`,
//!    compared against the root text color. A dark background under light
//!    text is dark, the reverse is light; anything ambiguous falls back to
//!    the background alone.
//! 3. The OS `prefers-color-scheme` signal, only when no element paints an
//!    opaque background at all.
//!
//! Detection is a snapshot. It runs at startup and on explicit commands and
//! does not watch the DOM for later changes.

#[cfg(test)]
#[path = "detect_test.rs"]
mod detect_test;

use protocol::Theme;

use crate::color::{luminance, parse_css_color};
use crate::consts::{DARK_CLASS_TOKENS, LIGHT_CLASS_TOKENS, LUMINANCE_MIDPOINT, NEUTRAL_LUMINANCE};
use crate::page::{Element, PageError, ThemeSource};

/// Elements whose backgrounds are tried, innermost first.
const BACKGROUND_CHAIN: [Element; 2] = [Element::Body, Element::Root];

/// Classify the page. Never fails: page errors degrade to [`Theme::Unknown`].
pub fn detect_theme<S: ThemeSource + ?Sized>(page: &S) -> Theme {
    match classify(page) {
        Ok(theme) => theme,
        Err(err) => {
            log::warn!("detect: {err}; reporting unknown");
            Theme::Unknown
        }
    }
}

/// Classify the page, surfacing page errors to the caller.
///
/// # Errors
///
/// Returns the first [`PageError`] raised by `page`.
pub fn classify<S: ThemeSource + ?Sized>(page: &S) -> Result<Theme, PageError> {
    let root_classes = page.class_name(Element::Root)?.unwrap_or_default().to_lowercase();
    let body_classes = page.class_name(Element::Body)?.unwrap_or_default().to_lowercase();
    if let Some(theme) = class_signal(&root_classes, &body_classes) {
        log::debug!("detect: class signal -> {theme}");
        return Ok(theme);
    }

    let Some(background) = first_opaque_background(page)? else {
        let theme = if page.prefers_dark() { Theme::Dark } else { Theme::Unknown };
        log::debug!("detect: no opaque background, os preference -> {theme}");
        return Ok(theme);
    };

    let text = page
        .text_color(Element::Root)?
        .map_or(NEUTRAL_LUMINANCE, |raw| luminance(&raw));
    let theme = contrast_theme(luminance(&background), text);
    log::debug!("detect: background {background} -> {theme}");
    Ok(theme)
}

/// Theme implied by class names alone, if any token matches.
fn class_signal(root_classes: &str, body_classes: &str) -> Option<Theme> {
    let hit = |tokens: &[&str]| {
        tokens
            .iter()
            .any(|token| root_classes.contains(token) || body_classes.contains(token))
    };
    if hit(&DARK_CLASS_TOKENS) {
        Some(Theme::Dark)
    } else if hit(&LIGHT_CLASS_TOKENS) {
        Some(Theme::Light)
    } else {
        None
    }
}

/// The first background along [`BACKGROUND_CHAIN`] that actually paints.
///
/// Unparsable values count as painting; they score neutral luminance later.
fn first_opaque_background<S: ThemeSource + ?Sized>(page: &S) -> Result<Option<String>, PageError> {
    for element in BACKGROUND_CHAIN {
        let Some(raw) = page.background_color(element)? else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        if parse_css_color(&raw).is_some_and(|c| c.is_transparent()) {
            continue;
        }
        return Ok(Some(raw));
    }
    Ok(None)
}

/// Decide from background and text luminance.
pub(crate) fn contrast_theme(background: f64, text: f64) -> Theme {
    if background < LUMINANCE_MIDPOINT && text > LUMINANCE_MIDPOINT {
        return Theme::Dark;
    }
    if background > LUMINANCE_MIDPOINT && text < LUMINANCE_MIDPOINT {
        return Theme::Light;
    }
    // Ambiguous contrast: the background decides.
    if background >= LUMINANCE_MIDPOINT { Theme::Light } else { Theme::Dark }
}

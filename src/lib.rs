//! Content script for the nophoton forced-dark extension.
//!
//! This crate is compiled to WebAssembly and injected into every page. It
//! decides whether the page is already dark, light, or unclear, and keeps a
//! single forced-dark stylesheet in or out of the document according to the
//! user's persisted flags and the commands the popup sends.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`color`] | CSS color parsing and perceptual luminance |
//! | [`detect`] | Theme classification heuristic |
//! | [`overlay`] | Stylesheet lifecycle and reconciliation policy |
//! | [`startup`] | Page-load restore from the preference store |
//! | [`page`] | DOM seams the above run against |
//! | [`consts`] | Stylesheet id and rules, class vocabularies, thresholds |
//! | `browser` | `web-sys` binding and exported globals (`hydrate` only) |

pub mod color;
pub mod consts;
pub mod detect;
pub mod overlay;
pub mod page;
pub mod startup;

#[cfg(feature = "hydrate")]
pub mod browser;

#[cfg(test)]
mod test_support;

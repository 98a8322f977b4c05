//! Shared constants for the content script.

// ── Overlay ─────────────────────────────────────────────────────

/// Element id of the injected stylesheet. At most one node carries it.
pub const STYLE_ID: &str = "__nophoton_style__";

/// Media query written onto the stylesheet while detection runs, so the
/// page's own colors are measured instead of the overlay's.
pub const SUSPENDED_MEDIA: &str = "not all";

/// Forced-dark rules injected into the page.
pub const OVERLAY_CSS: &str = r"
      html, body, * {
        background-color: #1b1b1b !important;
        color: #ffffff !important;
        border-color: #444444 !important;
      }
      a, a * {
        color: #7eb8f7 !important;
      }
      img, video, canvas, svg {
        filter: brightness(0.85);
      }
    ";

// ── Detection ───────────────────────────────────────────────────

/// Class-name fragments that mark a page as already dark.
pub const DARK_CLASS_TOKENS: [&str; 6] = ["dark", "dark-mode", "is-dark", "theme-dark", "darkmode", "nocturne"];

/// Class-name fragments that mark a page as explicitly light.
pub const LIGHT_CLASS_TOKENS: [&str; 4] = ["light", "light-mode", "is-light", "theme-light"];

/// OS-level dark preference query.
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Midpoint of the 0..=255 luminance range; the dark/light threshold.
pub const LUMINANCE_MIDPOINT: f64 = 128.0;

/// Luminance assigned to colors that cannot be parsed.
pub const NEUTRAL_LUMINANCE: f64 = 128.0;

/// Perceptual channel weights (ITU-R BT.601).
pub const LUMA_WEIGHTS: (f64, f64, f64) = (0.299, 0.587, 0.114);

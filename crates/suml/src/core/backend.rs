//! Seams to the external tools that turn markup into pictures
//!
//! Layout, typesetting, rasterizing and font lookup are delegated. The core
//! only sees these traits; the CLI implements them by spawning processes and
//! tests implement them with canned documents.

use anyhow::Result;

/// Turns emitted markup into an SVG document
pub trait RenderBackend {
    /// Lay out graph-description markup
    fn render_graph(&self, markup: &str) -> Result<String>;

    /// Typeset picture-description markup
    fn render_pic(&self, markup: &str) -> Result<String>;
}

/// Turns SVG into a bitmap
pub trait Rasterizer {
    /// Convert an SVG document into PNG bytes
    fn rasterize(&self, svg: &str) -> Result<Vec<u8>>;

    /// Trim uniform borders from PNG bytes
    fn autocrop(&self, bitmap: &[u8]) -> Result<Vec<u8>>;
}

/// Reports whether a font family is installed
pub trait FontProbe {
    fn font_installed(&self, name: &str) -> bool;
}

/// Fonts with a hand-drawn look, in order of preference
pub const SCRUFFY_FONTS: &[&str] = &["Purisa"];

/// First installed hand-drawn font, if any
pub fn default_scruffy_font(probe: &dyn FontProbe) -> Option<String> {
    SCRUFFY_FONTS
        .iter()
        .find(|name| probe.font_installed(name))
        .map(|name| name.to_string())
}

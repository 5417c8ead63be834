//! Render configuration
//!
//! One [`RenderConfig`] drives a whole run: which font the markup asks for,
//! and whether the rendered SVG gets the hand-drawn treatment.

use super::backend::{default_scruffy_font, FontProbe};
use crate::sketch::SketchOptions;

/// Picture macros inlined into sequence markup when no prelude path is set
pub const SEQUENCE_PRELUDE: &str = include_str!("../../assets/sequence.pic");

/// Configuration consumed by emitters and the sketch pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Font family for node, edge and cluster text
    pub font: Option<String>,
    /// Post-process rendered SVG to look hand-drawn
    pub scruffy: bool,
    /// Drop shadows behind sketched polygons
    pub shadow: bool,
    /// Gradient fills for sketched polygons
    pub gradient: bool,
    /// Path of a picture macro file to `copy` instead of the bundled macros
    pub sequence_prelude: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: None,
            scruffy: false,
            shadow: false,
            gradient: true,
            sequence_prelude: None,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_scruffy(mut self, scruffy: bool) -> Self {
        self.scruffy = scruffy;
        self
    }

    pub fn with_shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn with_gradient(mut self, gradient: bool) -> Self {
        self.gradient = gradient;
        self
    }

    pub fn with_sequence_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.sequence_prelude = Some(prelude.into());
        self
    }

    /// Fill in a hand-drawn font for scruffy output when none is configured.
    pub fn resolve_font(mut self, probe: &dyn FontProbe) -> Self {
        if self.scruffy && self.font.is_none() {
            self.font = default_scruffy_font(probe);
        }
        self
    }

    /// Options for the sketch pass
    pub fn sketch_options(&self) -> SketchOptions {
        SketchOptions {
            font: self.font.clone(),
            shadow: self.shadow,
            gradient: self.gradient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoFonts;

    impl FontProbe for NoFonts {
        fn font_installed(&self, _name: &str) -> bool {
            false
        }
    }

    struct AllFonts;

    impl FontProbe for AllFonts {
        fn font_installed(&self, _name: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert!(config.font.is_none());
        assert!(!config.scruffy);
        assert!(!config.shadow);
        assert!(config.gradient);
        assert!(config.sequence_prelude.is_none());
    }

    #[test]
    fn test_bundled_prelude_defines_emitted_macros() {
        for name in ["object3", "step", "active", "message", "complete"] {
            assert!(
                SEQUENCE_PRELUDE.contains(&format!("define {} {{", name)),
                "missing macro {}",
                name
            );
        }
    }

    #[test]
    fn test_resolve_font_only_for_scruffy() {
        let plain = RenderConfig::new().resolve_font(&AllFonts);
        assert!(plain.font.is_none());

        let scruffy = RenderConfig::new().with_scruffy(true).resolve_font(&AllFonts);
        assert_eq!(scruffy.font.as_deref(), Some("Purisa"));

        let missing = RenderConfig::new().with_scruffy(true).resolve_font(&NoFonts);
        assert!(missing.font.is_none());
    }

    #[test]
    fn test_explicit_font_wins() {
        let config = RenderConfig::new()
            .with_scruffy(true)
            .with_font("Comic Neue")
            .resolve_font(&AllFonts);
        assert_eq!(config.font.as_deref(), Some("Comic Neue"));
    }

    #[test]
    fn test_sketch_options() {
        let options = RenderConfig::new()
            .with_font("Purisa")
            .with_shadow(true)
            .with_gradient(false)
            .sketch_options();
        assert_eq!(options.font.as_deref(), Some("Purisa"));
        assert!(options.shadow);
        assert!(!options.gradient);
    }
}

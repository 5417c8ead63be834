//! Scruffy sketch pass for rendered SVG
//!
//! Makes layout-engine output look hand-drawn: lines gain a slight wobble,
//! shapes get solid or gradient fills and optional drop shadows.

pub mod dom;
pub mod geometry;
mod transform;

pub use dom::{SvgDocument, SvgElement, SvgNode, XML_PROLOG};
pub use geometry::{CoordinateUnit, Point};
pub use transform::{
    gradient_id, sketch, sketch_document, ColorSet, SketchOptions, SketchStats, BLUR_FILTER_ID,
    SHADOW_COLOR, SHADOW_OFFSET,
};

//! Structural (class) diagram plugin
//!
//! Parses yUML class shorthand and emits Graphviz `dot` input.

mod database;
mod emitter;
mod parser;

pub use database::{ClassDatabase, ShapeKind, ShapeStyle};
pub use emitter::{escape_label, format_label, ClassEmitter, RankDir, RANK_THRESHOLD, WRAP_WIDTH};
pub use parser::{
    parse_connector, ArrowHead, ClassClassifier, ClassParser, ClassPart, EdgeEnd, LineStyle,
};

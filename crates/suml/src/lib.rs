//! suml - compile yUML-style shorthand into diagram markup
//!
//! Class diagrams compile to Graphviz `dot` input and sequence diagrams to
//! PIC input. Rendered SVG can then be given a hand-drawn "scruffy" look.
//!
//! # Quick Start
//!
//! ```rust
//! use suml::compile_class;
//!
//! let dot = compile_class("[Customer]<>-[Order]").unwrap();
//! assert!(dot.starts_with("digraph G {"));
//! assert!(dot.contains("A000 -> A001"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use suml::prelude::*;
//!
//! let mut database = ClassDatabase::new();
//! ClassParser::new()
//!     .parse("[Customer|name;email]\n[Customer]->[Order]", &mut database)
//!     .unwrap();
//!
//! // The richest declaration of a box wins.
//! let customer = database.registry().by_name("Customer").unwrap();
//! assert_eq!(customer.spec(), "Customer|name;email");
//!
//! let dot = ClassEmitter::new().emit(&database).unwrap();
//! assert!(dot.contains("rankdir = LR"));
//! ```

pub mod core;
pub mod plugins;
pub mod sketch;

pub use self::core::*;

use crate::plugins::{
    ClassDatabase, ClassParser, DiagramKind, Orchestrator, SequenceDatabase, SequenceParser,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        BoxId, BoxRegistry, Database, DiagramError, Emitter, Parser, RenderBackend, RenderConfig,
    };
    pub use crate::plugins::class::{ClassDatabase, ClassEmitter, ClassParser, ClassPart};
    pub use crate::plugins::orchestrator::{DiagramKind, Orchestrator};
    pub use crate::plugins::sequence::{
        SequenceDatabase, SequenceEmitter, SequenceParser, SequencePart,
    };
    pub use crate::sketch::{sketch, SketchOptions, SvgDocument};
}

/// Compile shorthand of the given kind to backend markup with default settings.
///
/// # Example
/// ```rust
/// use suml::{compile, plugins::DiagramKind};
///
/// let pic = compile(DiagramKind::Sequence, "[A]hello>[B]").unwrap();
/// assert!(pic.contains("message(A000,A001,\"hello\");"));
/// ```
pub fn compile(kind: DiagramKind, input: &str) -> anyhow::Result<String> {
    Orchestrator::default().compile(kind, input)
}

/// Compile class shorthand to Graphviz markup.
pub fn compile_class(input: &str) -> anyhow::Result<String> {
    Orchestrator::default().compile_class(input)
}

/// Compile sequence shorthand to PIC markup.
pub fn compile_sequence(input: &str) -> anyhow::Result<String> {
    Orchestrator::default().compile_sequence(input)
}

/// Parse class shorthand into a database without emitting
///
/// # Example
/// ```rust
/// use suml::{parse_class, Database};
///
/// let db = parse_class("[A]->[B]\n[B]->[C]").unwrap();
/// assert_eq!(db.box_count(), 3);
/// assert_eq!(db.edge_count(), 2);
/// ```
pub fn parse_class(input: &str) -> anyhow::Result<ClassDatabase> {
    let mut database = ClassDatabase::new();
    ClassParser::new().parse(input, &mut database)?;
    Ok(database)
}

/// Parse sequence shorthand into a database without emitting
pub fn parse_sequence(input: &str) -> anyhow::Result<SequenceDatabase> {
    let mut database = SequenceDatabase::new();
    SequenceParser::new().parse(input, &mut database)?;
    Ok(database)
}

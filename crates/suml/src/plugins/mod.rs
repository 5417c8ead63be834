//! Grammar plugins and the pipeline that drives them
//!
//! Each grammar implements the core traits: a classifier-backed parser, a
//! database that owns the box registry for one run, and a markup emitter.

pub mod class;
pub mod orchestrator;
pub mod sequence;

pub use class::*;
pub use orchestrator::*;
pub use sequence::*;

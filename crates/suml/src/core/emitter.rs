//! Core emitter trait for backend markup

use anyhow::Result;

use super::Database;

/// Core trait for markup emitters
///
/// An emitter turns a populated database into the text an external renderer
/// consumes.
///
/// # Example
/// ```
/// use suml::core::{Emitter, Parser};
/// use suml::plugins::sequence::{SequenceDatabase, SequenceEmitter, SequenceParser};
///
/// let mut db = SequenceDatabase::new();
/// SequenceParser::new().parse("[A]hello>[B]", &mut db).unwrap();
/// let pic = SequenceEmitter::new().emit(&db).unwrap();
/// assert!(pic.contains("message(A000,A001,\"hello\");"));
/// ```
pub trait Emitter<D: Database>: Send + Sync {
    /// Render the database into markup
    fn emit(&self, database: &D) -> Result<String>;

    /// Get the name of this emitter
    fn name(&self) -> &'static str;

    /// Get the markup language produced
    fn format(&self) -> &'static str;
}

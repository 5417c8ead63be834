//! Core parser trait for diagram shorthand

use anyhow::Result;

use super::Database;

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use suml::core::{Database, Parser};
/// use suml::plugins::class::{ClassDatabase, ClassParser};
///
/// let parser = ClassParser::new();
/// let mut db = ClassDatabase::new();
/// parser.parse("[Customer]->[Order]", &mut db).unwrap();
/// assert_eq!(db.box_count(), 2);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse diagram shorthand into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;
}

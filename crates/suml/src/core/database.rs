//! Core database trait for parsed diagram data
//!
//! A database owns everything one compilation run learns from its input: the
//! ordered statements and the box registry. It is created per run, filled by
//! a parser, read by an emitter and then dropped.

use anyhow::Result;

use super::{BoxRegistry, Statement};

/// Core trait for diagram databases
///
/// `Part` is the grammar's closed part type, so an emitter matching on it
/// must handle every variant.
pub trait Database: Send + Sync {
    /// The statement part type of this grammar
    type Part: Clone + Send + Sync;

    /// Record a statement, registering any boxes it declares
    fn add_statement(&mut self, statement: Statement<Self::Part>) -> Result<()>;

    /// Statements in parse order
    fn statements(&self) -> &[Statement<Self::Part>];

    /// Boxes registered so far
    fn registry(&self) -> &BoxRegistry;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of statements
    fn statement_count(&self) -> usize {
        self.statements().len()
    }

    /// Get the number of distinct boxes
    fn box_count(&self) -> usize {
        self.registry().len()
    }
}

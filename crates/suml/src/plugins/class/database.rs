//! Structural diagram database
//!
//! Stores statements in parse order and registers every shape they declare.

use std::collections::HashMap;

use anyhow::Result;

use super::parser::ClassPart;
use crate::core::{BoxId, BoxRegistry, Database, Statement};

/// Shape family a box was first declared as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Record,
    Note,
    Cluster,
}

/// Styling remembered per box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeStyle {
    pub kind: ShapeKind,
    /// First non-empty background seen for the box
    pub background: Option<String>,
}

/// Structural diagram database
#[derive(Debug, Default)]
pub struct ClassDatabase {
    statements: Vec<Statement<ClassPart>>,
    registry: BoxRegistry,
    styles: HashMap<BoxId, ShapeStyle>,
}

impl ClassDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn register_part(&mut self, part: &ClassPart) {
        let (label, kind, background) = match part {
            ClassPart::Record { label, background } => (label, ShapeKind::Record, background),
            ClassPart::Note { text, background } => (text, ShapeKind::Note, background),
            ClassPart::Cluster {
                label, background, ..
            } => (label, ShapeKind::Cluster, background),
            ClassPart::Edge { .. } => return,
        };

        let id = self.registry.register(label);
        let style = self.styles.entry(id).or_insert_with(|| ShapeStyle {
            kind,
            background: None,
        });
        if style.background.is_none() {
            style.background = background.clone();
        }
    }

    /// Styling for a registered box
    pub fn style(&self, id: BoxId) -> Option<&ShapeStyle> {
        self.styles.get(&id)
    }

    /// Number of statements with an edge between two shapes
    pub fn edge_count(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s.triple(), Some((_, ClassPart::Edge { .. }, _))))
            .count()
    }
}

impl Database for ClassDatabase {
    type Part = ClassPart;

    fn add_statement(&mut self, statement: Statement<ClassPart>) -> Result<()> {
        for part in statement.parts() {
            self.register_part(part);
        }
        self.statements.push(statement);
        Ok(())
    }

    fn statements(&self) -> &[Statement<ClassPart>] {
        &self.statements
    }

    fn registry(&self) -> &BoxRegistry {
        &self.registry
    }

    fn clear(&mut self) {
        self.statements.clear();
        self.registry.clear();
        self.styles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parser;
    use crate::plugins::class::ClassParser;

    fn parse(input: &str) -> ClassDatabase {
        let mut db = ClassDatabase::new();
        ClassParser::new().parse(input, &mut db).unwrap();
        db
    }

    #[test]
    fn test_boxes_registered_once() {
        let db = parse("[Customer]->[Order]\n[Order]->[Customer]");
        assert_eq!(db.box_count(), 2);
        assert_eq!(db.statement_count(), 2);
        assert_eq!(db.edge_count(), 2);
    }

    #[test]
    fn test_rich_declaration_wins() {
        let db = parse("[Customer|name;email]\n[Customer]->[Order]");
        let customer = db.registry().by_name("Customer").unwrap();
        assert_eq!(customer.spec(), "Customer|name;email");
    }

    #[test]
    fn test_background_remembered_from_later_declaration() {
        let db = parse("[Customer]->[Order]\n[Customer{bg:orange}]");
        let id = db.registry().lookup("Customer").unwrap();
        assert_eq!(db.style(id).unwrap().background.as_deref(), Some("orange"));
        assert_eq!(db.style(id).unwrap().kind, ShapeKind::Record);
    }

    #[test]
    fn test_note_kind() {
        let db = parse("[Address]-[note: Value Object]");
        let id = db.registry().lookup("Value Object").unwrap();
        assert_eq!(db.style(id).unwrap().kind, ShapeKind::Note);
    }

    #[test]
    fn test_clear() {
        let mut db = parse("[A]->[B]");
        db.clear();
        assert_eq!(db.box_count(), 0);
        assert_eq!(db.statement_count(), 0);
    }
}

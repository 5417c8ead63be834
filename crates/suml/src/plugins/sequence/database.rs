//! Sequence diagram database
//!
//! Boxes are sized and spaced as statements arrive, so a box keeps the width
//! of the label it had when first seen.

use anyhow::Result;
use tracing::trace;

use super::parser::{MessageDirection, SequencePart};
use crate::core::{BoxId, BoxRegistry, Database, DiagramError, Statement};

/// Layout units per label character
pub const CHAR_WIDTH: f64 = 0.13;

/// A message between two boxes, in drawing order
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceMessage {
    pub from: BoxId,
    pub to: BoxId,
    pub text: String,
}

/// Sequence diagram database
#[derive(Debug, Default)]
pub struct SequenceDatabase {
    statements: Vec<Statement<SequencePart>>,
    registry: BoxRegistry,
    messages: Vec<SequenceMessage>,
}

impl SequenceDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[SequenceMessage] {
        &self.messages
    }

    /// Register a box and size it if this is its first appearance.
    fn place(&mut self, label: &str) -> (BoxId, f64) {
        let id = self.registry.register(label);
        let width = self.registry.get_mut(id).size(CHAR_WIDTH);
        (id, width)
    }

    fn add_message(
        &mut self,
        left: &str,
        direction: MessageDirection,
        text: &str,
        right: &str,
    ) -> SequenceMessage {
        let (left_id, left_width) = self.place(left);
        let (right_id, right_width) = self.place(right);

        let message_width = text.chars().count() as f64 * CHAR_WIDTH;
        let gap = message_width - left_width / 2.0 - right_width / 2.0;
        let leftmost = left_id.min(right_id);
        if self.registry.get_mut(leftmost).reserve_right_margin(gap) {
            trace!(box_id = %leftmost, gap, "Reserved message spacing");
        }

        let (from, to) = match direction {
            MessageDirection::Forward => (left_id, right_id),
            MessageDirection::Reverse => (right_id, left_id),
        };
        SequenceMessage {
            from,
            to,
            text: text.to_string(),
        }
    }
}

impl Database for SequenceDatabase {
    type Part = SequencePart;

    fn add_statement(&mut self, statement: Statement<SequencePart>) -> Result<()> {
        match statement.parts() {
            [SequencePart::Record { label }] => {
                self.place(label);
            }
            [SequencePart::Record { label: left }, SequencePart::Message { direction, text }, SequencePart::Record { label: right }] =>
            {
                let message = self.add_message(left, *direction, text, right);
                self.messages.push(message);
            }
            parts => {
                let found = parts
                    .iter()
                    .find(|part| matches!(part, SequencePart::Message { .. }))
                    .map(SequencePart::kind)
                    .unwrap_or("record");
                let expected = if parts.len() == 1 { "record" } else { "message" };
                return Err(DiagramError::unexpected_part(expected, found, statement.source()).into());
            }
        }
        self.statements.push(statement);
        Ok(())
    }

    fn statements(&self) -> &[Statement<SequencePart>] {
        &self.statements
    }

    fn registry(&self) -> &BoxRegistry {
        &self.registry
    }

    fn clear(&mut self) {
        self.statements.clear();
        self.registry.clear();
        self.messages.clear();
    }
}

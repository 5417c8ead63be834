//! Sequence diagram parser
//!
//! ```text
//! [Patron]order food>[Waiter]
//! [Waiter]<serve wine[Cook]
//! ```

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::database::SequenceDatabase;
use crate::core::{
    normalize_lines, unescape, Database, DiagramError, Lexeme, Parser, PartClassifier, Statement,
    StatementStream, Token,
};

/// Side a message's direction marker points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    /// `>`: left box sends to right box
    Forward,
    /// `<`: right box sends to left box
    Reverse,
}

impl MessageDirection {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '>' => Some(MessageDirection::Forward),
            '<' => Some(MessageDirection::Reverse),
            _ => None,
        }
    }

    pub fn marker(self) -> char {
        match self {
            MessageDirection::Forward => '>',
            MessageDirection::Reverse => '<',
        }
    }
}

/// One part of a sequence statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencePart {
    Record {
        label: String,
    },
    Message {
        direction: MessageDirection,
        text: String,
    },
}

impl SequencePart {
    pub fn kind(&self) -> &'static str {
        match self {
            SequencePart::Record { .. } => "record",
            SequencePart::Message { .. } => "message",
        }
    }
}

/// Decode a message token: the marker may lead or trail the text.
pub fn parse_message(raw: &str) -> Option<SequencePart> {
    let (marker, text) = match (raw.chars().next(), raw.chars().last()) {
        (Some(first @ ('<' | '>')), _) => (first, &raw[1..]),
        (_, Some(last @ ('<' | '>'))) => (last, &raw[..raw.len() - 1]),
        _ => return None,
    };
    let direction = MessageDirection::from_marker(marker)?;
    Some(SequencePart::Message {
        direction,
        text: unescape(text.trim()),
    })
}

/// Token classification for the sequence grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceClassifier;

impl PartClassifier for SequenceClassifier {
    type Part = SequencePart;

    fn classify(&self, token: &Token) -> Result<Lexeme<SequencePart>, DiagramError> {
        let raw = token.raw();
        if token.is_separator() {
            return Ok(Lexeme::Separator);
        }
        if token.is_shape() {
            return Ok(Lexeme::Part(SequencePart::Record {
                label: unescape(raw[1..raw.len() - 1].trim()),
            }));
        }
        match parse_message(raw) {
            Some(message) => Ok(Lexeme::Part(message)),
            None => {
                trace!(token = raw, "Dropping text without a direction marker");
                Ok(Lexeme::Ignored)
            }
        }
    }

    fn validate(&self, statement: &Statement<SequencePart>) -> Result<(), DiagramError> {
        let source = statement.source();
        let expected: &[&'static str] = match statement.len() {
            1 => &["record"],
            _ => &["record", "message", "record"],
        };
        for (part, expected) in statement.parts().iter().zip(expected) {
            if part.kind() != *expected {
                return Err(DiagramError::unexpected_part(*expected, part.kind(), source));
            }
        }
        Ok(())
    }
}

/// Sequence diagram parser
pub struct SequenceParser;

impl SequenceParser {
    pub fn new() -> Self {
        Self
    }

    /// Lazily parse already-normalized shorthand into statements.
    pub fn statements(input: &str) -> StatementStream<'_, SequenceClassifier> {
        StatementStream::new(input, SequenceClassifier)
    }

    /// Parse multi-line shorthand into a vector of statements.
    pub fn parse_statements(input: &str) -> Result<Vec<Statement<SequencePart>>, DiagramError> {
        let normalized = normalize_lines(input);
        Self::statements(&normalized).collect()
    }
}

impl Default for SequenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<SequenceDatabase> for SequenceParser {
    fn parse(&self, input: &str, database: &mut SequenceDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_sequence", input_len = input.len());
        let _enter = parse_span.enter();

        let normalized = normalize_lines(input);
        for statement in Self::statements(&normalized) {
            let statement = statement?;
            trace!(source = statement.source(), parts = statement.len(), "Parsed statement");
            database.add_statement(statement)?;
        }

        debug!(
            statements = database.statement_count(),
            boxes = database.box_count(),
            messages = database.messages().len(),
            "Sequence parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sequence"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_marker() {
        assert_eq!(
            parse_message("hello>"),
            Some(SequencePart::Message {
                direction: MessageDirection::Forward,
                text: "hello".to_string(),
            })
        );
    }

    #[test]
    fn test_leading_marker() {
        assert_eq!(
            parse_message("<reply "),
            Some(SequencePart::Message {
                direction: MessageDirection::Reverse,
                text: "reply".to_string(),
            })
        );
    }

    #[test]
    fn test_text_without_marker_is_dropped() {
        assert_eq!(parse_message("hello"), None);
    }

    #[test]
    fn test_message_statement() {
        let statements = SequenceParser::parse_statements("[A]hello>[B]").unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].parts(),
            &[
                SequencePart::Record { label: "A".to_string() },
                SequencePart::Message {
                    direction: MessageDirection::Forward,
                    text: "hello".to_string(),
                },
                SequencePart::Record { label: "B".to_string() },
            ]
        );
    }

    #[test]
    fn test_lone_message_is_rejected() {
        let err = SequenceParser::parse_statements("hello>").unwrap_err();
        assert!(matches!(
            err,
            DiagramError::UnexpectedPart { expected: "record", found: "message", .. }
        ));
    }

    #[test]
    fn test_three_records_are_rejected() {
        let err = SequenceParser::parse_statements("[A][B][C]").unwrap_err();
        assert!(matches!(
            err,
            DiagramError::UnexpectedPart { expected: "message", found: "record", .. }
        ));
    }

    #[test]
    fn test_two_parts_are_rejected() {
        let err = SequenceParser::parse_statements("[A]hello>").unwrap_err();
        assert!(matches!(err, DiagramError::MalformedStatement { parts: 2, .. }));
    }
}

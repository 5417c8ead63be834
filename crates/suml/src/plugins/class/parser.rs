//! Structural diagram parser
//!
//! Turns yUML class shorthand into record, note, cluster and edge parts.
//!
//! ```text
//! [Customer|Forename;Surname|Save()]
//! [Customer{bg:orange}]<>1->*[Order{bg:green}]
//! [Customer]uses-.->[PaymentStrategy]
//! [Customer]^[Cool Customer]
//! [Person]-[note: Value Object]
//! [Shop[Customer][Order]]
//! ```

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::database::ClassDatabase;
use crate::core::{
    record_name, unescape, Database, DiagramError, Lexeme, Parser, PartClassifier, Statement,
    StatementStream, Token,
};

/// Arrowhead drawn at one end of a structural edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowHead {
    #[default]
    None,
    /// Open arrowhead (`<`, `>`): directional association
    Vee,
    /// Hollow triangle (`^`): inheritance
    Empty,
    /// Filled diamond (`++`): composition
    Diamond,
    /// Hollow diamond (`<>`, `+`): aggregation
    ODiamond,
}

impl ArrowHead {
    /// Graphviz arrow shape name
    pub fn as_dot(self) -> &'static str {
        match self {
            ArrowHead::None => "none",
            ArrowHead::Vee => "vee",
            ArrowHead::Empty => "empty",
            ArrowHead::Diamond => "diamond",
            ArrowHead::ODiamond => "odiamond",
        }
    }
}

/// Line style of a structural edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    pub fn as_dot(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        }
    }
}

/// Arrowhead and role/cardinality label at one end of an edge
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeEnd {
    pub arrow: ArrowHead,
    pub label: String,
}

impl EdgeEnd {
    pub fn new(arrow: ArrowHead, label: impl Into<String>) -> Self {
        Self {
            arrow,
            label: label.into(),
        }
    }
}

/// One part of a structural statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassPart {
    /// `[Name|attributes|methods]`
    Record {
        label: String,
        background: Option<String>,
    },
    /// `[note: text]`
    Note {
        text: String,
        background: Option<String>,
    },
    /// `[Label[Member][Member]]`
    Cluster {
        label: String,
        background: Option<String>,
        members: Vec<String>,
    },
    /// Connector between two shapes
    Edge {
        left: EdgeEnd,
        right: EdgeEnd,
        style: LineStyle,
    },
}

impl ClassPart {
    /// Registry key of a shape; `None` for edges.
    pub fn name(&self) -> Option<&str> {
        self.label().map(record_name)
    }

    /// Full label of a shape; `None` for edges.
    pub fn label(&self) -> Option<&str> {
        match self {
            ClassPart::Record { label, .. } | ClassPart::Cluster { label, .. } => Some(label),
            ClassPart::Note { text, .. } => Some(text),
            ClassPart::Edge { .. } => None,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, ClassPart::Note { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClassPart::Record { .. } => "record",
            ClassPart::Note { .. } => "note",
            ClassPart::Cluster { .. } => "cluster",
            ClassPart::Edge { .. } => "edge",
        }
    }
}

/// Split a trailing `{bg:color}` off a shape body.
fn split_background(body: &str) -> (&str, Option<String>) {
    if body.ends_with('}') {
        if let Some(pos) = body.rfind("{bg:") {
            let color = body[pos + 4..body.len() - 1].trim();
            let color = (!color.is_empty()).then(|| color.to_string());
            return (&body[..pos], color);
        }
    }
    (body, None)
}

/// Parse the inside of a `[...]` token. Escapes are still placeholders here.
fn parse_shape(raw: &str) -> ClassPart {
    let body = &raw[1..raw.len() - 1];
    let (body, background) = split_background(body);

    if let Some(text) = body.strip_prefix("note:") {
        return ClassPart::Note {
            text: unescape(text.trim()),
            background,
        };
    }

    if body.contains('[') && body.contains(']') {
        let mut pieces = body.split('[');
        let label = pieces.next().unwrap_or_default();
        let members = pieces
            .map(|member| unescape(member.replace(']', "").trim()))
            .filter(|member| !member.is_empty())
            .collect();
        return ClassPart::Cluster {
            label: unescape(label.trim()),
            background,
            members,
        };
    }

    ClassPart::Record {
        label: unescape(body.trim()),
        background,
    }
}

/// Decode a marker at the start of a connector half.
fn decode_prefix(half: &str) -> EdgeEnd {
    const PREFIXES: &[(&str, ArrowHead)] = &[
        ("<>", ArrowHead::ODiamond),
        ("++", ArrowHead::Diamond),
        ("+", ArrowHead::ODiamond),
        ("<", ArrowHead::Vee),
        (">", ArrowHead::Vee),
        ("^", ArrowHead::Empty),
    ];
    for &(marker, arrow) in PREFIXES {
        if let Some(rest) = half.strip_prefix(marker) {
            return EdgeEnd::new(arrow, unescape(rest.trim()));
        }
    }
    EdgeEnd::new(ArrowHead::None, unescape(half.trim()))
}

/// Decode a marker at the end of a connector half, falling back to a prefix.
fn decode_suffix(half: &str) -> EdgeEnd {
    const SUFFIXES: &[(&str, ArrowHead)] = &[
        ("<>", ArrowHead::ODiamond),
        ("++", ArrowHead::Diamond),
        ("+", ArrowHead::ODiamond),
        (">", ArrowHead::Vee),
        ("^", ArrowHead::Empty),
    ];
    for &(marker, arrow) in SUFFIXES {
        if let Some(rest) = half.strip_suffix(marker) {
            return EdgeEnd::new(arrow, unescape(rest.trim()));
        }
    }
    decode_prefix(half)
}

/// Parse a connector token such as `<>1->*` or `uses-.->`.
///
/// Returns `Ok(None)` for tokens that are not connectors at all; such tokens
/// are dropped without producing a diagram element.
pub fn parse_connector(raw: &str) -> Result<Option<ClassPart>, DiagramError> {
    if raw == "^" {
        return Ok(Some(ClassPart::Edge {
            left: EdgeEnd::new(ArrowHead::Empty, ""),
            right: EdgeEnd::default(),
            style: LineStyle::Solid,
        }));
    }
    if !raw.contains('-') {
        return Ok(None);
    }

    let (style, marker) = if raw.contains("-.-") {
        (LineStyle::Dashed, "-.-")
    } else {
        (LineStyle::Solid, "-")
    };

    let halves: Vec<&str> = raw.split(marker).collect();
    let [left, right] = halves.as_slice() else {
        return Err(DiagramError::malformed_connector(unescape(raw)));
    };

    Ok(Some(ClassPart::Edge {
        left: decode_prefix(left),
        right: decode_suffix(right),
        style,
    }))
}

/// Token classification for the structural grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassClassifier;

impl PartClassifier for ClassClassifier {
    type Part = ClassPart;

    fn classify(&self, token: &Token) -> Result<Lexeme<ClassPart>, DiagramError> {
        let raw = token.raw();
        if token.is_separator() {
            return Ok(Lexeme::Separator);
        }
        if token.is_shape() {
            return Ok(Lexeme::Part(parse_shape(raw)));
        }
        match parse_connector(raw)? {
            Some(edge) => Ok(Lexeme::Part(edge)),
            None => {
                trace!(token = raw, "Dropping unrecognized connector");
                Ok(Lexeme::Ignored)
            }
        }
    }
}

/// Structural diagram parser
pub struct ClassParser;

impl ClassParser {
    pub fn new() -> Self {
        Self
    }

    /// Lazily parse already-normalized shorthand into statements.
    pub fn statements(input: &str) -> StatementStream<'_, ClassClassifier> {
        StatementStream::new(input, ClassClassifier)
    }

    /// Parse multi-line shorthand into a vector of statements.
    pub fn parse_statements(input: &str) -> Result<Vec<Statement<ClassPart>>, DiagramError> {
        let normalized = crate::core::normalize_lines(input);
        Self::statements(&normalized).collect()
    }
}

impl Default for ClassParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<ClassDatabase> for ClassParser {
    fn parse(&self, input: &str, database: &mut ClassDatabase) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_class", input_len = input.len());
        let _enter = parse_span.enter();

        let normalized = crate::core::normalize_lines(input);
        for statement in Self::statements(&normalized) {
            let statement = statement?;
            trace!(source = statement.source(), parts = statement.len(), "Parsed statement");
            database.add_statement(statement)?;
        }

        debug!(
            statements = database.statement_count(),
            boxes = database.box_count(),
            "Class parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "class"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

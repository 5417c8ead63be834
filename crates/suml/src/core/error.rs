//! Core error types for diagram processing
//!
//! Every failure the compiler can report about its input, or about the
//! external tools it drives, is a variant of [`DiagramError`].

use thiserror::Error;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Malformed statement: expected 1 or 3 parts, found {parts} in `{statement}`")]
    MalformedStatement { parts: usize, statement: String },

    #[error("Unexpected {found} where {expected} was expected in `{statement}`")]
    UnexpectedPart {
        expected: &'static str,
        found: &'static str,
        statement: String,
    },

    #[error("Malformed connector: `{token}` has more than one line marker")]
    MalformedConnector { token: String },

    #[error("Unresolved reference: `{name}` used by {context} was never declared")]
    UnresolvedReference { name: String, context: String },

    #[error("Invalid SVG: {message}")]
    InvalidSvg { message: String },

    #[error("Invalid point list: `{points}`")]
    InvalidPoints { points: String },

    #[error("Backend error: {tool}: {message}")]
    Backend { tool: String, message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new malformed statement error
    pub fn malformed_statement(parts: usize, statement: impl Into<String>) -> Self {
        Self::MalformedStatement {
            parts,
            statement: statement.into(),
        }
    }

    /// Create a new unexpected part error
    pub fn unexpected_part(
        expected: &'static str,
        found: &'static str,
        statement: impl Into<String>,
    ) -> Self {
        Self::UnexpectedPart {
            expected,
            found,
            statement: statement.into(),
        }
    }

    /// Create a new malformed connector error
    pub fn malformed_connector(token: impl Into<String>) -> Self {
        Self::MalformedConnector {
            token: token.into(),
        }
    }

    /// Create a new unresolved reference error
    pub fn unresolved(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            name: name.into(),
            context: context.into(),
        }
    }

    /// Create a new invalid SVG error
    pub fn invalid_svg(message: impl Into<String>) -> Self {
        Self::InvalidSvg {
            message: message.into(),
        }
    }

    /// Create a new invalid points error
    pub fn invalid_points(points: impl Into<String>) -> Self {
        Self::InvalidPoints {
            points: points.into(),
        }
    }

    /// Create a new backend error
    pub fn backend(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<roxmltree::Error> for DiagramError {
    fn from(err: roxmltree::Error) -> Self {
        Self::invalid_svg(err.to_string())
    }
}

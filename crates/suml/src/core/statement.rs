//! Statements and the token-to-statement stream shared by both grammars
//!
//! A grammar supplies a [`PartClassifier`] that decides what each token is.
//! [`StatementStream`] groups the classified parts between separators and
//! enforces the statement shape: one lone shape, or `shape, link, shape`.

use super::error::DiagramError;
use super::tokenizer::{tokenize, Token, Tokens};

/// An ordered group of one or three parts
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<P> {
    parts: Vec<P>,
    source: String,
}

impl<P> Statement<P> {
    /// Build a statement, checking the 1-or-3 part shape.
    pub fn new(parts: Vec<P>, source: impl Into<String>) -> Result<Self, DiagramError> {
        let source = source.into();
        match parts.len() {
            1 | 3 => Ok(Self { parts, source }),
            n => Err(DiagramError::malformed_statement(n, source)),
        }
    }

    pub fn parts(&self) -> &[P] {
        &self.parts
    }

    /// The token texts this statement was built from, joined back together.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// `(left, link, right)` for a three-part statement.
    pub fn triple(&self) -> Option<(&P, &P, &P)> {
        match self.parts.as_slice() {
            [left, link, right] => Some((left, link, right)),
            _ => None,
        }
    }
}

/// What a single token means to a grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme<P> {
    /// Ends the current statement
    Separator,
    /// Contributes a part to the current statement
    Part(P),
    /// Produces nothing
    Ignored,
}

/// Grammar-specific token classification
pub trait PartClassifier {
    type Part;

    /// Decide what `token` contributes to the current statement.
    fn classify(&self, token: &Token) -> Result<Lexeme<Self::Part>, DiagramError>;

    /// Extra checks on a complete statement, run after the shape check.
    fn validate(&self, _statement: &Statement<Self::Part>) -> Result<(), DiagramError> {
        Ok(())
    }
}

/// Lazy, finite stream of statements over one input
pub struct StatementStream<'a, C: PartClassifier> {
    tokens: Tokens<'a>,
    classifier: C,
    parts: Vec<C::Part>,
    source: Vec<String>,
    failed: bool,
}

impl<'a, C: PartClassifier> StatementStream<'a, C> {
    pub fn new(input: &'a str, classifier: C) -> Self {
        Self {
            tokens: tokenize(input),
            classifier,
            parts: Vec::new(),
            source: Vec::new(),
            failed: false,
        }
    }

    fn take_statement(&mut self) -> Option<Result<Statement<C::Part>, DiagramError>> {
        if self.parts.is_empty() {
            self.source.clear();
            return None;
        }
        let parts = std::mem::take(&mut self.parts);
        let source = std::mem::take(&mut self.source).join("");
        let result = Statement::new(parts, source).and_then(|statement| {
            self.classifier.validate(&statement)?;
            Ok(statement)
        });
        Some(result)
    }

    fn fail(&mut self, err: DiagramError) -> Option<Result<Statement<C::Part>, DiagramError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<C: PartClassifier> Iterator for StatementStream<'_, C> {
    type Item = Result<Statement<C::Part>, DiagramError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(token) = self.tokens.next() {
            if token.is_blank() {
                continue;
            }
            match self.classifier.classify(&token) {
                Ok(Lexeme::Separator) => match self.take_statement() {
                    Some(Err(err)) => return self.fail(err),
                    Some(statement) => return Some(statement),
                    None => {}
                },
                Ok(Lexeme::Part(part)) => {
                    self.parts.push(part);
                    self.source.push(token.text());
                }
                Ok(Lexeme::Ignored) => {}
                Err(err) => return self.fail(err),
            }
        }

        match self.take_statement() {
            Some(Err(err)) => self.fail(err),
            other => other,
        }
    }
}

//! Core abstractions for diagram compilation
//!
//! The tokenizer, statement stream and box registry are shared by both
//! grammars; the traits here are the seams each grammar plugs into.

pub mod backend;
mod config;
mod database;
mod emitter;
mod error;
pub mod logging;
mod parser;
mod registry;
mod statement;
mod text;
pub mod tokenizer;

pub use backend::*;
pub use config::*;
pub use database::*;
pub use emitter::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use registry::*;
pub use statement::*;
pub use text::*;
pub use tokenizer::{normalize_lines, tokenize, unescape, Token, Tokens};

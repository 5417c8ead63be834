//! Sequence diagram plugin
//!
//! Parses participant/message shorthand and emits PIC markup.

mod database;
mod emitter;
mod parser;

pub use database::{SequenceDatabase, SequenceMessage, CHAR_WIDTH};
pub use emitter::SequenceEmitter;
pub use parser::{
    parse_message, MessageDirection, SequenceClassifier, SequenceParser, SequencePart,
};

//! PIC emitter for sequence diagrams
//!
//! The output drives the `object3`, `active`, `message` and `complete` macros
//! of the sequence prelude. The bundled macros are inlined unless a prelude
//! file is configured, in which case it is loaded with `copy`.

use anyhow::Result;
use tracing::{debug, span, Level};

use super::database::SequenceDatabase;
use crate::core::{Database, Emitter, SEQUENCE_PRELUDE};

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

/// PIC emitter for sequence diagrams
#[derive(Debug, Clone)]
pub struct SequenceEmitter {
    prelude: Option<String>,
}

impl SequenceEmitter {
    pub fn new() -> Self {
        Self { prelude: None }
    }

    /// Emit a `copy` of `prelude` instead of the bundled macros.
    pub fn with_prelude(prelude: impl Into<String>) -> Self {
        Self {
            prelude: Some(prelude.into()),
        }
    }

    pub fn prelude(&self) -> Option<&str> {
        self.prelude.as_deref()
    }
}

impl Default for SequenceEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter<SequenceDatabase> for SequenceEmitter {
    fn emit(&self, database: &SequenceDatabase) -> Result<String> {
        let emit_span = span!(Level::INFO, "emit_sequence", boxes = database.box_count());
        let _enter = emit_span.enter();

        let prelude = match &self.prelude {
            Some(path) => format!("copy {};", quote(path)),
            None => SEQUENCE_PRELUDE.trim_end().to_string(),
        };
        let mut pic = vec![".PS".to_string(), prelude, "underline=0;".to_string()];

        let boxes: Vec<_> = database.registry().all_sorted().collect();
        for diagram_box in &boxes {
            let width = diagram_box.width().unwrap_or_default();
            let margin = diagram_box.right_margin();
            if margin > 0.0 {
                pic.push(format!(
                    "object3({},{},{:.6},{:.6});",
                    diagram_box.id(),
                    quote(diagram_box.spec()),
                    width,
                    margin
                ));
            } else {
                pic.push(format!(
                    "object3({},{},{:.6});",
                    diagram_box.id(),
                    quote(diagram_box.spec()),
                    width
                ));
            }
        }

        pic.push("step();".to_string());
        pic.extend(boxes.iter().map(|b| format!("active({});", b.id())));

        for message in database.messages() {
            pic.push(format!(
                "message({},{},{});",
                message.from,
                message.to,
                quote(&message.text)
            ));
        }

        pic.push("step();".to_string());
        pic.extend(boxes.iter().map(|b| format!("complete({});", b.id())));
        pic.push(".PE".to_string());

        debug!(
            boxes = boxes.len(),
            messages = database.messages().len(),
            "Sequence emission completed"
        );
        Ok(pic.join("\n") + "\n")
    }

    fn name(&self) -> &'static str {
        "pic"
    }

    fn format(&self) -> &'static str {
        "pic"
    }
}

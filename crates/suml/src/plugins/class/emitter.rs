//! Graphviz emitter for structural diagrams
//!
//! Produces `dot` input: one styled node block per shape, a subgraph per
//! cluster and one edge block per connector.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{debug, span, Level};

use super::database::ClassDatabase;
use super::parser::{ClassPart, EdgeEnd, LineStyle};
use crate::core::{wrap_label, BoxId, Database, DiagramError, Emitter, Statement};

/// Diagrams with more statements than this are laid out top-down.
pub const RANK_THRESHOLD: usize = 5;

/// Column width for wrapping plain (section-less) labels.
pub const WRAP_WIDTH: usize = 20;

/// Layout flow axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    LeftRight,
    TopDown,
}

impl RankDir {
    /// Small diagrams stay compact left-to-right; larger ones go top-down.
    pub fn for_statement_count(count: usize) -> Self {
        if count > RANK_THRESHOLD {
            RankDir::TopDown
        } else {
            RankDir::LeftRight
        }
    }

    pub fn as_dot(self) -> &'static str {
        match self {
            RankDir::LeftRight => "LR",
            RankDir::TopDown => "TB",
        }
    }
}

/// Escape a label for a Graphviz record string.
///
/// `;` becomes a line break; braces, angle brackets, spaces and quotes are
/// made literal.
pub fn escape_label(label: &str) -> String {
    label
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace(';', "\\n")
        .replace(' ', "\\ ")
        .replace('<', "\\<")
        .replace('>', "\\>")
        .replace('"', "\\\"")
        .replace("\\n\\n", "\\n")
}

/// Quote-escape free text such as edge and cluster labels.
fn escape_text(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Build the node label for a record or note.
///
/// Sectioned labels (`Name|attrs|methods`) become record fields, wrapped in
/// braces for top-down layout so the sections stack horizontally. Plain labels
/// are word-wrapped line by line.
pub fn format_label(label: &str, rankdir: RankDir) -> String {
    let label = if label.contains('|') {
        format!("{}\\n", label).replace('|', "\\n|")
    } else {
        label
            .split(';')
            .flat_map(|line| wrap_label(line, WRAP_WIDTH))
            .collect::<Vec<_>>()
            .join("\\n")
    };

    let label = escape_label(&label);
    if label.contains('|') && rankdir == RankDir::TopDown {
        format!("{{{}}}", label)
    } else {
        label
    }
}

/// Graphviz emitter for structural diagrams
#[derive(Debug, Clone, Default)]
pub struct ClassEmitter {
    font: Option<String>,
}

impl ClassEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(font: Option<String>) -> Self {
        Self { font }
    }

    fn push_font(&self, dot: &mut Vec<String>, indent: &str) {
        if let Some(font) = &self.font {
            dot.push(format!("{}fontname = \"{}\"", indent, escape_text(font)));
        }
    }

    fn emit_cluster(
        &self,
        dot: &mut Vec<String>,
        database: &ClassDatabase,
        id: BoxId,
        members: &[String],
    ) -> Result<()> {
        let cluster = database.registry().get(id);
        let context = format!("cluster `{}`", cluster.name());

        dot.push(format!("    subgraph cluster_{} {{", id));
        dot.push(format!("        label = \"{}\"", escape_text(cluster.spec())));
        dot.push("        fontsize = 10".to_string());
        self.push_font(dot, "        ");
        for member in members {
            let member_id = database.registry().resolve(member, &context)?;
            dot.push(format!("        {}", member_id));
        }
        dot.push("    }".to_string());
        Ok(())
    }

    fn emit_node(
        &self,
        dot: &mut Vec<String>,
        database: &ClassDatabase,
        id: BoxId,
        shape: &str,
        rankdir: RankDir,
    ) {
        let node = database.registry().get(id);
        let style = database.style(id);

        dot.push("    node [".to_string());
        dot.push(format!("        shape = \"{}\"", shape));
        dot.push("        height = 0.50".to_string());
        dot.push("        fontsize = 10".to_string());
        self.push_font(dot, "        ");
        dot.push("        margin = \"0.20,0.05\"".to_string());
        dot.push("    ]".to_string());

        dot.push(format!("    {} [", id));
        dot.push(format!("        label = \"{}\"", format_label(node.spec(), rankdir)));
        if let Some(background) = style.and_then(|s| s.background.as_deref()) {
            dot.push("        style = \"filled\"".to_string());
            dot.push(format!("        fillcolor = \"{}\"", escape_text(background)));
        }
        dot.push("    ]".to_string());
    }

    fn endpoint(
        database: &ClassDatabase,
        part: &ClassPart,
        statement: &Statement<ClassPart>,
    ) -> Result<BoxId> {
        let name = part.name().ok_or_else(|| {
            DiagramError::unexpected_part("shape", part.kind(), statement.source())
        })?;
        let context = format!("edge `{}`", statement.source());
        Ok(database.registry().resolve(name, &context)?)
    }

    fn emit_edge(
        &self,
        dot: &mut Vec<String>,
        from: BoxId,
        to: BoxId,
        tail: &EdgeEnd,
        head: &EdgeEnd,
        style: LineStyle,
    ) {
        dot.push("    edge [".to_string());
        dot.push("        dir = \"both\"".to_string());
        dot.push(format!("        style = \"{}\"", style.as_dot()));
        dot.push(format!("        arrowtail = \"{}\"", tail.arrow.as_dot()));
        dot.push(format!("        taillabel = \"{}\"", escape_text(&tail.label)));
        dot.push(format!("        arrowhead = \"{}\"", head.arrow.as_dot()));
        dot.push(format!("        headlabel = \"{}\"", escape_text(&head.label)));
        dot.push("        labeldistance = 2".to_string());
        dot.push("        fontsize = 10".to_string());
        self.push_font(dot, "        ");
        dot.push("    ]".to_string());
        dot.push(format!("    {} -> {}", from, to));
    }
}

impl Emitter<ClassDatabase> for ClassEmitter {
    fn emit(&self, database: &ClassDatabase) -> Result<String> {
        let emit_span = span!(
            Level::INFO,
            "emit_class",
            statements = database.statement_count()
        );
        let _enter = emit_span.enter();

        let rankdir = RankDir::for_statement_count(database.statement_count());
        let mut dot = vec![
            "digraph G {".to_string(),
            "    ranksep = 1".to_string(),
            format!("    rankdir = {}", rankdir.as_dot()),
        ];

        let mut emitted: HashSet<BoxId> = HashSet::new();
        let mut edges = 0;

        for statement in database.statements() {
            for part in statement.parts() {
                let Some(name) = part.name() else {
                    continue;
                };
                let id = database.registry().resolve(name, part.kind())?;
                if !emitted.insert(id) {
                    continue;
                }
                match part {
                    ClassPart::Cluster { members, .. } => {
                        self.emit_cluster(&mut dot, database, id, members)?;
                    }
                    ClassPart::Record { .. } => {
                        self.emit_node(&mut dot, database, id, "record", rankdir)
                    }
                    ClassPart::Note { .. } => {
                        self.emit_node(&mut dot, database, id, "note", rankdir)
                    }
                    ClassPart::Edge { .. } => {}
                }
            }

            if let Some((left, ClassPart::Edge { left: tail, right: head, style }, right)) =
                statement.triple()
            {
                let from = Self::endpoint(database, left, statement)?;
                let to = Self::endpoint(database, right, statement)?;
                // Note connections are annotations, never structural relations.
                let style = if left.is_note() || right.is_note() {
                    LineStyle::Dashed
                } else {
                    *style
                };
                self.emit_edge(&mut dot, from, to, tail, head, style);
                edges += 1;
            }
        }

        dot.push("}".to_string());
        debug!(
            nodes = emitted.len(),
            edges,
            rankdir = rankdir.as_dot(),
            "Class emission completed"
        );
        Ok(dot.join("\n") + "\n")
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}

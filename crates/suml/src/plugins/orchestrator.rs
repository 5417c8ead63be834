//! Pipeline orchestrator
//!
//! Parser → Database → Emitter → external render → background strip → sketch

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, span, Level};

use crate::core::{Emitter, Parser, Rasterizer, RenderBackend, RenderConfig};
use crate::plugins::class::{ClassDatabase, ClassEmitter, ClassParser};
use crate::plugins::sequence::{SequenceDatabase, SequenceEmitter, SequenceParser};
use crate::sketch::{sketch_document, SvgDocument};

/// Which grammar an input is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    /// Class and entity diagrams, laid out by Graphviz
    Class,
    /// Participant/message diagrams, typeset as PIC
    Sequence,
}

impl DiagramKind {
    pub fn variants() -> &'static [DiagramKind] {
        &[DiagramKind::Class, DiagramKind::Sequence]
    }

    pub fn name(self) -> &'static str {
        match self {
            DiagramKind::Class => "class",
            DiagramKind::Sequence => "sequence",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DiagramKind::Class => "Class diagrams: records, notes, clusters and typed edges",
            DiagramKind::Sequence => "Sequence diagrams: participants and messages",
        }
    }

    /// Name of the markup the emitter for this kind produces
    pub fn markup_format(self) -> &'static str {
        match self {
            DiagramKind::Class => "dot",
            DiagramKind::Sequence => "pic",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiagramKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(DiagramKind::Class),
            "sequence" | "seq" => Ok(DiagramKind::Sequence),
            _ => Err(format!("Unknown diagram kind: {}", s)),
        }
    }
}

/// Runs one configuration over any number of inputs
///
/// Every call builds its own database, so no registry or color state leaks
/// between diagrams.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: RenderConfig,
}

impl Orchestrator {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Compile input to backend markup.
    pub fn compile(&self, kind: DiagramKind, input: &str) -> Result<String> {
        match kind {
            DiagramKind::Class => self.compile_class(input),
            DiagramKind::Sequence => self.compile_sequence(input),
        }
    }

    /// Compile structural shorthand to Graphviz markup.
    pub fn compile_class(&self, input: &str) -> Result<String> {
        let compile_span = span!(Level::INFO, "compile_class", input_len = input.len());
        let _enter = compile_span.enter();

        let mut database = ClassDatabase::new();
        ClassParser::new().parse(input, &mut database)?;
        let markup = ClassEmitter::with_font(self.config.font.clone()).emit(&database)?;
        debug!(output_len = markup.len(), "Class markup emitted");
        Ok(markup)
    }

    /// Compile sequence shorthand to PIC markup.
    pub fn compile_sequence(&self, input: &str) -> Result<String> {
        let compile_span = span!(Level::INFO, "compile_sequence", input_len = input.len());
        let _enter = compile_span.enter();

        let mut database = SequenceDatabase::new();
        SequenceParser::new().parse(input, &mut database)?;
        let emitter = match &self.config.sequence_prelude {
            Some(path) => SequenceEmitter::with_prelude(path.as_str()),
            None => SequenceEmitter::new(),
        };
        let markup = emitter.emit(&database)?;
        debug!(output_len = markup.len(), "Sequence markup emitted");
        Ok(markup)
    }

    /// Compile, render through `backend` and post-process to final SVG.
    pub fn render_svg<R: Rng + ?Sized>(
        &self,
        kind: DiagramKind,
        input: &str,
        backend: &dyn RenderBackend,
        rng: &mut R,
    ) -> Result<String> {
        let render_span = span!(Level::INFO, "render_svg", kind = kind.name());
        let _enter = render_span.enter();

        let markup = self.compile(kind, input)?;
        let rendered = match kind {
            DiagramKind::Class => backend.render_graph(&markup)?,
            DiagramKind::Sequence => backend.render_pic(&markup)?,
        };
        debug!(svg_len = rendered.len(), "Backend rendering completed");

        self.finish_svg(&rendered, rng)
    }

    /// Strip the page background and, if configured, sketch the document.
    pub fn finish_svg<R: Rng + ?Sized>(&self, svg: &str, rng: &mut R) -> Result<String> {
        let mut document = SvgDocument::parse(svg)?;
        let removed = document.strip_background();
        debug!(removed, "Stripped background polygons");

        if self.config.scruffy {
            let stats = sketch_document(&mut document, &self.config.sketch_options(), rng)?;
            info!(
                polygons = stats.polygons,
                points_added = stats.points_added,
                "Applied scruffy sketch"
            );
        }
        Ok(document.to_svg_string())
    }

    /// Render to PNG, optionally trimming the uniform border.
    pub fn render_png<R: Rng + ?Sized>(
        &self,
        kind: DiagramKind,
        input: &str,
        backend: &dyn RenderBackend,
        rasterizer: &dyn Rasterizer,
        crop: bool,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let svg = self.render_svg(kind, input, backend, rng)?;

        let png_span = span!(Level::INFO, "rasterize", crop);
        let _enter = png_span.enter();
        let bitmap = rasterizer.rasterize(&svg)?;
        if crop {
            return rasterizer.autocrop(&bitmap);
        }
        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiagramError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    const RENDERED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100pt" height="60pt">
<g id="graph0" class="graph">
<polygon fill="white" stroke="none" points="-4,4 -4,-56 96,-56 96,4 -4,4"/>
<g id="node1" class="node"><polygon fill="none" stroke="black" points="54,-36 0,-36 0,0 54,0 54,-36"/>
<text font-family="Times,serif">A</text></g>
</g>
</svg>"#;

    /// Records the markup it is given and returns a canned document.
    #[derive(Default)]
    struct CannedBackend {
        seen: RefCell<Vec<String>>,
    }

    impl RenderBackend for CannedBackend {
        fn render_graph(&self, markup: &str) -> Result<String> {
            self.seen.borrow_mut().push(markup.to_string());
            Ok(RENDERED.to_string())
        }

        fn render_pic(&self, markup: &str) -> Result<String> {
            self.seen.borrow_mut().push(markup.to_string());
            Ok(RENDERED.to_string())
        }
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn rasterize(&self, _svg: &str) -> Result<Vec<u8>> {
            Err(DiagramError::backend("convert", "not installed").into())
        }

        fn autocrop(&self, bitmap: &[u8]) -> Result<Vec<u8>> {
            Ok(bitmap.to_vec())
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("class".parse::<DiagramKind>(), Ok(DiagramKind::Class));
        assert_eq!("Sequence".parse::<DiagramKind>(), Ok(DiagramKind::Sequence));
        assert!("flowchart".parse::<DiagramKind>().is_err());
        assert_eq!(DiagramKind::Sequence.to_string(), "sequence");
    }

    #[test]
    fn test_compile_dispatches_by_kind() {
        let orchestrator = Orchestrator::default();
        assert!(orchestrator
            .compile(DiagramKind::Class, "[A]->[B]")
            .unwrap()
            .starts_with("digraph G {"));
        assert!(orchestrator
            .compile(DiagramKind::Sequence, "[A]hi>[B]")
            .unwrap()
            .starts_with(".PS"));
    }

    #[test]
    fn test_font_reaches_graph_markup() {
        let orchestrator = Orchestrator::new(RenderConfig::new().with_font("Purisa"));
        let markup = orchestrator.compile_class("[A]").unwrap();
        assert!(markup.contains("fontname = \"Purisa\""));
    }

    #[test]
    fn test_prelude_reaches_pic_markup() {
        let orchestrator =
            Orchestrator::new(RenderConfig::new().with_sequence_prelude("/opt/sequence.pic"));
        let markup = orchestrator.compile_sequence("[A]").unwrap();
        assert!(markup.contains("copy \"/opt/sequence.pic\";"));
    }

    #[test]
    fn test_render_svg_strips_background_only() {
        let backend = CannedBackend::default();
        let mut rng = StdRng::seed_from_u64(1);
        let svg = Orchestrator::default()
            .render_svg(DiagramKind::Class, "[A]", &backend, &mut rng)
            .unwrap();

        assert_eq!(backend.seen.borrow().len(), 1);
        assert!(backend.seen.borrow()[0].starts_with("digraph G {"));
        assert!(!svg.contains("fill=\"white\" stroke=\"none\""));
        assert!(svg.contains("points=\"54,-36 0,-36 0,0 54,0 54,-36\""));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_render_svg_scruffy() {
        let backend = CannedBackend::default();
        let mut rng = StdRng::seed_from_u64(1);
        let config = RenderConfig::new()
            .with_scruffy(true)
            .with_shadow(true)
            .with_font("Purisa");
        let svg = Orchestrator::new(config)
            .render_svg(DiagramKind::Sequence, "[A]", &backend, &mut rng)
            .unwrap();

        assert!(backend.seen.borrow()[0].starts_with(".PS"));
        assert!(svg.contains("<defs>"));
        assert!(svg.contains("font-family=\"Purisa\""));
        assert!(svg.contains("fill=\"#999999\""));
    }

    #[test]
    fn test_gradient_toggle_controls_defs() {
        let filled = RENDERED.replace(
            "fill=\"none\" stroke=\"black\"",
            "fill=\"orange\" stroke=\"black\"",
        );

        let config = RenderConfig::new().with_scruffy(true);
        let svg = Orchestrator::new(config)
            .finish_svg(&filled, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(svg.contains("<defs>"));
        assert!(svg.contains("id=\"gradient-orange\""));

        let config = RenderConfig::new().with_scruffy(true).with_gradient(false);
        let svg = Orchestrator::new(config)
            .finish_svg(&filled, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(!svg.contains("<defs>"));
        assert!(!svg.contains("gradient-"));
        assert!(svg.contains("fill=\"orange\""));
    }

    #[test]
    fn test_rasterizer_failure_propagates() {
        let backend = CannedBackend::default();
        let mut rng = StdRng::seed_from_u64(1);
        let err = Orchestrator::default()
            .render_png(
                DiagramKind::Class,
                "[A]",
                &backend,
                &FailingRasterizer,
                false,
                &mut rng,
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::Backend { tool, .. }) if tool == "convert"
        ));
    }

    #[test]
    fn test_parse_error_stops_before_backend() {
        let backend = CannedBackend::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result =
            Orchestrator::default().render_svg(DiagramKind::Class, "[A]-", &backend, &mut rng);
        assert!(result.is_err());
        assert!(backend.seen.borrow().is_empty());
    }
}

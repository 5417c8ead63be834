//! Hand-drawn SVG post-processing
//!
//! Walks a rendered document and rewrites its shapes so straight lines
//! wobble. Polygons are filled, optionally shadowed and given gradient fills;
//! text can be switched to a handwriting font.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, span, Level};

use super::dom::{SvgDocument, SvgElement, SvgNode};
use super::geometry::{format_points, parse_points, perturb, CoordinateUnit};
use crate::core::DiagramError;

/// Offset of a drop shadow, in pixels, along both axes
pub const SHADOW_OFFSET: f64 = 4.0;
pub const SHADOW_COLOR: &str = "#999999";
pub const BLUR_FILTER_ID: &str = "filterBlur";

/// Options for the sketch pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchOptions {
    /// Replacement font family for every text element
    pub font: Option<String>,
    pub shadow: bool,
    pub gradient: bool,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            font: None,
            shadow: false,
            gradient: true,
        }
    }
}

/// What a sketch pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SketchStats {
    pub polygons: usize,
    pub polylines: usize,
    pub points_added: usize,
    pub shadows: usize,
    pub gradients: usize,
    pub texts: usize,
}

/// Fill colors that were replaced by gradients during one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorSet {
    colors: BTreeSet<String>,
}

impl ColorSet {
    pub fn insert(&mut self, color: &str) -> bool {
        self.colors.insert(color.to_string())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }

    /// `<defs>` with the blur filter and one gradient per color.
    pub fn defs(&self) -> SvgElement {
        let blur = SvgElement::new("filter").with_attr("id", BLUR_FILTER_ID).with_child(
            SvgElement::new("feGaussianBlur")
                .with_attr("stdDeviation", "0.69")
                .with_attr("id", "feGaussianBlurBlur"),
        );

        self.iter().fold(SvgElement::new("defs").with_child(blur), |defs, color| {
            defs.with_child(
                SvgElement::new("linearGradient")
                    .with_attr("id", gradient_id(color))
                    .with_attr("x1", "0%")
                    .with_attr("y1", "0%")
                    .with_attr("x2", "100%")
                    .with_attr("y2", "100%")
                    .with_child(
                        SvgElement::new("stop")
                            .with_attr("offset", "0%")
                            .with_attr("style", "stop-color:white;stop-opacity:1"),
                    )
                    .with_child(
                        SvgElement::new("stop")
                            .with_attr("offset", "50%")
                            .with_attr("style", format!("stop-color:{};stop-opacity:1", color)),
                    ),
            )
        })
    }
}

/// Fragment id of the gradient for `color`
pub fn gradient_id(color: &str) -> String {
    let sanitized: String = color
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("gradient-{}", sanitized)
}

fn is_black(color: &str) -> bool {
    color.eq_ignore_ascii_case("black") || color.eq_ignore_ascii_case("#000000")
}

fn number_attr(element: &SvgElement, key: &str) -> Result<f64, DiagramError> {
    let raw = element.attr(key).unwrap_or("0");
    raw.trim()
        .trim_end_matches("px")
        .parse()
        .map_err(|_| {
            DiagramError::invalid_svg(format!("<{}> has non-numeric {}=\"{}\"", element.name, key, raw))
        })
}

/// Turn a `<rect>` into a four-corner `<polygon>`.
fn rect_to_polygon(element: &mut SvgElement) -> Result<(), DiagramError> {
    let x = number_attr(element, "x")?;
    let y = number_attr(element, "y")?;
    let w = number_attr(element, "width")?;
    let h = number_attr(element, "height")?;
    for key in ["x", "y", "width", "height"] {
        element.remove_attr(key);
    }
    element.rename("polygon");
    element.set_attr(
        "points",
        format!(
            "{:.6},{:.6} {:.6},{:.6} {:.6},{:.6} {:.6},{:.6}",
            x,
            y,
            x + w,
            y,
            x + w,
            y + h,
            x,
            y + h
        ),
    );
    Ok(())
}

/// Turn a `<line>` into a two-point `<polyline>`.
fn line_to_polyline(element: &mut SvgElement) {
    let [x1, y1, x2, y2] = ["x1", "y1", "x2", "y2"]
        .map(|key| element.remove_attr(key).unwrap_or_else(|| "0".to_string()));
    let points = format!("{},{} {},{}", x1, y1, x2, y2);
    element.rename("polyline");
    element.set_attr("points", points);
}

struct Sketcher<'a, R: Rng + ?Sized> {
    options: &'a SketchOptions,
    unit: CoordinateUnit,
    rng: &'a mut R,
    colors: ColorSet,
    stats: SketchStats,
}

impl<R: Rng + ?Sized> Sketcher<'_, R> {
    fn wobble(&mut self, element: &mut SvgElement) -> Result<(), DiagramError> {
        let Some(raw) = element.attr("points") else {
            return Ok(());
        };
        let points = parse_points(raw, self.unit)?;
        let wobbled = perturb(&points, &mut *self.rng);
        self.stats.points_added += wobbled.len() - points.len();
        element.set_attr("points", format_points(&wobbled, self.unit));
        Ok(())
    }

    fn shadow_of(&self, element: &SvgElement) -> SvgElement {
        let mut shade = SvgElement {
            name: element.name.clone(),
            attrs: element.attrs.clone(),
            children: Vec::new(),
        };
        shade.remove_attr("id");
        shade.set_attr("fill", SHADOW_COLOR);
        shade.set_attr("stroke", SHADOW_COLOR);
        if shade.attr("stroke-width").is_none() {
            shade.set_attr("stroke-width", "1");
        }
        let offset = self.unit.from_pixels(SHADOW_OFFSET);
        let translate = format!("translate({:.6}, {:.6})", offset, offset);
        let transform = match shade.attr("transform") {
            Some(existing) => format!("{} {}", translate, existing),
            None => translate,
        };
        shade.set_attr("transform", transform);
        shade
    }

    fn recolor(&mut self, element: &mut SvgElement) {
        let Some(fill) = element.attr("fill").map(str::to_string) else {
            return;
        };
        if fill.is_empty() || is_black(&fill) {
            return;
        }
        self.colors.insert(&fill);
        let style = format!(
            "fill:url(#{});{}",
            gradient_id(&fill),
            element.attr("style").unwrap_or_default()
        );
        element.set_attr("style", style);
        self.stats.gradients += 1;
    }

    fn walk(&mut self, parent: &mut SvgElement, level: usize) -> Result<(), DiagramError> {
        let mut index = 0;
        while index < parent.children.len() {
            let SvgNode::Element(child) = &mut parent.children[index] else {
                index += 1;
                continue;
            };

            match child.local_name() {
                "rect" => rect_to_polygon(child)?,
                "line" => line_to_polyline(child),
                _ => {}
            }

            // Shapes directly under the root are background, not drawing.
            let mut shade = None;
            match child.local_name() {
                "polygon" if level > 0 => {
                    self.wobble(child)?;
                    if matches!(child.attr("fill"), None | Some("" | "none")) {
                        child.set_attr("fill", "white");
                    }
                    if self.options.shadow {
                        shade = Some(self.shadow_of(child));
                        self.stats.shadows += 1;
                    }
                    if self.options.gradient {
                        self.recolor(child);
                    }
                    self.stats.polygons += 1;
                }
                "polyline" if level > 0 => {
                    self.wobble(child)?;
                    self.stats.polylines += 1;
                }
                "text" => {
                    if let Some(font) = &self.options.font {
                        child.set_attr("font-family", font.as_str());
                        self.stats.texts += 1;
                    }
                }
                _ => {}
            }

            self.walk(child, level + 1)?;

            if let Some(shade) = shade {
                parent.children.insert(index, SvgNode::Element(shade));
                index += 1;
            }
            index += 1;
        }
        Ok(())
    }
}

/// Sketch a parsed document in place.
///
/// Coordinates are handled in pixels; documents sized in inches are
/// converted on the way in and back on the way out.
pub fn sketch_document<R: Rng + ?Sized>(
    document: &mut SvgDocument,
    options: &SketchOptions,
    rng: &mut R,
) -> Result<SketchStats, DiagramError> {
    let unit = CoordinateUnit::detect(document.root.attr("width"), document.root.attr("height"));
    let sketch_span = span!(Level::INFO, "sketch", unit = ?unit);
    let _enter = sketch_span.enter();

    let mut sketcher = Sketcher {
        options,
        unit,
        rng,
        colors: ColorSet::default(),
        stats: SketchStats::default(),
    };
    sketcher.walk(&mut document.root, 0)?;

    if options.gradient {
        document
            .root
            .children
            .insert(0, SvgNode::Element(sketcher.colors.defs()));
    }

    let stats = sketcher.stats;
    debug!(
        polygons = stats.polygons,
        polylines = stats.polylines,
        points_added = stats.points_added,
        shadows = stats.shadows,
        colors = sketcher.colors.len(),
        "Sketch completed"
    );
    Ok(stats)
}

/// Parse, sketch and re-serialize an SVG string.
pub fn sketch<R: Rng + ?Sized>(
    svg: &str,
    options: &SketchOptions,
    rng: &mut R,
) -> Result<String, DiagramError> {
    let mut document = SvgDocument::parse(svg)?;
    sketch_document(&mut document, options, rng)?;
    Ok(document.to_svg_string())
}

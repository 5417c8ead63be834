//! Point lists, unit conversion and the line wobble

use rand::Rng;

use crate::core::DiagramError;

pub const PIXELS_PER_INCH: f64 = 96.0;

/// Segments at most this long are left straight.
pub const SPLIT_THRESHOLD: f64 = 10.0;

/// Minimum distance of an inserted point from either segment end.
pub const SPLIT_CLEARANCE: f64 = 4.0;

/// Range of the per-axis offset applied to an inserted point
pub const JITTER: (f64, f64) = (0.5, 2.0);

/// Unit the document's coordinates are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateUnit {
    #[default]
    Pixels,
    Inches,
}

impl CoordinateUnit {
    /// Inches when either root dimension is declared in inches.
    pub fn detect(width: Option<&str>, height: Option<&str>) -> Self {
        let in_inches = |value: Option<&str>| value.is_some_and(|v| v.trim().ends_with("in"));
        if in_inches(width) || in_inches(height) {
            CoordinateUnit::Inches
        } else {
            CoordinateUnit::Pixels
        }
    }

    pub fn to_pixels(self, value: f64) -> f64 {
        match self {
            CoordinateUnit::Pixels => value,
            CoordinateUnit::Inches => value * PIXELS_PER_INCH,
        }
    }

    pub fn from_pixels(self, value: f64) -> f64 {
        match self {
            CoordinateUnit::Pixels => value,
            CoordinateUnit::Inches => value / PIXELS_PER_INCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// The point `distance` units from `self` towards `other`.
    pub fn towards(self, other: Point, distance: f64) -> Point {
        let length = self.distance(other);
        if length == 0.0 {
            return self;
        }
        Point::new(
            self.x + distance * (other.x - self.x) / length,
            self.y + distance * (other.y - self.y) / length,
        )
    }
}

/// Parse an SVG `points` list into working (pixel) units.
pub fn parse_points(points: &str, unit: CoordinateUnit) -> Result<Vec<Point>, DiagramError> {
    let values = points
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| DiagramError::invalid_points(points))?;

    if values.len() % 2 != 0 {
        return Err(DiagramError::invalid_points(points));
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| Point::new(unit.to_pixels(pair[0]), unit.to_pixels(pair[1])))
        .collect())
}

/// Format working-unit points back into the document unit.
pub fn format_points(points: &[Point], unit: CoordinateUnit) -> String {
    points
        .iter()
        .map(|p| format!("{:.6},{:.6}", unit.from_pixels(p.x), unit.from_pixels(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Random value in `[low, high)` with a resolution of one tenth.
///
/// Collapses to `low` when the range holds no tenth.
pub fn frand_range<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    let (low, high) = ((low * 10.0) as i64, (high * 10.0) as i64);
    if low >= high {
        return low as f64 / 10.0;
    }
    rng.random_range(low..high) as f64 / 10.0
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let magnitude = frand_range(rng, JITTER.0, JITTER.1);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// Insert one wobbled point into every segment longer than the threshold.
///
/// Original points are kept in place and in order.
pub fn perturb<R: Rng + ?Sized>(points: &[Point], rng: &mut R) -> Vec<Point> {
    let Some(last) = points.last() else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(points.len() * 2);
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        result.push(start);

        let length = start.distance(end);
        if length > SPLIT_THRESHOLD {
            let along = frand_range(rng, SPLIT_CLEARANCE, length - SPLIT_CLEARANCE);
            let split = start.towards(end, along);
            result.push(Point::new(split.x + jitter(rng), split.y + jitter(rng)));
        }
    }
    result.push(*last);
    result
}

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from a GeoJSON position (`[lon, lat, ...]`). Returns `None` when
    /// the position is short or lon/lat are not usable numbers.
    pub fn from_position(position: &[Ordinate]) -> Option<Self> {
        match position {
            [Ordinate(Some(lng)), Ordinate(Some(lat)), ..] => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }
}

/// Pixel position (projected or on screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn round(self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One entry of a GeoJSON position. `null`, strings and non-finite numbers
/// decode as `None` so a bad elevation doesn't take the whole geometry down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ordinate(pub Option<f64>);

impl<'de> Deserialize<'de> for Ordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Ordinate(value.as_f64().filter(|v| v.is_finite())))
    }
}

impl From<f64> for Ordinate {
    fn from(v: f64) -> Self {
        Ordinate(Some(v).filter(|v| v.is_finite()))
    }
}

/// GeoJSON position: `[lon, lat]` or `[lon, lat, elevation]`.
pub type Position = Vec<Ordinate>;

/// Position from plain numbers.
pub fn position(values: &[f64]) -> Position {
    values.iter().copied().map(Ordinate::from).collect()
}

/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

/// A drawable line. Polygon rings are `closed`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPath {
    pub points: Vec<LatLng>,
    pub closed: bool,
}

impl Geometry {
    /// All line and ring paths of this geometry. Points contribute nothing.
    /// Invalid positions are dropped; paths with fewer than two points are
    /// discarded.
    pub fn paths(&self) -> Vec<GeoPath> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths(&self, out: &mut Vec<GeoPath>) {
        match self {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => {}
            Geometry::LineString { coordinates } => push_path(out, coordinates, false),
            Geometry::MultiLineString { coordinates } => {
                for line in coordinates {
                    push_path(out, line, false);
                }
            }
            Geometry::Polygon { coordinates } => {
                for ring in coordinates {
                    push_path(out, ring, true);
                }
            }
            Geometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        push_path(out, ring, true);
                    }
                }
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_paths(out);
                }
            }
        }
    }

    /// Location and third coordinate of every point in this geometry
    /// (`Point`, `MultiPoint`, and points nested in collections). Positions
    /// without a usable lon/lat are left out.
    pub fn points(&self) -> Vec<(LatLng, Option<f64>)> {
        let mut out = Vec::new();
        self.collect_points(&mut out);
        out
    }

    fn collect_points(&self, out: &mut Vec<(LatLng, Option<f64>)>) {
        match self {
            Geometry::Point { coordinates } => out.extend(located(coordinates)),
            Geometry::MultiPoint { coordinates } => {
                out.extend(coordinates.iter().filter_map(|p| located(p)));
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_points(out);
                }
            }
            _ => {}
        }
    }
}

fn located(position: &[Ordinate]) -> Option<(LatLng, Option<f64>)> {
    let location = LatLng::from_position(position)?;
    let elevation = position.get(2).and_then(|o| o.0);
    Some((location, elevation))
}

fn push_path(out: &mut Vec<GeoPath>, positions: &[Position], closed: bool) {
    let points: Vec<LatLng> = positions
        .iter()
        .filter_map(|p| LatLng::from_position(p))
        .collect();
    if points.len() >= 2 {
        out.push(GeoPath { points, closed });
    }
}

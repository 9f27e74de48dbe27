use serde::{Deserialize, Serialize};
use std::fmt;

// longitude is x, latitude is y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
  pub lng: f64,
  pub lat: f64,
}

impl Coordinate {
  pub fn new(lng: f64, lat: f64) -> Coordinate {
    Coordinate { lng, lat }
  }
}

impl From<(f64, f64)> for Coordinate {
  fn from((lng, lat): (f64, f64)) -> Self {
    Coordinate::new(lng, lat)
  }
}

impl fmt::Display for Coordinate {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "({}, {})", self.lng, self.lat)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
  Point(Coordinate),
  MultiPoint(Vec<Coordinate>),
  /// A single ring, including the closing point when it was decoded from text.
  Polygon(Vec<Coordinate>),
}

impl Geometry {
  pub fn kind(&self) -> &'static str {
    match self {
      Geometry::Point(_) => "POINT",
      Geometry::MultiPoint(_) => "MULTIPOINT",
      Geometry::Polygon(_) => "POLYGON",
    }
  }

  pub fn coordinates(&self) -> Vec<Coordinate> {
    match self {
      Geometry::Point(c) => vec![*c],
      Geometry::MultiPoint(cs) | Geometry::Polygon(cs) => cs.clone(),
    }
  }
}

// Strips the closing duplicate of a ring, if present.
pub fn open_ring(mut ring: Vec<Coordinate>) -> Vec<Coordinate> {
  if ring.len() > 1 && ring.first() == ring.last() {
    ring.pop();
  }
  ring
}

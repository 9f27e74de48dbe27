//! Well-Known Text encoding for the three geometry kinds the backend exchanges:
//! `POINT`, `MULTIPOINT` and single-ring `POLYGON`.
//!
//! Decoders distinguish "the text is not this kind of geometry" (`Ok(None)`)
//! from "the text is this kind of geometry but a coordinate is broken"
//! (`Err`). POINT and MULTIPOINT are found anywhere in the input, POLYGON
//! has to match the whole string.

use crate::geom::{Coordinate, Geometry};
use lazy_static::lazy_static;
use regex::Regex;

pub use crate::geom::open_ring;

pub const MIN_POLYGON_POINTS: usize = 3;

lazy_static! {
  static ref POINT_RE: Regex = Regex::new(r"POINT\(([^\s()]+) ([^\s()]+)\)").unwrap();
  static ref MULTIPOINT_RE: Regex = Regex::new(r"MULTIPOINT\(([^)]*)\)").unwrap();
  static ref POLYGON_RE: Regex = Regex::new(r"^POLYGON\s*\(\((.+)\)\)$").unwrap();
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WktError {
  #[error("invalid geometry: a polygon needs at least {expected} points, got {found}")]
  InvalidGeometry { expected: usize, found: usize },
  #[error("invalid number in coordinate: {token:?}")]
  InvalidNumber { token: String },
  #[error("malformed coordinate, expected \"<lng> <lat>\": {token:?}")]
  MalformedCoordinate { token: String },
  #[error("{kind} with nested coordinate groups is not supported: {list:?}")]
  NestedGroups { kind: &'static str, list: String },
}

// f64's Display is the shortest representation that parses back to the same
// value and never switches to exponent notation.
fn format_number(value: f64) -> String {
  if value == 0.0 {
    // also catches -0.0
    return "0".to_string();
  }
  value.to_string()
}

fn format_coordinate(c: &Coordinate) -> String {
  format!("{} {}", format_number(c.lng), format_number(c.lat))
}

fn format_coordinates<'a, I: IntoIterator<Item = &'a Coordinate>>(coords: I) -> String {
  coords
    .into_iter()
    .map(format_coordinate)
    .collect::<Vec<_>>()
    .join(", ")
}

fn parse_number(token: &str) -> Result<f64, WktError> {
  match token.parse::<f64>() {
    Ok(v) if v.is_finite() => Ok(v),
    _ => Err(WktError::InvalidNumber {
      token: token.to_string(),
    }),
  }
}

// "<lng> <lat>" with any amount of whitespace around and between the fields.
fn parse_coordinate(token: &str) -> Result<Coordinate, WktError> {
  let fields: Vec<&str> = token.split_whitespace().collect();
  if fields.len() != 2 {
    return Err(WktError::MalformedCoordinate {
      token: token.trim().to_string(),
    });
  }
  Ok(Coordinate::new(
    parse_number(fields[0])?,
    parse_number(fields[1])?,
  ))
}

// Only flat lists are read: a POLYGON with interior rings or a MULTIPOINT
// written as `((1 2), (3 4))` fails here rather than on a stray parenthesis.
fn parse_coordinate_list(kind: &'static str, list: &str) -> Result<Vec<Coordinate>, WktError> {
  if list.contains(|ch| ch == '(' || ch == ')') {
    return Err(WktError::NestedGroups {
      kind,
      list: list.to_string(),
    });
  }
  list.split(',').map(parse_coordinate).collect()
}

pub fn encode_point(coordinate: Coordinate) -> String {
  format!("POINT({})", format_coordinate(&coordinate))
}

/// Finds the first `POINT(<lng> <lat>)` anywhere in `text`.
///
/// The match is not anchored, so `"foo POINT(10 20) bar"` decodes to
/// `(10, 20)`. So does `"MULTIPOINT(10 20)"`; use [`decode_geometry`] when
/// the kind is not known up front.
pub fn decode_point(text: &str) -> Result<Option<Coordinate>, WktError> {
  let caps = match POINT_RE.captures(text) {
    Some(caps) => caps,
    None => return Ok(None),
  };
  let lng = parse_number(&caps[1])?;
  let lat = parse_number(&caps[2])?;
  Ok(Some(Coordinate::new(lng, lat)))
}

/// [`decode_point`], shaped like the MULTIPOINT decoder's output.
pub fn decode_point_as_singleton(text: &str) -> Result<Option<Vec<Coordinate>>, WktError> {
  Ok(decode_point(text)?.map(|c| vec![c]))
}

pub fn encode_multi_point(coordinates: &[Coordinate]) -> String {
  format!("MULTIPOINT({})", format_coordinates(coordinates))
}

/// Finds the first `MULTIPOINT(...)` anywhere in `text`. `MULTIPOINT()`
/// decodes to an empty list.
///
/// Points are bare `<lng> <lat>` pairs. The parenthesized form
/// `MULTIPOINT((1 2), (3 4))` is rejected with [`WktError::NestedGroups`].
pub fn decode_multi_point(text: &str) -> Result<Option<Vec<Coordinate>>, WktError> {
  let caps = match MULTIPOINT_RE.captures(text) {
    Some(caps) => caps,
    None => return Ok(None),
  };
  let list = &caps[1];
  if list.trim().is_empty() {
    return Ok(Some(Vec::new()));
  }
  parse_coordinate_list("MULTIPOINT", list).map(Some)
}

/// Encodes `coordinates` as a closed ring. The input is the open ring: the
/// first point is repeated at the end of the output.
pub fn encode_polygon(coordinates: &[Coordinate]) -> Result<String, WktError> {
  if coordinates.len() < MIN_POLYGON_POINTS {
    return Err(WktError::InvalidGeometry {
      expected: MIN_POLYGON_POINTS,
      found: coordinates.len(),
    });
  }
  let ring = coordinates.iter().chain(coordinates.first());
  Ok(format!("POLYGON(({}))", format_coordinates(ring)))
}

/// Decodes a `POLYGON((...))` that spans the whole of `text`.
///
/// The returned ring keeps its closing point, so it is one longer than the
/// slice given to [`encode_polygon`]. Pass it through [`open_ring`] to get
/// the encoder's input shape back.
///
/// Only the exterior ring is supported. A polygon with interior rings is
/// rejected with [`WktError::NestedGroups`].
pub fn decode_polygon(text: &str) -> Result<Option<Vec<Coordinate>>, WktError> {
  let caps = match POLYGON_RE.captures(text) {
    Some(caps) => caps,
    None => return Ok(None),
  };
  parse_coordinate_list("POLYGON", &caps[1]).map(Some)
}

// POLYGON first because it is anchored, MULTIPOINT before POINT because
// "MULTIPOINT(" contains "POINT(".
pub fn decode_geometry(text: &str) -> Result<Option<Geometry>, WktError> {
  if let Some(ring) = decode_polygon(text)? {
    return Ok(Some(Geometry::Polygon(ring)));
  }
  if let Some(points) = decode_multi_point(text)? {
    return Ok(Some(Geometry::MultiPoint(points)));
  }
  Ok(decode_point(text)?.map(Geometry::Point))
}

/// A polygon ring that is already closed is not closed a second time.
pub fn encode_geometry(geometry: &Geometry) -> Result<String, WktError> {
  match geometry {
    Geometry::Point(c) => Ok(encode_point(*c)),
    Geometry::MultiPoint(cs) => Ok(encode_multi_point(cs)),
    Geometry::Polygon(ring) => encode_polygon(&open_ring(ring.clone())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn c(lng: f64, lat: f64) -> Coordinate {
    Coordinate::new(lng, lat)
  }

  #[test]
  fn test_encode_point() {
    assert_eq!(encode_point(c(10.0, 20.0)), "POINT(10 20)");
    assert_eq!(
      encode_point(c(-70.64827, -33.45694)),
      "POINT(-70.64827 -33.45694)"
    );
    assert_eq!(encode_point(c(-0.0, 0.5)), "POINT(0 0.5)");
    // no exponent notation
    assert_eq!(encode_point(c(1e-7, 1e21)), "POINT(0.0000001 1000000000000000000000)");
  }

  #[test]
  fn test_point_round_trip() {
    let samples = [
      c(0.0, 0.0),
      c(-70.64827, -33.45694),
      c(179.999999, -89.123456789),
      c(0.1 + 0.2, 1.0 / 3.0),
    ];
    for sample in samples {
      assert_eq!(decode_point(&encode_point(sample)), Ok(Some(sample)));
    }
  }

  #[test]
  fn test_decode_point_is_unanchored() {
    assert_eq!(decode_point("foo POINT(10 20) bar"), Ok(Some(c(10.0, 20.0))));
    assert_eq!(
      decode_point("POINT(1 2) POINT(3 4)"),
      Ok(Some(c(1.0, 2.0)))
    );
    assert_eq!(decode_point("POINT(1 2))"), Ok(Some(c(1.0, 2.0))));
  }

  #[test]
  fn test_decode_point_no_match() {
    assert_eq!(decode_point(""), Ok(None));
    assert_eq!(decode_point("POINT(10)"), Ok(None));
    assert_eq!(decode_point("POINT (10 20)"), Ok(None));
    assert_eq!(decode_point("POINT(10  20)"), Ok(None));
    assert_eq!(decode_point("point(10 20)"), Ok(None));
  }

  #[test]
  fn test_decode_point_rejects_bad_numbers() {
    assert_eq!(
      decode_point("POINT(abc 20)"),
      Err(WktError::InvalidNumber {
        token: "abc".to_string()
      })
    );
    assert!(decode_point("POINT(NaN 1)").is_err());
    assert!(decode_point("POINT(1 inf)").is_err());
    assert_eq!(decode_point("POINT(1e3 -2.5)"), Ok(Some(c(1000.0, -2.5))));
  }

  #[test]
  fn test_decode_point_as_singleton() {
    assert_eq!(
      decode_point_as_singleton("POINT(-70.6 -33.4)"),
      Ok(Some(vec![c(-70.6, -33.4)]))
    );
    assert_eq!(decode_point_as_singleton("LINESTRING(1 2, 3 4)"), Ok(None));
  }

  #[test]
  fn test_encode_multi_point() {
    assert_eq!(
      encode_multi_point(&[c(1.0, 2.0), c(3.5, -4.0)]),
      "MULTIPOINT(1 2, 3.5 -4)"
    );
    assert_eq!(encode_multi_point(&[]), "MULTIPOINT()");
  }

  #[test]
  fn test_multi_point_round_trip() {
    let points = vec![c(-70.6, -33.4), c(-70.61, -33.41), c(-70.6, -33.4), c(0.0, 0.0)];
    assert_eq!(
      decode_multi_point(&encode_multi_point(&points)),
      Ok(Some(points))
    );
    assert_eq!(decode_multi_point("MULTIPOINT()"), Ok(Some(vec![])));
  }

  #[test]
  fn test_decode_multi_point_tolerates_whitespace() {
    assert_eq!(
      decode_multi_point("SRID=4326;MULTIPOINT(  1 2 ,3   4,\t5 6 )"),
      Ok(Some(vec![c(1.0, 2.0), c(3.0, 4.0), c(5.0, 6.0)]))
    );
    assert_eq!(decode_multi_point("MULTIPOINT(   )"), Ok(Some(vec![])));
  }

  #[test]
  fn test_decode_multi_point_errors() {
    assert_eq!(decode_multi_point("POINT(1 2)"), Ok(None));
    assert_eq!(
      decode_multi_point("MULTIPOINT(1 2, x 3)"),
      Err(WktError::InvalidNumber {
        token: "x".to_string()
      })
    );
    assert_eq!(
      decode_multi_point("MULTIPOINT(1 2, 3)"),
      Err(WktError::MalformedCoordinate {
        token: "3".to_string()
      })
    );
    assert!(decode_multi_point("MULTIPOINT(1 2 3)").is_err());
    assert!(decode_multi_point("MULTIPOINT(1 2,)").is_err());
  }

  #[test]
  fn test_encode_polygon() {
    let square = [c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0), c(0.0, 4.0)];
    assert_eq!(
      encode_polygon(&square),
      Ok("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))".to_string())
    );
    // input is left alone
    assert_eq!(square.len(), 4);
  }

  #[test]
  fn test_encode_polygon_closes_ring() {
    let points = [c(-70.6, -33.4), c(-70.5, -33.4), c(-70.5, -33.3), c(-70.55, -33.2)];
    let text = encode_polygon(&points).unwrap();
    let inner = text
      .strip_prefix("POLYGON((")
      .and_then(|s| s.strip_suffix("))"))
      .unwrap();
    let entries: Vec<&str> = inner.split(',').map(str::trim).collect();
    assert_eq!(entries.len(), points.len() + 1);
    assert_eq!(entries.first(), entries.last());
  }

  #[test]
  fn test_encode_polygon_needs_three_points() {
    assert_eq!(
      encode_polygon(&[c(0.0, 0.0), c(1.0, 1.0)]),
      Err(WktError::InvalidGeometry {
        expected: 3,
        found: 2
      })
    );
    assert!(encode_polygon(&[]).is_err());
    assert!(encode_polygon(&[c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0)]).is_ok());
  }

  #[test]
  fn test_decode_polygon_keeps_closing_point() {
    let decoded = decode_polygon("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0))").unwrap();
    assert_eq!(
      decoded,
      Some(vec![
        c(0.0, 0.0),
        c(4.0, 0.0),
        c(4.0, 4.0),
        c(0.0, 4.0),
        c(0.0, 0.0)
      ])
    );
  }

  #[test]
  fn test_polygon_round_trip_through_open_ring() {
    let points = vec![c(-70.6, -33.4), c(-70.5, -33.4), c(-70.5, -33.3)];
    let ring = decode_polygon(&encode_polygon(&points).unwrap())
      .unwrap()
      .unwrap();
    assert_eq!(ring.len(), 4);
    assert_eq!(open_ring(ring), points);
  }

  #[test]
  fn test_decode_polygon_is_anchored() {
    assert_eq!(decode_polygon("foo POLYGON((0 0,1 0,0 1,0 0)) bar"), Ok(None));
    assert_eq!(decode_polygon("POLYGON((0 0,1 0,0 1,0 0)) "), Ok(None));
    assert_eq!(decode_polygon("POLYGON(0 0,1 0,0 1,0 0)"), Ok(None));
    assert_eq!(decode_polygon("POLYGON(())"), Ok(None));
    assert_eq!(
      decode_polygon("POLYGON ((0 0,1 0,0 1,0 0))"),
      Ok(Some(vec![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)]))
    );
  }

  #[test]
  fn test_decode_polygon_rejects_bad_numbers() {
    assert!(matches!(
      decode_polygon("POLYGON((0 0, a 0, 0 1, 0 0))"),
      Err(WktError::InvalidNumber { .. })
    ));
  }

  #[test]
  fn test_nested_groups_are_rejected() {
    assert_eq!(
      decode_polygon("POLYGON((0 0, 1 0, 0 1, 0 0), (0.1 0.1, 0.2 0.1, 0.1 0.2, 0.1 0.1))"),
      Err(WktError::NestedGroups {
        kind: "POLYGON",
        list: "0 0, 1 0, 0 1, 0 0), (0.1 0.1, 0.2 0.1, 0.1 0.2, 0.1 0.1".to_string()
      })
    );
    assert_eq!(
      decode_multi_point("MULTIPOINT((1 2), (3 4))"),
      Err(WktError::NestedGroups {
        kind: "MULTIPOINT",
        list: "(1 2".to_string()
      })
    );
    assert!(decode_geometry("MULTIPOINT((1 2), (3 4))")
      .unwrap_err()
      .to_string()
      .starts_with("MULTIPOINT with nested coordinate groups"));
  }

  #[test]
  fn test_decode_geometry_dispatch() {
    assert_eq!(
      decode_geometry("MULTIPOINT(1 2)"),
      Ok(Some(Geometry::MultiPoint(vec![c(1.0, 2.0)])))
    );
    assert_eq!(
      decode_geometry("POINT(1 2)"),
      Ok(Some(Geometry::Point(c(1.0, 2.0))))
    );
    assert!(matches!(
      decode_geometry("POLYGON((0 0, 1 0, 0 1, 0 0))"),
      Ok(Some(Geometry::Polygon(ring))) if ring.len() == 4
    ));
    assert_eq!(decode_geometry("LINESTRING(0 0, 1 1)"), Ok(None));
  }

  #[test]
  fn test_encode_geometry_does_not_double_close() {
    let ring = vec![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)];
    assert_eq!(
      encode_geometry(&Geometry::Polygon(ring)),
      Ok("POLYGON((0 0, 1 0, 0 1, 0 0))".to_string())
    );
    assert_eq!(
      encode_geometry(&Geometry::MultiPoint(vec![])),
      Ok("MULTIPOINT()".to_string())
    );
  }
}

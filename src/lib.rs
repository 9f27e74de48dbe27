//! Client-side toolkit for the delivery backend: WKT geometry encoding, a
//! typed REST client and demo fixtures.

pub mod api;
pub mod auth;
pub mod batch;
pub mod config;
pub mod fake;
pub mod geom;
pub mod models;
pub mod wkt;

pub use geom::{Coordinate, Geometry};
pub use wkt::WktError;

//! Polyline representation for route geometries.
//!
//! Route geometries arrive from the routing engines as GeoJSON
//! `[lon, lat]` arrays; conversion happens at that boundary and the rest of
//! the crate only sees ordered [`Coordinate`]s.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// A polyline representing a route geometry, start-to-end order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Builds a polyline from GeoJSON `[lon, lat]` positions.
    pub fn from_lon_lat(positions: &[[f64; 2]]) -> Self {
        Self {
            points: positions.iter().copied().map(Coordinate::from_lon_lat).collect(),
        }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at proportional position `ratio` (0.0..1.0) along the polyline.
    ///
    /// The position is picked by vertex index (`floor(len * ratio)`), not by
    /// arc length, so dense stretches of geometry pull the point toward them.
    pub fn point_at_ratio(&self, ratio: f64) -> Option<Coordinate> {
        if self.points.is_empty() || !ratio.is_finite() {
            return None;
        }
        let index = (self.points.len() as f64 * ratio.clamp(0.0, 1.0)).floor() as usize;
        let index = index.min(self.points.len() - 1);
        self.points.get(index).copied()
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }
}

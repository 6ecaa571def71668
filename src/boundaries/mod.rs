//! Constellation boundary polygons and their interpolation
//!
//! Official boundaries are given as sparse vertex lists. Drawn with straight
//! lines after projection they cut across the curvature of the sphere, so
//! [`BoundaryInterpolator`] inserts intermediate vertices along every edge.

pub mod iau;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INTERPOLATION_STEP_DEG;
use crate::coordinates::{shortest_ra_diff_deg, Coordinate};
use crate::{Result, SkyChartError};

/// Ordered, cyclic sequence of at least three vertices
///
/// The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct BoundaryPolygon {
    vertices: Vec<Coordinate>,
}

impl BoundaryPolygon {
    /// Fails with [`SkyChartError::InsufficientVertices`] below three vertices
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(SkyChartError::InsufficientVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; kept for symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges `(v_i, v_{i+1 mod N})`, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (&Coordinate, &Coordinate)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    pub fn into_vertices(self) -> Vec<Coordinate> {
        self.vertices
    }
}

impl TryFrom<Vec<Coordinate>> for BoundaryPolygon {
    type Error = SkyChartError;

    fn try_from(vertices: Vec<Coordinate>) -> Result<Self> {
        Self::new(vertices)
    }
}

impl From<BoundaryPolygon> for Vec<Coordinate> {
    fn from(polygon: BoundaryPolygon) -> Self {
        polygon.vertices
    }
}

/// Densifies boundary polygons
///
/// For every edge the shortest-path RA difference and the plain Dec
/// difference are split into `chunks = max(floor(|Δra| / step), floor(|Δdec| / step))`
/// equal steps. The edge start is always kept; points `1..chunks` are
/// inserted after it and the edge end is left to the next edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryInterpolator {
    step_deg: f64,
}

impl Default for BoundaryInterpolator {
    fn default() -> Self {
        Self {
            step_deg: DEFAULT_INTERPOLATION_STEP_DEG,
        }
    }
}

impl BoundaryInterpolator {
    /// Interpolator with a custom angular step in degrees
    pub fn with_step(step_deg: f64) -> Result<Self> {
        if !step_deg.is_finite() || step_deg <= 0.0 {
            return Err(SkyChartError::ConfigError(format!(
                "interpolation step must be positive, got {step_deg}"
            )));
        }
        Ok(Self { step_deg })
    }

    pub fn step_deg(&self) -> f64 {
        self.step_deg
    }

    pub fn interpolate(&self, polygon: &BoundaryPolygon) -> Result<BoundaryPolygon> {
        let mut dense = Vec::with_capacity(polygon.len());

        for (from, to) in polygon.edges() {
            let ra_diff = shortest_ra_diff_deg(from.ra_deg(), to.ra_deg());
            let dec_diff = to.dec_deg() - from.dec_deg();

            dense.push(*from);

            let chunks = (ra_diff.abs() / self.step_deg)
                .floor()
                .max((dec_diff.abs() / self.step_deg).floor()) as usize;
            if chunks == 0 {
                continue;
            }

            let ra_chunk = ra_diff / chunks as f64;
            let dec_chunk = dec_diff / chunks as f64;
            for j in 1..chunks {
                let j = j as f64;
                // from_degrees wraps RA back into [0, 360)
                dense.push(Coordinate::from_degrees(
                    from.ra_deg() + j * ra_chunk,
                    from.dec_deg() + j * dec_chunk,
                )?);
            }
        }

        BoundaryPolygon::new(dense)
    }
}

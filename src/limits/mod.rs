//! Region limits: extremal points, declination range, angular size and centroid
//!
//! Limits are what the chart uses to aim the camera at a constellation: the
//! centroid becomes the view direction and the angular separation becomes
//! the field of view.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::boundaries::BoundaryPolygon;
use crate::coordinates::Coordinate;
use crate::{Result, SkyChartError};

/// How the most separated vertex pair is searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtremalPairMode {
    /// Compare RA only, `acos(cos(Δra))`, ignoring declination.
    ///
    /// Known to misjudge regions reaching close to a celestial pole.
    #[default]
    RaOnly,
    /// Compare full great-circle distance between vertices
    GreatCircle,
}

/// An angle reported in both units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularSeparation {
    pub deg: f64,
    pub rad: f64,
}

impl AngularSeparation {
    pub fn from_radians(rad: f64) -> Self {
        Self {
            deg: rad.to_degrees(),
            rad,
        }
    }
}

/// Summary of a region on the sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LimitsDocument", into = "LimitsDocument")]
pub struct RegionLimits {
    /// First vertex of the most separated pair
    pub point_a: Coordinate,
    /// Second vertex of the most separated pair
    pub point_b: Coordinate,
    pub dec_min: f64,
    pub dec_max: f64,
    /// Great-circle distance between `(ra_b, dec_max)` and `(ra_a, dec_min)`
    pub angular_separation: AngularSeparation,
    pub centroid: Coordinate,
}

impl RegionLimits {
    /// The two bounding corners `(ra_b, dec_max)` and `(ra_a, dec_min)`
    pub fn bounding_points(&self) -> Result<[Coordinate; 2]> {
        Ok([
            Coordinate::from_degrees(self.point_b.ra_deg(), self.dec_max)?,
            Coordinate::from_degrees(self.point_a.ra_deg(), self.dec_min)?,
        ])
    }
}

/// Persisted form of [`RegionLimits`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsDocument {
    /// Bounding corners `(ra_b, dec_max)`, `(ra_a, dec_min)`
    pub points: [Coordinate; 2],
    /// The extremal vertices themselves
    pub extremal: [Coordinate; 2],
    pub dec_min: f64,
    pub dec_max: f64,
    pub angular_separation: AngularSeparation,
    pub centroid: Coordinate,
}

impl From<RegionLimits> for LimitsDocument {
    fn from(limits: RegionLimits) -> Self {
        // Corners are built from coordinates and declinations that are already valid
        let points = [
            corner(limits.point_b.ra_deg(), limits.dec_max, limits.point_b),
            corner(limits.point_a.ra_deg(), limits.dec_min, limits.point_a),
        ];
        LimitsDocument {
            points,
            extremal: [limits.point_a, limits.point_b],
            dec_min: limits.dec_min,
            dec_max: limits.dec_max,
            angular_separation: limits.angular_separation,
            centroid: limits.centroid,
        }
    }
}

fn corner(ra_deg: f64, dec_deg: f64, fallback: Coordinate) -> Coordinate {
    Coordinate::from_degrees(ra_deg, dec_deg).unwrap_or(fallback)
}

impl TryFrom<LimitsDocument> for RegionLimits {
    type Error = SkyChartError;

    fn try_from(doc: LimitsDocument) -> Result<Self> {
        if doc.dec_min > doc.dec_max || doc.angular_separation.rad < 0.0 {
            return Err(SkyChartError::MalformedRecord(format!(
                "inconsistent limits: dec {}..{}, separation {}",
                doc.dec_min, doc.dec_max, doc.angular_separation.rad
            )));
        }
        let [point_a, point_b] = doc.extremal;
        Ok(RegionLimits {
            point_a,
            point_b,
            dec_min: doc.dec_min,
            dec_max: doc.dec_max,
            angular_separation: doc.angular_separation,
            centroid: doc.centroid,
        })
    }
}

/// Computes [`RegionLimits`] for boundary polygons
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionSummarizer {
    mode: ExtremalPairMode,
}

impl RegionSummarizer {
    pub fn new(mode: ExtremalPairMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExtremalPairMode {
        self.mode
    }

    /// Summarize an unordered vertex set
    ///
    /// Fails with [`SkyChartError::InsufficientVertices`] below three vertices.
    pub fn summarize_vertices(&self, vertices: &[Coordinate]) -> Result<RegionLimits> {
        if vertices.len() < 3 {
            return Err(SkyChartError::InsufficientVertices(vertices.len()));
        }

        let (point_a, point_b) = self.extremal_pair(vertices);

        let (dec_min, dec_max) = vertices.iter().fold((90.0f64, -90.0f64), |(lo, hi), v| {
            (lo.min(v.dec_deg()), hi.max(v.dec_deg()))
        });

        let ra_a = point_a.ra_rad();
        let ra_b = point_b.ra_rad();
        let (dec_max_rad, dec_min_rad) = (dec_max.to_radians(), dec_min.to_radians());
        let cos_sep = dec_max_rad.sin() * dec_min_rad.sin()
            + dec_max_rad.cos() * dec_min_rad.cos() * (ra_b - ra_a).cos();
        let angular_separation = AngularSeparation::from_radians(cos_sep.clamp(-1.0, 1.0).acos());

        // The plain average lands on the wrong side of the sphere when the
        // pair straddles RA 0; the antipodal midpoint is then the closer one.
        let mut centroid_ra = (ra_a + ra_b) / 2.0;
        let direct = ra_distance(ra_a, centroid_ra);
        let antipodal = ra_distance(ra_a, centroid_ra + PI);
        if antipodal < direct {
            centroid_ra += PI;
        }
        let centroid = Coordinate::from_degrees(centroid_ra.to_degrees(), (dec_min + dec_max) / 2.0)?;

        Ok(RegionLimits {
            point_a,
            point_b,
            dec_min,
            dec_max,
            angular_separation,
            centroid,
        })
    }

    pub fn summarize(&self, polygon: &BoundaryPolygon) -> Result<RegionLimits> {
        self.summarize_vertices(polygon.vertices())
    }

    /// O(N²) search over ordered pairs; ties keep the first pair found
    fn extremal_pair(&self, vertices: &[Coordinate]) -> (Coordinate, Coordinate) {
        let mut best = (vertices[0], vertices[0]);
        let mut max_distance = 0.0;

        for p in vertices {
            for q in vertices {
                let distance = match self.mode {
                    ExtremalPairMode::RaOnly => ra_distance(p.ra_rad(), q.ra_rad()),
                    ExtremalPairMode::GreatCircle => p.separation(q),
                };
                if distance > max_distance {
                    max_distance = distance;
                    best = (*p, *q);
                }
            }
        }

        best
    }
}

/// RA-only angular distance `acos(cos(b - a))`, in [0, π]
fn ra_distance(ra_a: f64, ra_b: f64) -> f64 {
    (ra_b - ra_a).cos().clamp(-1.0, 1.0).acos()
}

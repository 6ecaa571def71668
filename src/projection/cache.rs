//! Opt-in RA-reuse memoization for projecting many points sharing an RA
//!
//! Grid meridians and catalog scans often project long runs of points with
//! the same right ascension. [`CachedProjector`] keeps the cosine and sine of
//! the last RA it saw. The cache lives in the projector value, never in the
//! shared [`SphereTransform`], so concurrent users each bring their own.

use super::{ProjectedPoint, SphereTransform};
use crate::coordinates::cartesian::Cartesian3;
use crate::coordinates::{normalize_ra_deg, validate_degrees};
use crate::Result;

/// Projects RA/Dec pairs, reusing the RA terms between consecutive calls
///
/// Output is identical to building a [`crate::Coordinate`] and calling
/// [`SphereTransform::project_coordinate`].
#[derive(Debug)]
pub struct CachedProjector<'a> {
    transform: &'a SphereTransform,
    last_ra_deg: Option<f64>,
    cos_ra: f64,
    sin_ra: f64,
    hits: usize,
    misses: usize,
}

impl<'a> CachedProjector<'a> {
    pub fn new(transform: &'a SphereTransform) -> Self {
        Self {
            transform,
            last_ra_deg: None,
            cos_ra: 1.0,
            sin_ra: 0.0,
            hits: 0,
            misses: 0,
        }
    }

    /// Project RA/Dec given in degrees
    ///
    /// Validation and RA wrapping follow [`crate::Coordinate::from_degrees`].
    pub fn project_degrees(&mut self, ra_deg: f64, dec_deg: f64) -> Result<ProjectedPoint> {
        validate_degrees(ra_deg, dec_deg)?;
        let ra_deg = normalize_ra_deg(ra_deg);

        if self.last_ra_deg == Some(ra_deg) {
            self.hits += 1;
        } else {
            let ra_rad = ra_deg.to_radians();
            self.cos_ra = ra_rad.cos();
            self.sin_ra = ra_rad.sin();
            self.last_ra_deg = Some(ra_deg);
            self.misses += 1;
        }

        let direction = Cartesian3::from_ra_terms(self.cos_ra, self.sin_ra, dec_deg.to_radians());
        Ok(self.transform.project_direction(direction))
    }

    /// Number of calls that reused the cached RA terms
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of calls that had to evaluate new RA terms
    pub fn misses(&self) -> usize {
        self.misses
    }
}

//! Sky positions
//!
//! [`Coordinate`] is the immutable value every other module consumes: a
//! validated RA/Dec pair carried together with its radians and its unit
//! Cartesian direction.

pub mod cartesian;

use serde::{Deserialize, Serialize};

use crate::constants::{DEG_PER_HOUR, FULL_CIRCLE_DEG, POLE_DEC_DEG};
use crate::{Result, SkyChartError};
use cartesian::Cartesian3;

/// Wraps a right ascension into [0, 360)
pub(crate) fn normalize_ra_deg(ra_deg: f64) -> f64 {
    let ra = ra_deg.rem_euclid(FULL_CIRCLE_DEG);
    // rem_euclid of a tiny negative value rounds up to exactly 360
    if ra >= FULL_CIRCLE_DEG {
        0.0
    } else {
        ra
    }
}

/// RA wraps, Dec does not: only a finite RA and a Dec inside [-90, 90] pass.
pub(crate) fn validate_degrees(ra_deg: f64, dec_deg: f64) -> Result<()> {
    if !ra_deg.is_finite() || !dec_deg.is_finite() || dec_deg.abs() > POLE_DEC_DEG {
        return Err(SkyChartError::InvalidCoordinate { ra_deg, dec_deg });
    }
    Ok(())
}

/// Signed RA difference `to - from` taking the short way around, in (-180, 180]
pub fn shortest_ra_diff_deg(from_ra_deg: f64, to_ra_deg: f64) -> f64 {
    let mut diff = to_ra_deg - from_ra_deg;
    if diff > 180.0 {
        diff -= FULL_CIRCLE_DEG;
    }
    if diff < -180.0 {
        diff += FULL_CIRCLE_DEG;
    }
    diff
}

/// A position on the celestial sphere
///
/// Constructed only from a validated (RA, Dec) pair. RA is normalized into
/// [0, 360) degrees, Dec must lie in [-90, 90] degrees. The Cartesian
/// direction is computed once at construction with
/// `x = cos(ra)·cos(dec)`, `y = sin(ra)·cos(dec)`, `z = sin(dec)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateInput", into = "CoordinateDocument")]
pub struct Coordinate {
    ra_deg: f64,
    dec_deg: f64,
    ra_rad: f64,
    dec_rad: f64,
    cartesian: Cartesian3,
}

impl Coordinate {
    /// Create a coordinate from RA/Dec in degrees
    ///
    /// Fails with [`SkyChartError::InvalidCoordinate`] when Dec is outside
    /// [-90, 90] or either angle is not finite. Out of range RA is wrapped.
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Result<Self> {
        validate_degrees(ra_deg, dec_deg)?;

        let ra_deg = normalize_ra_deg(ra_deg);
        let ra_rad = ra_deg.to_radians();
        let dec_rad = dec_deg.to_radians();

        Ok(Self {
            ra_deg,
            dec_deg,
            ra_rad,
            dec_rad,
            cartesian: Cartesian3::from_spherical(ra_rad, dec_rad),
        })
    }

    /// Create a coordinate from RA/Dec in radians
    pub fn from_radians(ra_rad: f64, dec_rad: f64) -> Result<Self> {
        Self::from_degrees(ra_rad.to_degrees(), dec_rad.to_degrees())
    }

    /// Recover a coordinate from a direction vector of any length
    pub fn from_cartesian(direction: Cartesian3) -> Result<Self> {
        let (ra, dec) = direction.to_spherical();
        Self::from_radians(ra, dec)
    }

    pub fn ra_deg(&self) -> f64 {
        self.ra_deg
    }

    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }

    pub fn ra_rad(&self) -> f64 {
        self.ra_rad
    }

    pub fn dec_rad(&self) -> f64 {
        self.dec_rad
    }

    /// Right ascension in hours
    pub fn ra_hours(&self) -> f64 {
        self.ra_deg / DEG_PER_HOUR
    }

    /// Unit Cartesian direction
    pub fn cartesian(&self) -> Cartesian3 {
        self.cartesian
    }

    /// Great-circle distance to another coordinate in radians
    ///
    /// Spherical law of cosines:
    /// `acos(sin(d1)·sin(d2) + cos(d1)·cos(d2)·cos(Δra))`.
    pub fn separation(&self, other: &Coordinate) -> f64 {
        let cos_sep = self.dec_rad.sin() * other.dec_rad.sin()
            + self.dec_rad.cos() * other.dec_rad.cos() * (other.ra_rad - self.ra_rad).cos();
        cos_sep.clamp(-1.0, 1.0).acos()
    }
}

/// Persisted form of a [`Coordinate`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateDocument {
    pub equatorial: EquatorialDocument,
    pub cartesian: Cartesian3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquatorialDocument {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub ra_rad: f64,
    pub dec_rad: f64,
    /// Right ascension in hours
    pub ra_hs: f64,
}

impl From<Coordinate> for CoordinateDocument {
    fn from(coord: Coordinate) -> Self {
        CoordinateDocument {
            equatorial: EquatorialDocument {
                ra_deg: coord.ra_deg,
                dec_deg: coord.dec_deg,
                ra_rad: coord.ra_rad,
                dec_rad: coord.dec_rad,
                ra_hs: coord.ra_hours(),
            },
            cartesian: coord.cartesian,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DegreesInput {
    ra_deg: f64,
    dec_deg: f64,
}

/// Accepted input shapes: the persisted document, or a bare `{ra_deg, dec_deg}`.
///
/// Derived fields are never trusted; the coordinate is rebuilt from degrees.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordinateInput {
    Document { equatorial: DegreesInput },
    Plain(DegreesInput),
}

impl TryFrom<CoordinateInput> for Coordinate {
    type Error = SkyChartError;

    fn try_from(input: CoordinateInput) -> Result<Self> {
        let degrees = match input {
            CoordinateInput::Document { equatorial } => equatorial,
            CoordinateInput::Plain(degrees) => degrees,
        };
        Coordinate::from_degrees(degrees.ra_deg, degrees.dec_deg)
    }
}

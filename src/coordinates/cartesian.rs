//! # Cartesian Direction Module
//!
//! Unit-sphere Cartesian vectors are the shared currency between catalog
//! positions and the camera. Every sky position is turned into one of these
//! exactly once, with a single convention:
//!
//! - **X-axis**: toward RA = 0°, Dec = 0°
//! - **Y-axis**: toward RA = 90°, Dec = 0°
//! - **Z-axis**: toward the north celestial pole (Dec = +90°)
//!
//! ```rust
//! use skychart::coordinates::cartesian::Cartesian3;
//! use std::f64::consts::PI;
//!
//! let pole = Cartesian3::from_spherical(0.0, PI / 2.0);
//! assert!((pole.z - 1.0).abs() < 1e-15);
//! ```

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Three-dimensional Cartesian direction
///
/// Components are stored as given. Directions built through
/// [`Cartesian3::from_spherical`] have unit magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartesian3 {
    /// X-component (toward RA = 0°)
    pub x: f64,
    /// Y-component (toward RA = 90°)
    pub y: f64,
    /// Z-component (toward north celestial pole)
    pub z: f64,
}

impl Cartesian3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Creates a unit direction from right ascension and declination in radians
    ///
    /// - `x = cos(ra) * cos(dec)`
    /// - `y = sin(ra) * cos(dec)`
    /// - `z = sin(dec)`
    ///
    /// The formulas are well defined at the poles, where RA has no effect.
    pub fn from_spherical(ra: f64, dec: f64) -> Self {
        Self::from_ra_terms(ra.cos(), ra.sin(), dec)
    }

    /// Same as [`Cartesian3::from_spherical`] with the RA terms already evaluated.
    ///
    /// Kept separate so the RA-reuse cache in the projection module goes
    /// through exactly the same arithmetic as the uncached path.
    pub(crate) fn from_ra_terms(cos_ra: f64, sin_ra: f64, dec: f64) -> Self {
        let cos_dec = dec.cos();
        Cartesian3 {
            x: cos_ra * cos_dec,
            y: sin_ra * cos_dec,
            z: dec.sin(),
        }
    }

    /// Converts back to `(ra, dec)` in radians
    ///
    /// RA is normalized to [0, 2π). At the poles (and for the zero vector)
    /// RA is undefined and 0 is returned.
    pub fn to_spherical(&self) -> (f64, f64) {
        let distance = self.magnitude();
        if distance == 0.0 {
            return (0.0, 0.0);
        }

        let dec = (self.z / distance).clamp(-1.0, 1.0).asin();
        let ra = if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            let mut ra = self.y.atan2(self.x);
            if ra < 0.0 {
                ra += 2.0 * PI;
            }
            ra
        };

        (ra, dec)
    }

    /// Euclidean length of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Angle between two directions in radians [0, π]
    pub fn angular_distance(&self, other: &Cartesian3) -> f64 {
        let mag_product = self.magnitude() * other.magnitude();
        if mag_product == 0.0 {
            return 0.0;
        }

        // Rounding can push the cosine just outside [-1, 1]
        (self.dot(other) / mag_product).clamp(-1.0, 1.0).acos()
    }

    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

impl std::ops::Mul<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn mul(self, scalar: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

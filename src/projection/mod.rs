//! Camera rotation and projection
//!
//! A [`SphereTransform`] maps a unit-sphere direction to a point on the image
//! plane plus a signed depth. The depth decides visibility: positive values
//! face the camera, everything else is on the far side of the sphere.
//!
//! The rotation is applied about Z, then Y, then X. Rotations do not
//! commute; this order produces the "RA pan, then declination tilt" camera
//! used by every chart.

mod cache;

pub use cache::CachedProjector;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::constants::CAMERA_AXIS_OFFSET_DEG;
use crate::coordinates::cartesian::Cartesian3;
use crate::coordinates::Coordinate;
use crate::{Result, SkyChartError};

/// Cosine and sine of one rotation axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRotation {
    cos: f64,
    sin: f64,
}

impl AxisRotation {
    fn from_degrees(angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self {
            cos: rad.cos(),
            sin: rad.sin(),
        }
    }
}

/// Immutable camera orientation and field of view
///
/// The stored X and Z angles already include [`CAMERA_AXIS_OFFSET_DEG`];
/// the trigonometric constants and the camera scale `1 / tan(fov / 2)` are
/// computed once here. Changing any angle means building a new state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    angle_x_deg: f64,
    angle_y_deg: f64,
    angle_z_deg: f64,
    fov_deg: f64,
    x: AxisRotation,
    y: AxisRotation,
    z: AxisRotation,
    camera_scale: f64,
}

impl RotationState {
    /// Build a rotation state from caller angles in degrees
    ///
    /// `angle_x` and `angle_z` are shifted by +270° before use. Fails with
    /// [`SkyChartError::DegenerateFieldOfView`] unless `0 < fov_deg < 180`.
    pub fn new(angle_x_deg: f64, angle_y_deg: f64, angle_z_deg: f64, fov_deg: f64) -> Result<Self> {
        if !(angle_x_deg.is_finite() && angle_y_deg.is_finite() && angle_z_deg.is_finite()) {
            return Err(SkyChartError::ConfigError(format!(
                "camera angles must be finite, got ({angle_x_deg}, {angle_y_deg}, {angle_z_deg})"
            )));
        }
        if !fov_deg.is_finite() || fov_deg <= 0.0 || fov_deg >= 180.0 {
            return Err(SkyChartError::DegenerateFieldOfView(fov_deg));
        }

        let angle_x_deg = angle_x_deg + CAMERA_AXIS_OFFSET_DEG;
        let angle_z_deg = angle_z_deg + CAMERA_AXIS_OFFSET_DEG;

        Ok(Self {
            angle_x_deg,
            angle_y_deg,
            angle_z_deg,
            fov_deg,
            x: AxisRotation::from_degrees(angle_x_deg),
            y: AxisRotation::from_degrees(angle_y_deg),
            z: AxisRotation::from_degrees(angle_z_deg),
            camera_scale: 1.0 / (fov_deg.to_radians() / 2.0).tan(),
        })
    }

    /// Stored X angle in degrees, offset included
    pub fn angle_x_deg(&self) -> f64 {
        self.angle_x_deg
    }

    pub fn angle_y_deg(&self) -> f64 {
        self.angle_y_deg
    }

    /// Stored Z angle in degrees, offset included
    pub fn angle_z_deg(&self) -> f64 {
        self.angle_z_deg
    }

    pub fn fov_deg(&self) -> f64 {
        self.fov_deg
    }

    /// `1 / tan(fov / 2)`
    pub fn camera_scale(&self) -> f64 {
        self.camera_scale
    }

    /// Rotate a vector about Z, then Y, then X
    pub fn rotate(&self, p: Cartesian3) -> Cartesian3 {
        let (z, y, x) = (self.z, self.y, self.x);
        let p = Cartesian3::new(
            p.x * z.cos + p.y * z.sin,
            -p.x * z.sin + p.y * z.cos,
            p.z,
        );
        let p = Cartesian3::new(
            p.x * y.cos - p.z * y.sin,
            p.y,
            p.x * y.sin + p.z * y.cos,
        );
        Cartesian3::new(
            p.x,
            p.y * x.cos + p.z * x.sin,
            -p.y * x.sin + p.z * x.cos,
        )
    }

    /// The same rotation as a single matrix, `Rx * Ry * Rz`
    pub fn matrix(&self) -> Matrix3<f64> {
        let (z, y, x) = (self.z, self.y, self.x);
        #[rustfmt::skip]
        let rz = Matrix3::new(
            z.cos, z.sin, 0.0,
            -z.sin, z.cos, 0.0,
            0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let ry = Matrix3::new(
            y.cos, 0.0, -y.sin,
            0.0, 1.0, 0.0,
            y.sin, 0.0, y.cos,
        );
        #[rustfmt::skip]
        let rx = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, x.cos, x.sin,
            0.0, -x.sin, x.cos,
        );
        rx * ry * rz
    }
}

/// A point on the image plane relative to the image center, with depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    /// Rotated Z component; positive when facing the camera
    pub depth: f64,
}

impl ProjectedPoint {
    pub fn is_front_facing(&self) -> bool {
        self.depth > 0.0
    }

    /// Shift into pixel space given the image center
    pub fn to_pixel(&self, center_x: f64, center_y: f64) -> PixelPoint {
        PixelPoint {
            x: self.x + center_x,
            y: self.y + center_y,
        }
    }
}

/// Absolute pixel position in the output image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Rotation plus perspective camera scaling onto a sphere of `radius_px`
///
/// Immutable after construction and therefore safe to share across
/// worker threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereTransform {
    rotation: RotationState,
    radius_px: f64,
}

impl SphereTransform {
    pub fn new(
        angle_x_deg: f64,
        angle_y_deg: f64,
        angle_z_deg: f64,
        fov_deg: f64,
        radius_px: f64,
    ) -> Result<Self> {
        if !radius_px.is_finite() || radius_px <= 0.0 {
            return Err(SkyChartError::InvalidRadius(radius_px));
        }
        Ok(Self {
            rotation: RotationState::new(angle_x_deg, angle_y_deg, angle_z_deg, fov_deg)?,
            radius_px,
        })
    }

    /// Camera looking straight at `center`, which projects to the image center
    pub fn aimed_at(center: &Coordinate, fov_deg: f64, radius_px: f64) -> Result<Self> {
        Self::new(center.dec_deg(), 0.0, center.ra_deg(), fov_deg, radius_px)
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn radius_px(&self) -> f64 {
        self.radius_px
    }

    /// Project a direction given by its components
    pub fn project(&self, x: f64, y: f64, z: f64) -> ProjectedPoint {
        self.project_direction(Cartesian3::new(x, y, z))
    }

    /// Scale by the sphere radius, rotate, then apply the camera scale to X and Y
    pub fn project_direction(&self, direction: Cartesian3) -> ProjectedPoint {
        let p = self.rotation.rotate(direction * self.radius_px);
        let k = self.rotation.camera_scale;
        ProjectedPoint {
            x: p.x * k,
            y: p.y * k,
            depth: p.z,
        }
    }

    pub fn project_coordinate(&self, coord: &Coordinate) -> ProjectedPoint {
        self.project_direction(coord.cartesian())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_offset_is_stored() {
        let state = RotationState::new(0.0, 0.0, 0.0, 90.0).unwrap();
        assert_eq!(state.angle_x_deg(), 270.0);
        assert_eq!(state.angle_y_deg(), 0.0);
        assert_eq!(state.angle_z_deg(), 270.0);
        assert_abs_diff_eq!(state.camera_scale(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cancelled_offset_is_pure_camera_scaling() {
        // Stored angles end up at zero, leaving only the camera scale
        let transform = SphereTransform::new(-270.0, 0.0, -270.0, 90.0, 1.0).unwrap();
        let p = transform.project(0.3, -0.5, 0.7);
        assert_abs_diff_eq!(p.x, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.depth, 0.7, epsilon = 1e-12);

        let narrow = SphereTransform::new(-270.0, 0.0, -270.0, 60.0, 2.0).unwrap();
        let k = 1.0 / 30f64.to_radians().tan();
        let p = narrow.project(0.3, -0.5, 0.7);
        assert_abs_diff_eq!(p.x, 2.0 * 0.3 * k, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 2.0 * -0.5 * k, epsilon = 1e-12);
        // Depth is never scaled by the camera
        assert_abs_diff_eq!(p.depth, 2.0 * 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_literal_zero_camera_looks_at_origin() {
        // With the offset baked in, zero angles aim at RA 0, Dec 0
        let transform = SphereTransform::new(0.0, 0.0, 0.0, 90.0, 1.0).unwrap();
        let p = transform.project(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.depth, 1.0, epsilon = 1e-12);

        // North is up (negative image y), RA 90° lands on the left
        let north = transform.project(0.0, 0.0, 1.0);
        assert!(north.y < 0.0);
        let east = transform.project(0.0, 1.0, 0.0);
        assert!(east.x < 0.0);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(83.8, -5.4)]
    #[case(350.0, 45.0)]
    #[case(180.0, -89.0)]
    #[case(12.0, 90.0)]
    fn test_aimed_camera_centers_target(#[case] ra: f64, #[case] dec: f64) {
        let target = Coordinate::from_degrees(ra, dec).unwrap();
        let transform = SphereTransform::aimed_at(&target, 40.0, 400.0).unwrap();
        let p = transform.project_coordinate(&target);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.depth, 400.0, epsilon = 1e-9);

        let antipode = Coordinate::from_cartesian(target.cartesian() * -1.0).unwrap();
        assert!(!transform.project_coordinate(&antipode).is_front_facing());
    }

    #[test]
    fn test_rotation_order_is_z_then_x() {
        // Stored Z = 90° and X = 90°
        let transform = SphereTransform::new(-180.0, 0.0, -180.0, 90.0, 1.0).unwrap();
        let p = transform.project(1.0, 0.0, 0.0);
        // Z first sends +X to -Y, then X sends -Y to +Z. The other order
        // would leave the point at (0, -1, 0).
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.depth, 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(180.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    fn test_degenerate_fov(#[case] fov: f64) {
        assert!(matches!(
            SphereTransform::new(0.0, 0.0, 0.0, fov, 100.0),
            Err(SkyChartError::DegenerateFieldOfView(_))
        ));
    }

    #[test]
    fn test_invalid_radius() {
        assert!(matches!(
            SphereTransform::new(0.0, 0.0, 0.0, 45.0, 0.0),
            Err(SkyChartError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_pole_projection_is_finite() {
        let transform = SphereTransform::new(90.0, 0.0, 0.0, 60.0, 300.0).unwrap();
        for ra in [0.0, 90.0, 217.5] {
            let pole = Coordinate::from_degrees(ra, 90.0).unwrap();
            let p = transform.project_coordinate(&pole);
            assert!(p.x.is_finite() && p.y.is_finite() && p.depth.is_finite());
        }
    }

    proptest! {
        #[test]
        fn prop_matrix_matches_sequential(
            ax in -360.0..360.0f64,
            ay in -360.0..360.0f64,
            az in -360.0..360.0f64,
            ra in 0.0..360.0f64,
            dec in -90.0..=90.0f64,
        ) {
            let state = RotationState::new(ax, ay, az, 45.0).unwrap();
            let v = Coordinate::from_degrees(ra, dec).unwrap().cartesian();
            let sequential = state.rotate(v).to_vector3();
            let matrix = state.matrix() * v.to_vector3();
            prop_assert!((sequential - matrix).norm() < 1e-12);
            // Rotations preserve length
            prop_assert!((sequential.norm() - 1.0).abs() < 1e-12);
        }
    }
}

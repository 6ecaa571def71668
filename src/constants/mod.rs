//! Constants module for sky chart geometry

use std::f64::consts::PI;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Degrees in a full turn of right ascension
pub const FULL_CIRCLE_DEG: f64 = 360.0;
/// Degrees of right ascension per hour
pub const DEG_PER_HOUR: f64 = 15.0;
/// Declination of the celestial poles
pub const POLE_DEC_DEG: f64 = 90.0;

// Camera
/// Offset added to the X and Z camera angles before they are used.
///
/// With it, a camera built from `(dec, 0, ra)` looks straight at `(ra, dec)`
/// with declination pointing up the image and RA increasing clockwise.
/// Without it every chart comes out rotated by 90°.
pub const CAMERA_AXIS_OFFSET_DEG: f64 = 270.0;

// Interpolation
/// Default angular step between interpolated boundary vertices (degrees)
pub const DEFAULT_INTERPOLATION_STEP_DEG: f64 = 1.0;

// IAU boundary files
/// Shortest well-formed boundary line (three letter abbreviation)
pub const BOUNDARY_LINE_MIN_LEN: usize = 29;
/// Longest well-formed boundary line (abbreviation plus part number)
pub const BOUNDARY_LINE_MAX_LEN: usize = 30;

// Rendering
/// Default chart size in pixels
pub const DEFAULT_IMAGE_SIZE_PX: u32 = 800;
/// Default free-mode field of view in degrees
pub const DEFAULT_FOV_DEG: f64 = 45.0;
/// Half width of the centroid marker cross in pixels
pub const CENTROID_CROSS_HALF_WIDTH_PX: f64 = 5.0;
/// Horizontal offset of star labels from the star (px)
pub const STAR_LABEL_OFFSET_X_PX: f64 = 3.0;
/// Vertical offset of the Bayer letter below the star (px)
pub const STAR_GREEK_OFFSET_Y_PX: f64 = 3.0;
/// Vertical offset of the proper name below the star (px)
pub const STAR_NAME_OFFSET_Y_PX: f64 = 15.0;
/// Sampling step along grid lines (degrees)
pub const GRID_SAMPLE_STEP_DEG: f64 = 1.0;

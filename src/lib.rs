//! Skychart: celestial sphere projection for star charts
//!
//! This crate converts catalog positions (right ascension / declination)
//! into unit-sphere Cartesian directions, rotates and projects them through
//! a virtual camera, densifies constellation boundaries so they follow the
//! curvature of the sphere, and summarizes boundary regions into "limits"
//! (extremal points, declination range, angular separation and centroid).
//!
//! The [`pipeline`] module sequences these primitives over plain records
//! coming from an external store and emits either 2D drawing primitives or
//! precomputed constellation records.

use thiserror::Error;

pub mod boundaries;
pub mod catalogs;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod limits;
pub mod pipeline;
pub mod projection;

// Re-export commonly used types
pub use boundaries::{BoundaryInterpolator, BoundaryPolygon};
pub use config::ChartConfig;
pub use coordinates::Coordinate;
pub use limits::{ExtremalPairMode, RegionLimits, RegionSummarizer};
pub use pipeline::ProjectionPipeline;
pub use projection::{ProjectedPoint, RotationState, SphereTransform};

/// Main error type for the skychart library
#[derive(Debug, Error)]
pub enum SkyChartError {
    #[error("Invalid coordinate: RA={ra_deg}°, Dec={dec_deg}°")]
    InvalidCoordinate { ra_deg: f64, dec_deg: f64 },

    #[error("Polygon needs at least 3 vertices, got {0}")]
    InsufficientVertices(usize),

    #[error("Degenerate field of view: {0}°")]
    DegenerateFieldOfView(f64),

    #[error("Invalid sphere radius: {0}px")]
    InvalidRadius(f64),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for skychart operations
pub type Result<T> = std::result::Result<T, SkyChartError>;

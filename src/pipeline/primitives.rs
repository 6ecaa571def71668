//! 2D drawing primitives handed to the rendering layer

use serde::{Deserialize, Serialize};

use crate::catalogs::Rgb;
use crate::projection::PixelPoint;

/// One drawable item, in pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Plus-shaped marker
    Cross {
        center: PixelPoint,
        half_width: f64,
        color: Rgb,
    },
    /// Open line through the points
    Polyline { points: Vec<PixelPoint>, color: Rgb },
    Segment {
        from: PixelPoint,
        to: PixelPoint,
        color: Rgb,
    },
    /// Closed outline
    Polygon { points: Vec<PixelPoint>, color: Rgb },
    /// Filled circle
    Disc {
        center: PixelPoint,
        radius: f64,
        color: Rgb,
    },
    Label {
        anchor: PixelPoint,
        text: String,
        color: Rgb,
    },
}

impl Primitive {
    /// Short name of the variant, matching its serialized `kind`
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Cross { .. } => "cross",
            Primitive::Polyline { .. } => "polyline",
            Primitive::Segment { .. } => "segment",
            Primitive::Polygon { .. } => "polygon",
            Primitive::Disc { .. } => "disc",
            Primitive::Label { .. } => "label",
        }
    }
}

/// Magnitude lower bounds and the disc radius used from each bound on
const MAGNITUDE_TO_RADIUS: [(f64, f64); 8] = [
    (-99.0, 10.0),
    (0.0, 8.0),
    (1.0, 6.0),
    (2.0, 5.0),
    (3.0, 4.0),
    (4.0, 2.0),
    (5.0, 1.0),
    (99.0, 1.0),
];

/// Disc radius in pixels for an apparent magnitude
///
/// Magnitudes outside the table (and NaN) get a zero radius.
pub fn star_radius_px(magnitude: f64) -> f64 {
    MAGNITUDE_TO_RADIUS
        .windows(2)
        .find(|pair| magnitude >= pair[0].0 && magnitude < pair[1].0)
        .map_or(0.0, |pair| pair[0].1)
}

/// A finished chart: canvas size, background and primitives in paint order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub width_px: u32,
    pub height_px: u32,
    pub background: Rgb,
    pub primitives: Vec<Primitive>,
}

impl Chart {
    /// Number of primitives of the given kind
    pub fn count(&self, kind: &str) -> usize {
        self.primitives.iter().filter(|p| p.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1.46, 10.0)]
    #[case(0.0, 8.0)]
    #[case(0.99, 8.0)]
    #[case(1.0, 6.0)]
    #[case(2.5, 5.0)]
    #[case(3.2, 4.0)]
    #[case(4.0, 2.0)]
    #[case(6.5, 1.0)]
    #[case(99.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn test_star_radius(#[case] magnitude: f64, #[case] expected: f64) {
        assert_eq!(star_radius_px(magnitude), expected);
    }

    #[test]
    fn test_serialized_kind_tag() {
        let disc = Primitive::Disc {
            center: PixelPoint { x: 1.0, y: 2.0 },
            radius: 4.0,
            color: Rgb::WHITE,
        };
        let value = serde_json::to_value(&disc).unwrap();
        assert_eq!(value["kind"], "disc");
        assert_eq!(value["color"], serde_json::json!([255, 255, 255]));
        assert_eq!(disc.kind(), "disc");
    }
}

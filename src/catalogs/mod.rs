//! Star and constellation records
//!
//! The external store hands over plain JSON mappings. Each mapping is
//! decoded on its own, so one malformed record is reported and skipped
//! instead of failing the whole snapshot.

pub mod color;
pub mod synthetic;

pub use color::Rgb;
pub use synthetic::{MagnitudeDistribution, SyntheticStarConfig};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::boundaries::BoundaryPolygon;
use crate::coordinates::Coordinate;
use crate::limits::RegionLimits;
use crate::{Result, SkyChartError};

/// A catalog star
///
/// Only the position is required; everything else is optional and
/// omitted from the serialized form when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub ra_deg: f64,
    pub dec_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bayer designation, e.g. "α"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greek: Option<String>,
    /// Apparent magnitude (lower is brighter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    /// B-V colour index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_v: Option<f64>,
    /// Explicit display colour, takes precedence over `b_v`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl StarRecord {
    /// A bare star with only a position
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            id: None,
            ra_deg,
            dec_deg,
            name: None,
            greek: None,
            magnitude: None,
            b_v: None,
            color: None,
        }
    }

    /// Validated position of the star
    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::from_degrees(self.ra_deg, self.dec_deg)
    }

    /// Catalog colour: the explicit colour if present, else derived from B-V
    pub fn catalog_color(&self) -> Option<Rgb> {
        self.color.or_else(|| self.b_v.map(color::b_minus_v_to_rgb))
    }
}

/// A boundary vertex as stored, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl VertexRecord {
    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::from_degrees(self.ra_deg, self.dec_deg)
    }
}

impl From<Coordinate> for VertexRecord {
    fn from(coord: Coordinate) -> Self {
        Self {
            ra_deg: coord.ra_deg(),
            dec_deg: coord.dec_deg(),
        }
    }
}

/// One stick-figure segment between two stars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub from: VertexRecord,
    pub to: VertexRecord,
}

/// A constellation with one boundary list per part
///
/// Most constellations have a single part; Serpens has two. The derived
/// `interpolated` and `limits` fields are filled by the precompute pass and
/// are index-aligned with `boundaries`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstellationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub boundaries: Vec<Vec<VertexRecord>>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpolated: Vec<BoundaryPolygon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limits: Vec<RegionLimits>,
}

impl ConstellationRecord {
    /// Abbreviation, falling back to the name, for log messages and lookup
    pub fn label(&self) -> &str {
        self.abbreviation
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// Case-insensitive match on abbreviation or name
    pub fn matches(&self, key: &str) -> bool {
        [self.abbreviation.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .any(|candidate| candidate.eq_ignore_ascii_case(key))
    }

    /// Raw boundary parts as validated polygons, in stored order
    pub fn boundary_polygons(&self) -> Result<Vec<BoundaryPolygon>> {
        self.boundaries
            .iter()
            .map(|part| {
                let vertices = part
                    .iter()
                    .map(VertexRecord::coordinate)
                    .collect::<Result<Vec<_>>>()?;
                BoundaryPolygon::new(vertices)
            })
            .collect()
    }

    /// Whether the precompute pass has already filled the derived fields
    pub fn is_precomputed(&self) -> bool {
        !self.boundaries.is_empty()
            && self.interpolated.len() == self.boundaries.len()
            && self.limits.len() == self.boundaries.len()
    }
}

/// Plain-mapping exchange form of the external store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub constellations: Vec<Value>,
    #[serde(default)]
    pub stars: Vec<Value>,
}

impl StoreSnapshot {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let snapshot: StoreSnapshot = serde_json::from_str(&text)?;
        debug!(
            "Loaded store {}: {} constellations, {} stars",
            path.as_ref().display(),
            snapshot.constellations.len(),
            snapshot.stars.len()
        );
        Ok(snapshot)
    }

    pub fn write_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Every decodable constellation, in store order
    pub fn constellations(&self) -> Vec<ConstellationRecord> {
        decode_all(&self.constellations, "constellation")
    }

    /// Every decodable star, in store order
    pub fn stars(&self) -> Vec<StarRecord> {
        decode_all(&self.stars, "star")
    }
}

/// Decode one mapping into a typed record
pub fn decode_record<T: DeserializeOwned>(value: &Value, kind: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| SkyChartError::MalformedRecord(format!("{kind}: {e}")))
}

/// Decode every mapping, skipping (and logging) the ones that do not fit
pub fn decode_all<T: DeserializeOwned>(values: &[Value], kind: &str) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match decode_record(value, kind) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {kind} record #{index}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_star_optional_fields() {
        let star: StarRecord = decode_record(&json!({"ra_deg": 10.0, "dec_deg": -5.0}), "star").unwrap();
        assert_eq!(star, StarRecord::new(10.0, -5.0));
        assert!(star.catalog_color().is_none());

        let text = serde_json::to_string(&star).unwrap();
        assert_eq!(text, r#"{"ra_deg":10.0,"dec_deg":-5.0}"#);
    }

    #[test]
    fn test_star_color_precedence() {
        let mut star = StarRecord::new(0.0, 0.0);
        star.b_v = Some(1.5);
        let from_index = star.catalog_color().unwrap();
        star.color = Some(Rgb(1, 2, 3));
        assert_eq!(star.catalog_color(), Some(Rgb(1, 2, 3)));
        assert_ne!(from_index, Rgb(1, 2, 3));
    }

    #[test]
    fn test_star_coordinate_validates() {
        assert!(StarRecord::new(0.0, 91.0).coordinate().is_err());
        let wrapped = StarRecord::new(-30.0, 0.0).coordinate().unwrap();
        assert_eq!(wrapped.ra_deg(), 330.0);
    }

    #[test]
    fn test_decode_all_skips_malformed() {
        let values = vec![
            json!({"ra_deg": 1.0, "dec_deg": 2.0}),
            json!({"ra_deg": "north", "dec_deg": 2.0}),
            json!({"dec_deg": 2.0}),
            json!({"ra_deg": 3.0, "dec_deg": 4.0, "name": "Vega"}),
        ];
        let stars: Vec<StarRecord> = decode_all(&values, "star");
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].ra_deg, 1.0);
        assert_eq!(stars[1].name.as_deref(), Some("Vega"));
    }

    #[test]
    fn test_constellation_lookup_and_parts() {
        let record: ConstellationRecord = decode_record(
            &json!({
                "abbreviation": "SER",
                "name": "Serpens",
                "boundaries": [
                    [{"ra_deg": 0, "dec_deg": 0}, {"ra_deg": 1, "dec_deg": 0}, {"ra_deg": 1, "dec_deg": 1}],
                    [{"ra_deg": 5, "dec_deg": 0}, {"ra_deg": 6, "dec_deg": 0}, {"ra_deg": 6, "dec_deg": 1}]
                ]
            }),
            "constellation",
        )
        .unwrap();

        assert!(record.matches("ser"));
        assert!(record.matches("SERPENS"));
        assert!(!record.matches("AND"));
        assert_eq!(record.label(), "SER");
        assert_eq!(record.boundary_polygons().unwrap().len(), 2);
        assert!(!record.is_precomputed());
    }

    #[test]
    fn test_short_part_is_an_error() {
        let record = ConstellationRecord {
            boundaries: vec![vec![
                VertexRecord { ra_deg: 0.0, dec_deg: 0.0 },
                VertexRecord { ra_deg: 1.0, dec_deg: 0.0 },
            ]],
            ..Default::default()
        };
        assert!(matches!(
            record.boundary_polygons(),
            Err(SkyChartError::InsufficientVertices(2))
        ));
        assert_eq!(record.label(), "<unnamed>");
    }

    #[test]
    fn test_snapshot_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"stars": [{{"ra_deg": 1.0, "dec_deg": 2.0}}, {{"bogus": true}}]}}"#
        )
        .unwrap();

        let snapshot = StoreSnapshot::from_json_file(file.path()).unwrap();
        assert!(snapshot.constellations.is_empty());
        assert_eq!(snapshot.stars.len(), 2);
        assert_eq!(snapshot.stars().len(), 1);
    }

    #[test]
    fn test_snapshot_missing_file() {
        assert!(matches!(
            StoreSnapshot::from_json_file("/nonexistent/store.json"),
            Err(SkyChartError::IoError(_))
        ));
    }
}

//! Chart configuration
//!
//! Every option is typed and defaulted, so a config file only needs the
//! fields it changes. Unknown fields are rejected to catch typos.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalogs::Rgb;
use crate::constants::{DEFAULT_FOV_DEG, DEFAULT_IMAGE_SIZE_PX, FULL_CIRCLE_DEG, POLE_DEC_DEG};
use crate::coordinates::validate_degrees;
use crate::{Result, SkyChartError};

/// Where the camera points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CenterMode {
    /// Aim at a constellation part's centroid; the field of view is the
    /// part's angular separation
    Constellation {
        abbreviation: String,
        #[serde(default)]
        part: usize,
    },
    /// Aim at an explicit position
    Free {
        #[serde(default)]
        ra_deg: f64,
        #[serde(default)]
        dec_deg: f64,
        #[serde(default = "default_fov_deg")]
        fov_deg: f64,
    },
}

fn default_fov_deg() -> f64 {
    DEFAULT_FOV_DEG
}

impl Default for CenterMode {
    fn default() -> Self {
        CenterMode::Free {
            ra_deg: 0.0,
            dec_deg: 0.0,
            fov_deg: DEFAULT_FOV_DEG,
        }
    }
}

/// How stars are coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarColoring {
    /// Use each star's catalog colour (explicit colour, else B-V)
    #[default]
    Catalog,
    /// Paint every star the same colour
    Fixed(Rgb),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartColors {
    pub sky: Rgb,
    pub grid: Rgb,
    pub boundaries: Rgb,
    pub lines: Rgb,
    pub centroid: Rgb,
    pub labels: Rgb,
    pub stars: StarColoring,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            sky: Rgb::BLACK,
            grid: Rgb(60, 60, 60),
            boundaries: Rgb(255, 0, 0),
            lines: Rgb::WHITE,
            centroid: Rgb(255, 0, 255),
            labels: Rgb::WHITE,
            stars: StarColoring::Catalog,
        }
    }
}

/// RA/Dec grid spacing in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSpacing {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl Default for GridSpacing {
    fn default() -> Self {
        Self {
            ra_deg: 15.0,
            dec_deg: 10.0,
        }
    }
}

/// Optional overlays; stars are always drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Visibility {
    pub centroid: bool,
    pub grid: bool,
    pub constellation_lines: bool,
    pub constellation_boundaries: bool,
    pub constellation_names: bool,
    pub star_names: bool,
    pub star_greek: bool,
}

impl Visibility {
    /// Everything on
    pub fn all() -> Self {
        Self {
            centroid: true,
            grid: true,
            constellation_lines: true,
            constellation_boundaries: true,
            constellation_names: true,
            star_names: true,
            star_greek: true,
        }
    }
}

/// Complete chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub center: CenterMode,
    pub colors: ChartColors,
    pub grid: GridSpacing,
    pub show: Visibility,
    /// Worker threads for the parallel passes; `None` uses the global pool
    pub workers: Option<usize>,
    /// Skip a constellation part entirely when its centroid faces away
    pub cull_by_centroid: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_IMAGE_SIZE_PX,
            height_px: DEFAULT_IMAGE_SIZE_PX,
            center: CenterMode::default(),
            colors: ChartColors::default(),
            grid: GridSpacing::default(),
            show: Visibility::default(),
            workers: None,
            cull_by_centroid: true,
        }
    }
}

impl ChartConfig {
    /// Load and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: ChartConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(config_error(format!(
                "image size must be non-zero, got {}x{}",
                self.width_px, self.height_px
            )));
        }

        let GridSpacing { ra_deg, dec_deg } = self.grid;
        if !(ra_deg > 0.0 && ra_deg <= FULL_CIRCLE_DEG) {
            return Err(config_error(format!("grid RA spacing out of range: {ra_deg}")));
        }
        if !(dec_deg > 0.0 && dec_deg <= 2.0 * POLE_DEC_DEG) {
            return Err(config_error(format!("grid Dec spacing out of range: {dec_deg}")));
        }

        if self.workers == Some(0) {
            return Err(config_error("workers must be at least 1".to_string()));
        }

        match &self.center {
            CenterMode::Constellation { abbreviation, .. } if abbreviation.trim().is_empty() => {
                Err(config_error("constellation abbreviation is empty".to_string()))
            }
            CenterMode::Constellation { .. } => Ok(()),
            CenterMode::Free {
                ra_deg,
                dec_deg,
                fov_deg,
            } => {
                validate_degrees(*ra_deg, *dec_deg)?;
                if !(fov_deg.is_finite() && *fov_deg > 0.0 && *fov_deg < 2.0 * POLE_DEC_DEG) {
                    return Err(SkyChartError::DegenerateFieldOfView(*fov_deg));
                }
                Ok(())
            }
        }
    }

    /// Sphere radius in pixels: half the smaller image side
    pub fn radius_px(&self) -> f64 {
        f64::from(self.width_px.min(self.height_px)) / 2.0
    }

    /// Image center in pixels
    pub fn center_px(&self) -> (f64, f64) {
        (
            f64::from(self.width_px) / 2.0,
            f64::from(self.height_px) / 2.0,
        )
    }
}

fn config_error(message: String) -> SkyChartError {
    SkyChartError::ConfigError(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config: ChartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.radius_px(), 400.0);
        assert_eq!(config.center_px(), (400.0, 400.0));
        assert!(config.cull_by_centroid);
        config.validate().unwrap();
    }

    #[test]
    fn test_center_modes() {
        let config: ChartConfig = serde_json::from_str(
            r#"{"center": {"mode": "constellation", "abbreviation": "ORI"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.center,
            CenterMode::Constellation {
                abbreviation: "ORI".to_string(),
                part: 0
            }
        );

        let config: ChartConfig =
            serde_json::from_str(r#"{"center": {"mode": "free", "ra_deg": 83.8, "dec_deg": -5.4}}"#)
                .unwrap();
        assert_eq!(
            config.center,
            CenterMode::Free {
                ra_deg: 83.8,
                dec_deg: -5.4,
                fov_deg: 45.0
            }
        );
    }

    #[test]
    fn test_star_coloring() {
        let colors: ChartColors = serde_json::from_str(r#"{"stars": {"fixed": [9, 8, 7]}}"#).unwrap();
        assert_eq!(colors.stars, StarColoring::Fixed(Rgb(9, 8, 7)));
        assert_eq!(colors.grid, Rgb(60, 60, 60));

        let colors: ChartColors = serde_json::from_str(r#"{"stars": "catalog"}"#).unwrap();
        assert_eq!(colors.stars, StarColoring::Catalog);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_json::from_str::<ChartConfig>(r#"{"widht_px": 10}"#).is_err());
        assert!(serde_json::from_str::<ChartConfig>(r#"{"show": {"planets": true}}"#).is_err());
    }

    #[rstest]
    #[case(r#"{"width_px": 0}"#)]
    #[case(r#"{"grid": {"ra_deg": 0}}"#)]
    #[case(r#"{"grid": {"dec_deg": 200}}"#)]
    #[case(r#"{"workers": 0}"#)]
    #[case(r#"{"center": {"mode": "free", "dec_deg": 95}}"#)]
    #[case(r#"{"center": {"mode": "free", "fov_deg": 180}}"#)]
    #[case(r#"{"center": {"mode": "constellation", "abbreviation": " "}}"#)]
    fn test_validate_rejects(#[case] json: &str) {
        let config: ChartConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err(), "{json} should be invalid");
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"width_px": 1024, "height_px": 600, "show": {{"grid": true}}, "workers": 2}}"#
        )
        .unwrap();

        let config = ChartConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.width_px, 1024);
        assert_eq!(config.radius_px(), 300.0);
        assert!(config.show.grid);
        assert!(!config.show.centroid);
        assert_eq!(config.workers, Some(2));
    }

    #[test]
    fn test_from_json_file_validates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"height_px": 0}}"#).unwrap();
        assert!(matches!(
            ChartConfig::from_json_file(file.path()),
            Err(SkyChartError::ConfigError(_))
        ));
    }
}

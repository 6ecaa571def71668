//! Projection pipeline
//!
//! Sequences the geometry primitives over records from the external store:
//!
//! - the precompute pass densifies every constellation boundary part and
//!   summarizes it into [`RegionLimits`](crate::RegionLimits);
//! - the render pass aims a camera, projects grid, constellations and stars,
//!   and emits [`Primitive`]s in paint order.
//!
//! Malformed records are logged and skipped, never fatal. Output order always
//! follows input order, also when records are processed in parallel.

pub mod grid;
pub mod primitives;

pub use primitives::{star_radius_px, Chart, Primitive};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::Value;

use crate::boundaries::BoundaryInterpolator;
use crate::catalogs::{decode_all, ConstellationRecord, Rgb, StarRecord, StoreSnapshot};
use crate::config::{CenterMode, ChartConfig, StarColoring};
use crate::constants::{
    CENTROID_CROSS_HALF_WIDTH_PX, STAR_GREEK_OFFSET_Y_PX, STAR_LABEL_OFFSET_X_PX,
    STAR_NAME_OFFSET_Y_PX,
};
use crate::coordinates::Coordinate;
use crate::limits::RegionSummarizer;
use crate::projection::{PixelPoint, ProjectedPoint, SphereTransform};
use crate::{Result, SkyChartError};

/// Runs precompute and render passes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionPipeline {
    interpolator: BoundaryInterpolator,
    summarizer: RegionSummarizer,
    workers: Option<usize>,
}

impl ProjectionPipeline {
    pub fn new(interpolator: BoundaryInterpolator, summarizer: RegionSummarizer) -> Self {
        Self {
            interpolator,
            summarizer,
            workers: None,
        }
    }

    /// Use a dedicated pool of `workers` threads instead of the global one
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    /// Fill `interpolated` and `limits` for every boundary part of `record`
    ///
    /// Limits are computed from the stored vertices, not the densified ones.
    pub fn precompute_record(&self, mut record: ConstellationRecord) -> Result<ConstellationRecord> {
        let polygons = record.boundary_polygons()?;
        if polygons.is_empty() {
            return Err(SkyChartError::MalformedRecord(format!(
                "{} has no boundary parts",
                record.label()
            )));
        }

        let mut interpolated = Vec::with_capacity(polygons.len());
        let mut limits = Vec::with_capacity(polygons.len());
        for polygon in &polygons {
            limits.push(self.summarizer.summarize(polygon)?);
            interpolated.push(self.interpolator.interpolate(polygon)?);
        }

        debug!(
            "Precomputed {}: {} parts, {} -> {} vertices",
            record.label(),
            polygons.len(),
            polygons.iter().map(|p| p.len()).sum::<usize>(),
            interpolated.iter().map(|p| p.len()).sum::<usize>()
        );

        record.interpolated = interpolated;
        record.limits = limits;
        Ok(record)
    }

    /// Precompute pass over raw store mappings
    ///
    /// Records that fail to decode or to precompute are skipped.
    pub fn precompute(&self, values: &[Value]) -> Result<Vec<ConstellationRecord>> {
        let records: Vec<ConstellationRecord> = decode_all(values, "constellation");
        info!("Precomputing {} constellation records", records.len());

        let precomputed = self.precompute_all(records, false)?;

        info!("Precomputed {} constellation records", precomputed.len());
        Ok(precomputed)
    }

    /// Precompute in parallel, in input order; with `keep_existing` records
    /// that already carry derived fields pass through untouched
    fn precompute_all(
        &self,
        records: Vec<ConstellationRecord>,
        keep_existing: bool,
    ) -> Result<Vec<ConstellationRecord>> {
        self.in_pool(|| {
            records
                .into_par_iter()
                .filter_map(|record| {
                    if keep_existing && record.is_precomputed() {
                        return Some(record);
                    }
                    let label = record.label().to_string();
                    match self.precompute_record(record) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!("Skipping constellation {label}: {e}");
                            None
                        }
                    }
                })
                .collect()
        })
    }

    /// Build the camera described by `config`
    ///
    /// In constellation mode the camera is aimed at the part's centroid and
    /// the field of view is the part's angular separation.
    pub fn camera(
        &self,
        config: &ChartConfig,
        constellations: &[ConstellationRecord],
    ) -> Result<SphereTransform> {
        let radius = config.radius_px();
        match &config.center {
            CenterMode::Free {
                ra_deg,
                dec_deg,
                fov_deg,
            } => {
                let center = Coordinate::from_degrees(*ra_deg, *dec_deg)?;
                SphereTransform::aimed_at(&center, *fov_deg, radius)
            }
            CenterMode::Constellation { abbreviation, part } => {
                let limits = constellations
                    .iter()
                    .find(|c| c.matches(abbreviation))
                    .and_then(|c| c.limits.get(*part))
                    .ok_or_else(|| {
                        SkyChartError::ObjectNotFound(format!("{abbreviation} part {part}"))
                    })?;
                SphereTransform::aimed_at(&limits.centroid, limits.angular_separation.deg, radius)
            }
        }
    }

    /// Render pass over a store snapshot
    pub fn render(&self, config: &ChartConfig, snapshot: &StoreSnapshot) -> Result<Chart> {
        let constellations = snapshot.constellations();
        let stars = snapshot.stars();
        self.render_records(config, constellations, &stars)
    }

    /// Render pass over decoded records
    ///
    /// Constellations that were not precomputed yet are precomputed here.
    /// `config.workers`, when set, overrides the pipeline's own pool size.
    pub fn render_records(
        &self,
        config: &ChartConfig,
        constellations: Vec<ConstellationRecord>,
        stars: &[StarRecord],
    ) -> Result<Chart> {
        config.validate()?;
        info!(
            "Rendering {}x{} chart: {} constellations, {} stars",
            config.width_px,
            config.height_px,
            constellations.len(),
            stars.len()
        );

        let pipeline = self.with_workers(config.workers.or(self.workers));
        let constellations = pipeline.precompute_all(constellations, true)?;

        let transform = self.camera(config, &constellations)?;
        let painter = Painter::new(config, &transform);
        let mut primitives = Vec::new();

        if config.show.centroid {
            primitives.push(painter.centroid_cross(&constellations));
        }
        if config.show.grid {
            primitives.extend(painter.grid()?);
        }
        if config.show.constellation_boundaries || config.show.constellation_lines {
            for record in &constellations {
                primitives.extend(painter.constellation(record));
            }
        }
        primitives.extend(pipeline.in_pool(|| {
            stars
                .par_iter()
                .flat_map_iter(|star| painter.star(star))
                .collect::<Vec<_>>()
        })?);
        if config.show.constellation_names {
            for record in &constellations {
                primitives.extend(painter.constellation_names(record));
            }
        }

        info!("Rendered {} primitives", primitives.len());
        Ok(Chart {
            width_px: config.width_px,
            height_px: config.height_px,
            background: config.colors.sky,
            primitives,
        })
    }

    fn in_pool<T, F>(&self, op: F) -> Result<T>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.workers {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        SkyChartError::ConfigError(format!("failed to build worker pool: {e}"))
                    })?;
                Ok(pool.install(op))
            }
            None => Ok(op()),
        }
    }
}

/// Turns projected geometry into primitives for one chart
struct Painter<'a> {
    config: &'a ChartConfig,
    transform: &'a SphereTransform,
    center_x: f64,
    center_y: f64,
}

impl<'a> Painter<'a> {
    fn new(config: &'a ChartConfig, transform: &'a SphereTransform) -> Self {
        let (center_x, center_y) = config.center_px();
        Self {
            config,
            transform,
            center_x,
            center_y,
        }
    }

    fn pixel(&self, point: &ProjectedPoint) -> PixelPoint {
        point.to_pixel(self.center_x, self.center_y)
    }

    fn project(&self, coord: &Coordinate) -> ProjectedPoint {
        self.transform.project_coordinate(coord)
    }

    /// Marker on the camera target; in constellation mode that is the centroid
    fn centroid_cross(&self, constellations: &[ConstellationRecord]) -> Primitive {
        let target = match &self.config.center {
            CenterMode::Constellation { abbreviation, part } => constellations
                .iter()
                .find(|c| c.matches(abbreviation))
                .and_then(|c| c.limits.get(*part))
                .map(|limits| self.project(&limits.centroid)),
            CenterMode::Free { .. } => None,
        };
        let center = target.map_or(
            PixelPoint {
                x: self.center_x,
                y: self.center_y,
            },
            |p| self.pixel(&p),
        );

        Primitive::Cross {
            center,
            half_width: CENTROID_CROSS_HALF_WIDTH_PX,
            color: self.config.colors.centroid,
        }
    }

    fn grid(&self) -> Result<Vec<Primitive>> {
        let runs = grid::grid_lines(self.transform, &self.config.grid)?;
        debug!("Grid: {} visible runs", runs.len());
        Ok(runs
            .iter()
            .map(|run| Primitive::Polyline {
                points: run.iter().map(|p| self.pixel(p)).collect(),
                color: self.config.colors.grid,
            })
            .collect())
    }

    /// Boundary polygons per part, then stick-figure lines
    fn constellation(&self, record: &ConstellationRecord) -> Vec<Primitive> {
        let show = &self.config.show;
        let mut primitives = Vec::new();
        let mut any_part_visible = false;

        for (polygon, limits) in record.interpolated.iter().zip(&record.limits) {
            if self.config.cull_by_centroid && !self.project(&limits.centroid).is_front_facing() {
                continue;
            }
            any_part_visible = true;

            if show.constellation_boundaries {
                let projected: Vec<ProjectedPoint> =
                    polygon.vertices().iter().map(|v| self.project(v)).collect();
                if projected.iter().any(ProjectedPoint::is_front_facing) {
                    primitives.push(Primitive::Polygon {
                        points: projected.iter().map(|p| self.pixel(p)).collect(),
                        color: self.config.colors.boundaries,
                    });
                }
            }
        }

        if show.constellation_lines && (any_part_visible || !self.config.cull_by_centroid) {
            for line in &record.lines {
                let (from, to) = match (line.from.coordinate(), line.to.coordinate()) {
                    (Ok(from), Ok(to)) => (self.project(&from), self.project(&to)),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!("Skipping line in {}: {e}", record.label());
                        continue;
                    }
                };
                if from.is_front_facing() || to.is_front_facing() {
                    primitives.push(Primitive::Segment {
                        from: self.pixel(&from),
                        to: self.pixel(&to),
                        color: self.config.colors.lines,
                    });
                }
            }
        }

        primitives
    }

    /// Disc plus optional labels for a front-facing star
    fn star(&self, star: &StarRecord) -> Vec<Primitive> {
        let coordinate = match star.coordinate() {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!("Skipping star {:?}: {e}", star.id);
                return Vec::new();
            }
        };
        let projected = self.project(&coordinate);
        if !projected.is_front_facing() {
            return Vec::new();
        }

        let center = self.pixel(&projected);
        let color = match self.config.colors.stars {
            StarColoring::Fixed(color) => color,
            StarColoring::Catalog => star.catalog_color().unwrap_or(Rgb::WHITE),
        };
        let radius = star.magnitude.map_or(1.0, star_radius_px);

        let mut primitives = vec![Primitive::Disc {
            center,
            radius,
            color,
        }];

        let labels = [
            (self.config.show.star_greek, &star.greek, STAR_GREEK_OFFSET_Y_PX),
            (self.config.show.star_names, &star.name, STAR_NAME_OFFSET_Y_PX),
        ];
        for (shown, text, offset_y) in labels {
            if let (true, Some(text)) = (shown, text) {
                primitives.push(Primitive::Label {
                    anchor: PixelPoint {
                        x: center.x + STAR_LABEL_OFFSET_X_PX,
                        y: center.y + offset_y,
                    },
                    text: text.clone(),
                    color: self.config.colors.labels,
                });
            }
        }

        primitives
    }

    /// Name label at every front-facing part centroid
    fn constellation_names(&self, record: &ConstellationRecord) -> Vec<Primitive> {
        let Some(name) = record.name.as_ref().or(record.abbreviation.as_ref()) else {
            return Vec::new();
        };

        record
            .limits
            .iter()
            .map(|limits| self.project(&limits.centroid))
            .filter(ProjectedPoint::is_front_facing)
            .map(|p| Primitive::Label {
                anchor: self.pixel(&p),
                text: name.clone(),
                color: self.config.colors.labels,
            })
            .collect()
    }
}

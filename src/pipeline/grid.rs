//! RA/Dec coordinate grid
//!
//! Meridians run pole to pole at a fixed RA and parallels run the full
//! circle at a fixed Dec, both sampled every degree. Each line is cut into
//! runs of segments that have at least one front-facing endpoint.

use crate::config::GridSpacing;
use crate::constants::{FULL_CIRCLE_DEG, GRID_SAMPLE_STEP_DEG, POLE_DEC_DEG};
use crate::projection::{CachedProjector, ProjectedPoint, SphereTransform};
use crate::{Result, SkyChartError};

/// Visible pieces of every meridian, then of every parallel
pub fn grid_lines(
    transform: &SphereTransform,
    spacing: &GridSpacing,
) -> Result<Vec<Vec<ProjectedPoint>>> {
    if !(spacing.ra_deg > 0.0 && spacing.dec_deg > 0.0) {
        return Err(SkyChartError::ConfigError(format!(
            "grid spacing must be positive, got {}/{}",
            spacing.ra_deg, spacing.dec_deg
        )));
    }

    let mut projector = CachedProjector::new(transform);
    let mut runs = Vec::new();

    for ra in steps(0.0, FULL_CIRCLE_DEG, spacing.ra_deg, false) {
        let line = steps(-POLE_DEC_DEG, POLE_DEC_DEG, GRID_SAMPLE_STEP_DEG, true)
            .map(|dec| projector.project_degrees(ra, dec))
            .collect::<Result<Vec<_>>>()?;
        runs.extend(visible_runs(&line));
    }

    // The poles themselves are single points, not circles
    for dec in steps(-POLE_DEC_DEG, POLE_DEC_DEG, spacing.dec_deg, true)
        .filter(|dec| dec.abs() < POLE_DEC_DEG)
    {
        let line = steps(0.0, FULL_CIRCLE_DEG, GRID_SAMPLE_STEP_DEG, true)
            .map(|ra| projector.project_degrees(ra, dec))
            .collect::<Result<Vec<_>>>()?;
        runs.extend(visible_runs(&line));
    }

    Ok(runs)
}

/// `start + k·step` up to `end`
fn steps(start: f64, end: f64, step: f64, inclusive: bool) -> impl Iterator<Item = f64> {
    let span = (end - start) / step;
    let count = if inclusive {
        span.floor() as usize + 1
    } else {
        span.ceil() as usize
    };
    (0..count).map(move |k| start + k as f64 * step)
}

/// Split a sampled line into runs of segments with a front-facing endpoint
pub fn visible_runs(points: &[ProjectedPoint]) -> Vec<Vec<ProjectedPoint>> {
    let mut runs = Vec::new();
    let mut current: Vec<ProjectedPoint> = Vec::new();

    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if from.is_front_facing() || to.is_front_facing() {
            if current.is_empty() {
                current.push(from);
            }
            current.push(to);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

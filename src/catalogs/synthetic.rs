//! Synthetic star generator
//!
//! Produces seeded, reproducible star records spread uniformly over the
//! sphere, with more faint stars than bright ones. Used for demo charts
//! and benchmarks when no real catalog is at hand.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::PI;

use super::StarRecord;

/// Magnitude distribution parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeDistribution {
    /// Brightest magnitude generated
    pub min_magnitude: f64,
    /// Faintest magnitude generated
    pub max_magnitude: f64,
    /// Growth in star count per magnitude step (Pogson ratio, 100^0.4)
    pub log_base: f64,
}

impl Default for MagnitudeDistribution {
    fn default() -> Self {
        Self {
            min_magnitude: -1.0,
            max_magnitude: 6.0,
            log_base: 2.512,
        }
    }
}

/// Configuration for a synthetic star field
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticStarConfig {
    pub count: usize,
    pub seed: u64,
    pub magnitude_dist: MagnitudeDistribution,
}

impl Default for SyntheticStarConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 42,
            magnitude_dist: MagnitudeDistribution::default(),
        }
    }
}

impl SyntheticStarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Self {
        self.magnitude_dist.min_magnitude = min;
        self.magnitude_dist.max_magnitude = max;
        self
    }

    /// Generate the star records; ids run from 1
    pub fn generate(&self) -> Vec<StarRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let z_dist = Uniform::from(-1.0..1.0);
        let unit = Uniform::from(0.0..1.0);
        let b_v_dist = Uniform::from(-0.3..1.6);

        (1..=self.count as u64)
            .map(|id| {
                // Uniform on the sphere: z uniform in [-1, 1], azimuth uniform
                let z: f64 = z_dist.sample(&mut rng);
                let phi: f64 = unit.sample(&mut rng) * 2.0 * PI;

                let mut star = StarRecord::new(phi.to_degrees(), z.asin().to_degrees());
                star.id = Some(id);
                star.magnitude = Some(self.sample_magnitude(unit.sample(&mut rng)));
                star.b_v = Some(b_v_dist.sample(&mut rng));
                star
            })
            .collect()
    }

    /// Inverse-transform sample for N(m) ~ log_base^m
    fn sample_magnitude(&self, uniform_sample: f64) -> f64 {
        let MagnitudeDistribution {
            min_magnitude,
            max_magnitude,
            log_base,
        } = self.magnitude_dist;
        let span = max_magnitude - min_magnitude;

        let exp_range = log_base.powf(span) - 1.0;
        let t = uniform_sample * exp_range + 1.0;
        min_magnitude + t.log(log_base).clamp(0.0, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_count_and_ids() {
        let stars = SyntheticStarConfig::new().with_count(250).generate();
        assert_eq!(stars.len(), 250);
        assert_eq!(stars[0].id, Some(1));
        assert_eq!(stars[249].id, Some(250));
    }

    #[test]
    fn test_positions_and_magnitudes_in_range() {
        let config = SyntheticStarConfig::new()
            .with_count(1000)
            .with_magnitude_range(0.0, 5.0);
        for star in config.generate() {
            assert!((0.0..360.0).contains(&star.ra_deg));
            assert!((-90.0..=90.0).contains(&star.dec_deg));
            let magnitude = star.magnitude.unwrap();
            assert!((0.0..=5.0).contains(&magnitude));
            assert!(star.coordinate().is_ok());
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = SyntheticStarConfig::new().with_seed(7).generate();
        let b = SyntheticStarConfig::new().with_seed(7).generate();
        let c = SyntheticStarConfig::new().with_seed(8).generate();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_faint_stars_outnumber_bright_ones() {
        let stars = SyntheticStarConfig::new()
            .with_count(5000)
            .with_magnitude_range(0.0, 6.0)
            .generate();
        let bright = stars.iter().filter(|s| s.magnitude.unwrap() < 3.0).count();
        let faint = stars.len() - bright;
        assert!(faint > 5 * bright, "bright={bright} faint={faint}");
    }

    #[test]
    fn test_hemispheres_roughly_balanced() {
        let stars = SyntheticStarConfig::new().with_count(4000).generate();
        let north = stars.iter().filter(|s| s.dec_deg > 0.0).count();
        assert!((1700..2300).contains(&north), "north={north}");
    }
}

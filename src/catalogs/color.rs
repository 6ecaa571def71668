//! Star colour from the B-V colour index

use serde::{Deserialize, Serialize};

/// An 8-bit RGB colour, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// B-V index to effective temperature table (index, kelvin)
const B_V_TO_KELVIN: [(f64, f64); 6] = [
    (-0.3, 33000.0),
    (-0.15, 14800.0),
    (0.0, 9600.0),
    (0.5, 6500.0),
    (1.0, 4800.0),
    (1.52, 3600.0),
];

/// Effective temperature in kelvin for a B-V colour index
///
/// Piecewise linear over the table above, clamped to its end values.
pub fn b_minus_v_to_kelvin(b_v: f64) -> f64 {
    let (first_bv, first_k) = B_V_TO_KELVIN[0];
    if b_v <= first_bv {
        return first_k;
    }

    for pair in B_V_TO_KELVIN.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if b_v <= x1 {
            return y0 + (b_v - x0) * (y1 - y0) / (x1 - x0);
        }
    }

    B_V_TO_KELVIN[B_V_TO_KELVIN.len() - 1].1
}

/// Black-body colour approximation (Tanner Helland fit)
pub fn kelvin_to_rgb(kelvin: f64) -> Rgb {
    let temp = kelvin / 100.0;

    let (r, g, b) = if temp <= 66.0 {
        let g = 99.470_802_586_1 * temp.ln() - 161.119_568_166_1;
        let b = if temp <= 19.0 {
            0.0
        } else {
            138.517_731_223_1 * (temp - 10.0).ln() - 305.044_792_730_7
        };
        (255.0, g, b)
    } else {
        (
            329.698_727_446 * (temp - 60.0).powf(-0.133_204_759_2),
            288.122_169_528_3 * (temp - 60.0).powf(-0.075_514_849_2),
            255.0,
        )
    };

    Rgb(channel(r), channel(g), channel(b))
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

/// Convenience for catalog entries: B-V straight to a display colour
pub fn b_minus_v_to_rgb(b_v: f64) -> Rgb {
    kelvin_to_rgb(b_minus_v_to_kelvin(b_v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(-1.0, 33000.0)]
    #[case(-0.3, 33000.0)]
    #[case(0.0, 9600.0)]
    #[case(0.25, 8050.0)]
    #[case(1.52, 3600.0)]
    #[case(3.0, 3600.0)]
    fn test_b_minus_v_to_kelvin(#[case] b_v: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(b_minus_v_to_kelvin(b_v), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_hot_stars_are_blue_cool_stars_are_red() {
        let hot = kelvin_to_rgb(30000.0);
        assert_eq!(hot.2, 255);
        assert!(hot.0 < 200);

        let cool = kelvin_to_rgb(3600.0);
        assert_eq!(cool.0, 255);
        assert!(cool.2 < 150);

        // Very cool: no blue at all
        assert_eq!(kelvin_to_rgb(1500.0).2, 0);
    }

    #[test]
    fn test_sun_like_star_is_near_white() {
        let sun = b_minus_v_to_rgb(0.65);
        assert_eq!(sun.0, 255);
        assert!(sun.1 > 200);
        assert!(sun.2 > 180);
    }

    #[test]
    fn test_serialized_as_array() {
        assert_eq!(serde_json::to_string(&Rgb(1, 2, 3)).unwrap(), "[1,2,3]");
    }
}

//! IAU constellation boundary files
//!
//! Boundary files list one vertex per line in fixed columns:
//!
//! ```text
//! 00 52 25.7197|+48.2271614|AND
//! ```
//!
//! Columns `[0,2)`, `[3,5)` and `[6,13)` hold the RA hours, minutes and
//! seconds; columns `[14,25)` hold the declination in decimal degrees. After
//! trimming, well-formed lines are 29 or 30 characters long (the longer form
//! carries a part number, e.g. `SER1`). Anything else is header or footer
//! noise and is skipped.

use log::{debug, warn};

use crate::constants::{BOUNDARY_LINE_MAX_LEN, BOUNDARY_LINE_MIN_LEN, DEG_PER_HOUR};
use crate::coordinates::Coordinate;
use crate::Result;

/// Parse a single boundary line
///
/// Returns `Ok(None)` for lines that are not vertex lines (wrong length or
/// non-numeric fields) and an error only for a well-formed line carrying an
/// impossible declination.
pub fn parse_boundary_line(line: &str) -> Result<Option<Coordinate>> {
    let line = line.trim();
    if !(BOUNDARY_LINE_MIN_LEN..=BOUNDARY_LINE_MAX_LEN).contains(&line.len()) {
        return Ok(None);
    }

    let field = |start: usize, end: usize| -> Option<f64> {
        line.get(start..end).and_then(|s| s.trim().parse::<f64>().ok())
    };

    let (Some(hours), Some(minutes), Some(seconds), Some(dec_deg)) =
        (field(0, 2), field(3, 5), field(6, 13), field(14, 25))
    else {
        warn!("Skipping boundary line with unreadable fields: {line:?}");
        return Ok(None);
    };

    let ra_deg = hours * DEG_PER_HOUR
        + minutes * DEG_PER_HOUR / 60.0
        + seconds * DEG_PER_HOUR / 3600.0;

    Coordinate::from_degrees(ra_deg, dec_deg).map(Some)
}

/// Parse every vertex line of a boundary file, in file order
pub fn parse_boundary_text(text: &str) -> Result<Vec<Coordinate>> {
    let mut vertices = Vec::new();
    let mut skipped = 0;

    for line in text.lines() {
        match parse_boundary_line(line)? {
            Some(vertex) => vertices.push(vertex),
            None => skipped += 1,
        }
    }

    debug!(
        "Parsed {} boundary vertices, skipped {} lines",
        vertices.len(),
        skipped
    );
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SkyChartError;
    use approx::assert_abs_diff_eq;

    const ANDROMEDA: &str = "\
Boundaries of AND
 00 52 25.7197|+48.2271614|AND
 00 52 30.5427|+53.1845551|AND
01 46 35.7314|+53.3179779|AND
01 46 58.6271|+50.6484451|AND

end
";

    #[test]
    fn test_parse_line() {
        let v = parse_boundary_line("22 56 22.9091|+35.1679688|AND")
            .unwrap()
            .unwrap();
        let expected_ra = 22.0 * 15.0 + 56.0 * 0.25 + 22.9091 * 15.0 / 3600.0;
        assert_abs_diff_eq!(v.ra_deg(), expected_ra, epsilon = 1e-12);
        assert_abs_diff_eq!(v.dec_deg(), 35.1679688, epsilon = 1e-12);
    }

    #[test]
    fn test_part_suffix_and_negative_dec() {
        let v = parse_boundary_line("15 08 11.4560|-03.9999771|SER1")
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(v.dec_deg(), -3.9999771, epsilon = 1e-12);
    }

    #[test]
    fn test_noise_lines_skipped() {
        assert!(parse_boundary_line("").unwrap().is_none());
        assert!(parse_boundary_line("Boundaries of AND").unwrap().is_none());
        assert!(parse_boundary_line("xx 52 25.7197|+48.2271614|AND")
            .unwrap()
            .is_none());
        assert!(parse_boundary_line("00 52 25.7197|+48.2271614|ANDROMEDA")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_impossible_declination_is_an_error() {
        assert!(matches!(
            parse_boundary_line("00 52 25.7197|+98.2271614|AND"),
            Err(SkyChartError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_parse_text_keeps_order() {
        let vertices = parse_boundary_text(ANDROMEDA).unwrap();
        assert_eq!(vertices.len(), 4);
        assert_abs_diff_eq!(vertices[1].dec_deg(), 53.1845551, epsilon = 1e-12);
        assert!(vertices[2].ra_deg() > vertices[0].ra_deg());
    }
}

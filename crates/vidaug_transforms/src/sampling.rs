//! Shared pieces of the area/aspect rejection samplers.

use rand::Rng;

use vidaug_core::{uniform, AugmentError, Result};

/// Trial budget of the rejection samplers before falling back.
pub const MAX_TRIALS: usize = 10;

/// Round half to even, matching the rounding used for window sizes.
pub(crate) fn round_half_even(value: f64) -> usize {
    value.round_ties_even().max(0.0) as usize
}

/// One candidate draw: `(area, aspect)` for a frame of `frame_area` pixels.
///
/// The area fraction is drawn first, then the log of the aspect ratio.
pub(crate) fn draw_area_aspect<R: Rng + ?Sized>(
    rng: &mut R,
    frame_area: f64,
    scale: (f64, f64),
    log_ratio: (f64, f64),
) -> (f64, f64) {
    let area = frame_area * uniform(rng, scale.0, scale.1);
    let aspect = uniform(rng, log_ratio.0, log_ratio.1).exp();
    (area, aspect)
}

pub(crate) fn check_probability(what: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(AugmentError::invalid_argument(format!(
            "{what} probability must be in [0.0, 1.0] range (got {p})"
        )))
    }
}

/// Validate an area fraction range, which must lie in `(0, 1]`.
pub(crate) fn check_scale(scale: (f64, f64)) -> Result<()> {
    let (low, high) = scale;
    if !(low > 0.0 && low <= high && high <= 1.0) {
        return Err(AugmentError::invalid_argument(format!(
            "scale must satisfy 0 < low <= high <= 1, got ({low}, {high})"
        )));
    }
    Ok(())
}

/// Validate an aspect ratio range and return it in log space.
pub(crate) fn log_ratio(ratio: (f64, f64)) -> Result<(f64, f64)> {
    let (low, high) = ratio;
    if !(low > 0.0 && low <= high && high.is_finite()) {
        return Err(AugmentError::invalid_argument(format!(
            "ratio must satisfy 0 < low <= high, got ({low}, {high})"
        )));
    }
    Ok((low.ln(), high.ln()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidaug_core::Seed;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0);
        assert_eq!(round_half_even(1.5), 2);
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(2.6), 3);
        assert_eq!(round_half_even(0.08), 0);
    }

    #[test]
    fn test_draw_area_aspect_within_bounds() {
        let mut rng = Seed::new(0).to_rng();
        let log = log_ratio((0.5, 2.0)).unwrap();
        for _ in 0..200 {
            let (area, aspect) = draw_area_aspect(&mut rng, 100.0, (0.1, 0.9), log);
            assert!((10.0..90.0).contains(&area));
            assert!(aspect >= 0.5 - 1e-12 && aspect <= 2.0 + 1e-12);
        }
    }

    #[test]
    fn test_aspect_is_log_uniform() {
        let mut rng = Seed::new(9).to_rng();
        let log = log_ratio((0.25, 4.0)).unwrap();
        let draws = 4000;
        let above_one = (0..draws)
            .filter(|_| draw_area_aspect(&mut rng, 100.0, (0.5, 0.5), log).1 > 1.0)
            .count();
        let fraction = above_one as f64 / draws as f64;
        assert!((0.45..0.55).contains(&fraction), "fraction above one {fraction}");
    }

    #[test]
    fn test_validation() {
        assert!(check_probability("flip", 0.0).is_ok());
        assert!(check_probability("flip", 1.0).is_ok());
        assert!(check_probability("flip", 1.5).is_err());
        assert!(check_probability("flip", f64::NAN).is_err());

        assert!(check_scale((0.08, 1.0)).is_ok());
        assert!(check_scale((0.5, 0.2)).is_err());
        assert!(check_scale((0.0, 0.5)).is_err());
        assert!(check_scale((0.5, 1.5)).is_err());

        assert!(log_ratio((0.75, 4.0 / 3.0)).is_ok());
        assert!(log_ratio((2.0, 1.0)).is_err());
        assert!(log_ratio((0.0, 1.0)).is_err());
    }
}

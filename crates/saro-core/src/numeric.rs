//! Numeric helpers for the synthetic scores the platform reports.

use rand::Rng;

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Draw uniformly from the closed range `[low, high]`.
///
/// Degenerate or inverted ranges return `low` rather than panicking.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rounds_to_places() {
        assert_eq!(round_to(0.87654, 3), 0.877);
        assert_eq!(round_to(12.34, 0), 12.0);
        assert_eq!(round_to(81.25, 1), 81.3);
    }

    #[test]
    fn degenerate_range_returns_low() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(uniform(&mut rng, 0.5, 0.5), 0.5);
        assert_eq!(uniform(&mut rng, 0.9, 0.1), 0.9);
    }

    proptest! {
        #[test]
        fn uniform_stays_in_range(seed in any::<u64>(), low in 0.0f64..1.0, width in 0.0f64..1.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let high = low + width;
            let v = uniform(&mut rng, low, high);
            prop_assert!(v >= low && v <= high);
        }
    }
}

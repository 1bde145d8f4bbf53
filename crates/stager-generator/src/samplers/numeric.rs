//! Numeric samplers.

use super::unit;
use rand::RngCore;
use stager_core::LongTailTier;

/// Box-Muller input floor; keeps `ln(u1)` finite.
const MIN_U1: f64 = 1e-4;

/// Integer in `[min, max]`, inclusive on both ends.
///
/// `min + floor(u * (max - min + 1))`. An inverted range yields `min`.
pub fn int_range<R: RngCore + ?Sized>(min: i64, max: i64, rng: &mut R) -> i64 {
    if max <= min {
        return min;
    }
    let span = (i128::from(max) - i128::from(min) + 1) as f64;
    let offset = (unit(rng) * span) as i128;
    (i128::from(min) + offset).min(i128::from(max)) as i64
}

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Decimal in `[min, max]` rounded to `precision` places.
pub fn decimal_range<R: RngCore + ?Sized>(min: f64, max: f64, precision: u32, rng: &mut R) -> f64 {
    round_to(min + unit(rng) * (max - min), precision)
}

/// Power-law style volume.
///
/// The first draw selects the tier whose cumulative bound exceeds it, the
/// second draws uniformly inside that tier.
pub fn long_tail<R: RngCore + ?Sized>(tiers: &[LongTailTier], rng: &mut R) -> i64 {
    assert!(!tiers.is_empty(), "long tail needs at least one tier");
    let selector = unit(rng);
    let tier = tiers
        .iter()
        .find(|t| selector < t.upto)
        .unwrap_or(&tiers[tiers.len() - 1]);
    int_range(tier.min, tier.max, rng)
}

/// Gaussian score via Box-Muller, clamped to `[min, max]`.
pub fn bell_curve<R: RngCore + ?Sized>(
    mean: f64,
    stddev: f64,
    min: f64,
    max: f64,
    rng: &mut R,
) -> f64 {
    let u1 = unit(rng).max(MIN_U1);
    let u2 = unit(rng);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    let value = mean + z * stddev;
    if max < min {
        return min;
    }
    value.clamp(min, max)
}

/// Positive 63-bit identifier built from two raw draws.
pub fn positive_i64<R: RngCore + ?Sized>(rng: &mut R) -> i64 {
    let hi = u64::from(rng.next_u32());
    let lo = u64::from(rng.next_u32());
    (((hi << 32) | lo) >> 1) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Mulberry32;
    use stager_core::VOTE_TIERS;

    /// Replays a fixed list of raw outputs.
    struct Scripted {
        values: Vec<u32>,
        pos: usize,
    }

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                *b = self.next_u32() as u8;
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_int_range_inclusive_bounds() {
        let mut rng = Scripted {
            values: vec![0, u32::MAX, 1 << 31],
            pos: 0,
        };
        assert_eq!(int_range(10, 20, &mut rng), 10);
        assert_eq!(int_range(10, 20, &mut rng), 20);
        assert_eq!(int_range(10, 20, &mut rng), 15);
    }

    #[test]
    fn test_int_range_extreme_span() {
        let mut rng = Scripted {
            values: vec![u32::MAX],
            pos: 0,
        };
        let v = int_range(i64::MIN, i64::MAX, &mut rng);
        assert!(v <= i64::MAX);
        assert_eq!(int_range(5, 5, &mut rng), 5);
        assert_eq!(int_range(9, 1, &mut rng), 9);
    }

    #[test]
    fn test_int_range_random_stream() {
        let mut rng = Mulberry32::new(42);
        for _ in 0..100_000 {
            let v = int_range(-3, 7, &mut rng);
            assert!((-3..=7).contains(&v));
        }
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(7.0, 2), 7.0);
    }

    #[test]
    fn test_decimal_range() {
        let mut rng = Mulberry32::new(42);
        for _ in 0..1_000 {
            let v = decimal_range(1.0, 10.0, 1, &mut rng);
            assert!((1.0..=10.0).contains(&v));
            assert_eq!(round_to(v, 1), v);
        }
    }

    #[test]
    fn test_long_tail_mostly_small() {
        let mut rng = Mulberry32::new(99);
        let draws = 20_000;
        let small = (0..draws)
            .filter(|_| long_tail(&VOTE_TIERS, &mut rng) <= 100)
            .count();
        let share = small as f64 / draws as f64;
        assert!((share - 0.7).abs() < 0.03, "share {share}");
    }

    #[test]
    fn test_long_tail_within_tiers() {
        let mut rng = Mulberry32::new(100);
        for _ in 0..10_000 {
            let v = long_tail(&VOTE_TIERS, &mut rng);
            assert!((5..=2_500_000).contains(&v));
        }
    }

    #[test]
    fn test_bell_curve_zero_u1_is_finite() {
        let mut rng = Scripted {
            values: vec![0, 0],
            pos: 0,
        };
        let v = bell_curve(50.0, 10.0, f64::MIN, f64::MAX, &mut rng);
        assert!(v.is_finite());
    }

    #[test]
    fn test_bell_curve_clamped_and_centred() {
        let mut rng = Mulberry32::new(123);
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let v = bell_curve(6.5, 1.5, 1.0, 10.0, &mut rng);
            assert!((1.0..=10.0).contains(&v));
            sum += v;
        }
        let mean = sum / n as f64;
        assert!((mean - 6.5).abs() < 0.1, "mean {mean}");
    }

    #[test]
    fn test_positive_i64() {
        let mut rng = Mulberry32::new(1);
        for _ in 0..1_000 {
            assert!(positive_i64(&mut rng) >= 0);
        }
    }
}

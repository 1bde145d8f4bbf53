//! Categorical samplers.

use super::unit;
use rand::RngCore;

/// Uniform choice: `candidates[floor(u * len)]`.
///
/// Panics on an empty slice.
pub fn pick<'a, T, R: RngCore + ?Sized>(candidates: &'a [T], rng: &mut R) -> &'a T {
    assert!(!candidates.is_empty(), "pick from an empty candidate list");
    let idx = (unit(rng) * candidates.len() as f64) as usize;
    &candidates[idx.min(candidates.len() - 1)]
}

/// Index selected by cumulative weight threshold.
///
/// Weights are normalised by their sum. Floating-point shortfall at the top
/// end falls back to the last index.
pub fn weighted_index<R: RngCore + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    assert!(!weights.is_empty(), "weighted pick with no weights");
    let total: f64 = weights.iter().sum();
    let threshold = unit(rng) * total;

    let mut cumulative = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if threshold < cumulative {
            return idx;
        }
    }
    weights.len() - 1
}

/// Weighted choice; `weights[i]` belongs to `candidates[i]`.
pub fn weighted_pick<'a, T, R: RngCore + ?Sized>(
    candidates: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> &'a T {
    assert_eq!(
        candidates.len(),
        weights.len(),
        "weighted pick needs one weight per candidate"
    );
    &candidates[weighted_index(weights, rng)]
}

/// Popularity-skewed index in `[0, len)`: `floor(len * u^skew)`.
///
/// `skew == 1.0` is uniform; larger values concentrate draws on low indices.
pub fn skewed_index<R: RngCore + ?Sized>(len: usize, skew: f64, rng: &mut R) -> usize {
    assert!(len > 0, "skewed index into an empty range");
    let idx = (unit(rng).powf(skew) * len as f64) as usize;
    idx.min(len - 1)
}

/// `n` distinct candidates via a partial Fisher-Yates shuffle.
///
/// Consumes exactly `min(n, len)` draws.
pub fn pick_distinct<'a, T, R: RngCore + ?Sized>(
    candidates: &'a [T],
    n: usize,
    rng: &mut R,
) -> Vec<&'a T> {
    let n = n.min(candidates.len());
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    for k in 0..n {
        let remaining = order.len() - k;
        let j = k + ((unit(rng) * remaining as f64) as usize).min(remaining - 1);
        order.swap(k, j);
    }
    order[..n].iter().map(|&i| &candidates[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Mulberry32;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_covers_all_candidates() {
        let mut rng = Mulberry32::new(11);
        let candidates = ["a", "b", "c", "d"];
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            let value = pick(&candidates, &mut rng);
            let idx = candidates.iter().position(|c| c == value).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_weighted_pick_converges() {
        let mut rng = Mulberry32::new(56789);
        let candidates = ["first", "second"];
        let weights = [0.7, 0.3];

        let draws = 100_000;
        let first = (0..draws)
            .filter(|_| *weighted_pick(&candidates, &weights, &mut rng) == "first")
            .count();
        let freq = first as f64 / draws as f64;
        assert!((freq - 0.7).abs() < 0.02, "frequency {freq}");
    }

    #[test]
    fn test_weighted_pick_unnormalised_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let candidates = [1, 2, 3];
        let weights = [2.0, 0.0, 6.0];

        for _ in 0..1_000 {
            assert_ne!(*weighted_pick(&candidates, &weights, &mut rng), 2);
        }
    }

    #[test]
    #[should_panic(expected = "one weight per candidate")]
    fn test_weighted_pick_length_mismatch() {
        let mut rng = Mulberry32::new(1);
        weighted_pick(&["a", "b"], &[1.0], &mut rng);
    }

    #[test]
    #[should_panic(expected = "empty candidate list")]
    fn test_pick_empty_panics() {
        let mut rng = Mulberry32::new(1);
        let empty: [u8; 0] = [];
        pick(&empty, &mut rng);
    }

    #[test]
    fn test_skewed_index_prefers_low_indices() {
        let mut rng = Mulberry32::new(5);
        let len = 100;
        let low = (0..10_000)
            .filter(|_| skewed_index(len, 3.0, &mut rng) < 10)
            .count();
        // u^3 < 0.1 holds for u < 0.464
        assert!(low > 4_000, "low count {low}");
    }

    #[test]
    fn test_pick_distinct() {
        let mut rng = Mulberry32::new(8);
        let candidates = ["a", "b", "c", "d", "e"];
        for n in 0..=7 {
            let picked = pick_distinct(&candidates, n, &mut rng);
            assert_eq!(picked.len(), n.min(candidates.len()));
            let mut sorted = picked.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), picked.len());
        }
    }
}

//! Sampling and clamping helpers shared by the model

use rand::{Rng, seq::IndexedRandom};

/// Clamp `value` into `[lower, upper]`; the upper bound wins if the bounds
/// are inverted.
///
/// # Examples
///
/// ```
/// use sdam::utils::clamp_between;
///
/// assert_eq!(clamp_between(1.4, 0.0, 1.0), 1.0);
/// assert_eq!(clamp_between(-0.2, 0.0, 1.0), 0.0);
/// assert_eq!(clamp_between(0.3, 0.0, 1.0), 0.3);
/// ```
pub fn clamp_between(value: f64, lower: f64, upper: f64) -> f64 {
    upper.min(lower.max(value))
}

/// Draw one item with probability proportional to its weight.
///
/// Consumes exactly one uniform draw when the total weight is positive, so
/// an episode's draw sequence does not depend on earlier outcomes. Returns
/// `None` only for an empty slice; non-positive totals fall back to a uniform
/// choice.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use sdam::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = [("contradicts", 0.6), ("partial", 0.25), ("corroborates", 0.15)];
/// assert!(weighted_sample(&mut rng, &items).is_some());
/// ```
pub fn weighted_sample<R, T, W>(rng: &mut R, items: &[(T, W)]) -> Option<T>
where
    R: Rng,
    T: Clone,
    W: Into<f64> + Copy,
{
    let (last, _) = items.last()?;
    let total: f64 = items.iter().map(|&(_, w)| Into::<f64>::into(w)).sum();
    if total <= 0.0 {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut remaining = rng.random::<f64>() * total;
    for (item, weight) in items {
        let weight: f64 = (*weight).into();
        if remaining < weight {
            return Some(item.clone());
        }
        remaining -= weight;
    }
    Some(last.clone())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn empty_and_single_item_samples() {
        let mut rng = StdRng::seed_from_u64(7);
        let none: [(u8, f64); 0] = [];
        assert_eq!(weighted_sample(&mut rng, &none), None);
        assert_eq!(weighted_sample(&mut rng, &[("clean", 0.15)]), Some("clean"));
    }

    #[test]
    fn zero_total_falls_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = [("attack", 0.0), ("clean", 0.0)];
        assert!(weighted_sample(&mut rng, &items).is_some());
    }

    #[test]
    fn frequencies_follow_weights() {
        let mut rng = StdRng::seed_from_u64(2024);
        let items = [("contradicts", 0.6), ("partial", 0.25), ("corroborates", 0.15)];
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for _ in 0..4000 {
            if let Some(signal) = weighted_sample(&mut rng, &items) {
                *counts.entry(signal).or_default() += 1;
            }
        }
        assert!(counts["contradicts"] > counts["partial"]);
        assert!(counts["partial"] > counts["corroborates"]);
        assert!((counts["contradicts"] as f64 / 4000.0 - 0.6).abs() < 0.05);
    }

    #[test]
    fn one_uniform_per_draw() {
        let items = [("attack", 0.85), ("clean", 0.15)];
        let mut sampled = StdRng::seed_from_u64(99);
        let mut reference = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            weighted_sample(&mut sampled, &items);
            let _: f64 = reference.random();
        }
        assert_eq!(sampled.random::<u64>(), reference.random::<u64>());
    }

    #[test]
    fn clamp_between_prefers_upper_bound() {
        assert_eq!(clamp_between(0.995, 0.01, 0.99), 0.99);
        assert_eq!(clamp_between(0.001, 0.01, 0.99), 0.01);
    }
}

//! Attempt bounds and collision estimates.
//!
//! Both are functions of the ID space `alphabet_len ^ size`, computed as a
//! floating-point power. Large spaces overflow to infinity, which both
//! functions treat as "effectively unlimited".

/// Upper bound on candidates tried by one `generate` call.
pub const MAX_ATTEMPTS: usize = 1000;

/// Size of the ID space as a float; may be `f64::INFINITY`.
pub fn id_space(alphabet_len: usize, size: usize) -> f64 {
    (alphabet_len as f64).powf(size as f64)
}

/// Number of candidates the retry loop may try.
///
/// `min(floor(space * pressure), MAX_ATTEMPTS)`, and never less than one so
/// that a valid configuration always gets at least one attempt.
pub fn max_attempts(alphabet_len: usize, size: usize, uniqueness_pressure: f64) -> usize {
    let scaled = id_space(alphabet_len, size) * uniqueness_pressure;
    let bounded = scaled.min(MAX_ATTEMPTS as f64).floor();
    (bounded as usize).max(1)
}

/// Birthday-bound probability that `n` uniform draws are pairwise distinct.
///
/// `exp(-n(n-1) / (2 * space))`, exactly 1.0 for `n <= 1`.
pub fn uniqueness_probability(alphabet_len: usize, size: usize, n: u64) -> f64 {
    if n < 2 {
        return 1.0;
    }
    let space = id_space(alphabet_len, size);
    let n = n as f64;
    let exponent = -(n * (n - 1.0)) / (2.0 * space);
    exponent.exp().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_attempts_capped_for_large_space() {
        assert_eq!(max_attempts(62, 21, 0.99), MAX_ATTEMPTS);
        assert_eq!(max_attempts(62, 10_000, 0.99), MAX_ATTEMPTS);
    }

    #[test]
    fn test_attempts_limited_by_small_space() {
        assert_eq!(max_attempts(2, 1, 1.0), 2);
        assert_eq!(max_attempts(10, 2, 0.5), 50);
        assert_eq!(max_attempts(2, 3, 0.99), 7);
    }

    #[test]
    fn test_attempts_at_least_one() {
        assert_eq!(max_attempts(2, 1, 0.1), 1);
    }

    #[test]
    fn test_probability_trivial_populations() {
        assert_eq!(uniqueness_probability(62, 21, 0), 1.0);
        assert_eq!(uniqueness_probability(62, 21, 1), 1.0);
        assert_eq!(uniqueness_probability(2, 1, 1), 1.0);
    }

    #[test]
    fn test_probability_known_value() {
        // 23 people, 365 days: about 0.5
        let p = uniqueness_probability(365, 1, 23);
        assert!((p - 0.5000).abs() < 0.01, "p = {p}");
    }

    #[test]
    fn test_probability_infinite_space() {
        assert_eq!(uniqueness_probability(62, 1_000, 1_000_000), 1.0);
    }

    #[test]
    fn test_probability_tiny_space_goes_to_zero() {
        let p = uniqueness_probability(2, 1, 1_000_000);
        assert!(p >= 0.0);
        assert!(p < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_probability_in_unit_interval(
            alphabet_len in 2usize..100,
            size in 1usize..64,
            n in 0u64..=1_000_000,
        ) {
            let p = uniqueness_probability(alphabet_len, size, n);
            prop_assert!(!p.is_nan());
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn prop_probability_non_increasing(
            alphabet_len in 2usize..100,
            size in 1usize..16,
            n in 0u64..1_000_000,
            step in 1u64..1_000,
        ) {
            let smaller = uniqueness_probability(alphabet_len, size, n);
            let larger = uniqueness_probability(alphabet_len, size, n + step);
            prop_assert!(larger <= smaller);
        }

        #[test]
        fn prop_attempts_within_bounds(
            alphabet_len in 2usize..100,
            size in 1usize..32,
            pressure in 0.001f64..=1.0,
        ) {
            let attempts = max_attempts(alphabet_len, size, pressure);
            prop_assert!((1..=MAX_ATTEMPTS).contains(&attempts));
        }
    }
}

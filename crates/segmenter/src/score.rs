//! Split-point scoring
//!
//! The position weight is a binomial probability mass shaped bell over a
//! fixed 30-step domain: it discourages splits near either end of the text
//! and peaks at the middle. Factorials are approximated with Stirling's
//! formula, which is plenty accurate for a domain of 30, and the 31 possible
//! domain values are precomputed once per process.

use std::sync::LazyLock;

/// Fixed binomial domain size.
const DOMAIN: usize = 30;

/// Stirling's approximation of `n!`: `(n/e)^n * sqrt(2*pi*n)`.
fn stirling(n: f64) -> f64 {
    (n / std::f64::consts::E).powf(n) * (2.0 * std::f64::consts::PI * n).sqrt()
}

/// Precomputed `sqrt(C(30, k) * 0.5^30)` for every domain value.
///
/// Index 0 and 30 stay at 0.0: the successes parameter is always mapped into
/// the interior of the domain.
static POSITION_WEIGHTS: LazyLock<[f64; DOMAIN + 1]> = LazyLock::new(|| {
    let mut table = [0.0; DOMAIN + 1];
    let n = DOMAIN as f64;
    for (k, slot) in table.iter_mut().enumerate().take(DOMAIN).skip(1) {
        let k = k as f64;
        let binomial = stirling(n) / (stirling(k) * stirling(n - k));
        *slot = (binomial * 0.5_f64.powi(DOMAIN as i32)).sqrt();
    }
    table
});

/// Position weight for splitting a `len`-char text at char `index`.
///
/// The fractional position is mapped onto the binomial domain:
/// `k = (30 - 2) * index / len + 1`, quantized to the nearest table entry.
pub(crate) fn position_weight(index: usize, len: usize) -> f64 {
    debug_assert!(len > 0 && index < len);
    let fraction = index as f64 / len as f64;
    let k = ((DOMAIN as f64 - 2.0) * fraction + 1.0).round() as usize;
    POSITION_WEIGHTS[k.clamp(1, DOMAIN - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_peaks_at_center() {
        let table = &*POSITION_WEIGHTS;
        let peak = table
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak, DOMAIN / 2);
    }

    #[test]
    fn test_table_is_symmetric() {
        let table = &*POSITION_WEIGHTS;
        for k in 1..DOMAIN {
            let mirror = DOMAIN - k;
            assert!(
                (table[k] - table[mirror]).abs() < 1e-9,
                "table[{k}] != table[{mirror}]"
            );
        }
    }

    #[test]
    fn test_interior_weights_positive() {
        for k in 1..DOMAIN {
            assert!(POSITION_WEIGHTS[k] > 0.0, "table[{k}] not positive");
        }
    }

    #[test]
    fn test_center_beats_edges() {
        let len = 1000;
        let edge = position_weight(1, len);
        let center = position_weight(len / 2, len);
        assert!(center > edge * 100.0);
    }

    #[test]
    fn test_stirling_close_to_factorial() {
        // 10! = 3628800; Stirling is within ~1%
        let approx = stirling(10.0);
        let exact = 3_628_800.0;
        assert!((approx - exact).abs() / exact < 0.01);
    }
}

//! Numeric helpers for the Beta-decay model
//!
//! - `ln_beta`: log of the Beta function (statrs), guarded against non-positive arguments
//! - `ln_sub_exp`: ln(e^a - e^b) without leaving log space
//! - `find_bracket` / `bisect`: scalar root finding for decreasing functions

use statrs::function::beta;

use crate::error::{RecallError, Result};

/// Maximum bracket expansions before giving up
const MAX_BRACKET_STEPS: usize = 200;

/// Bisection iterations (interval shrinks by 2^-100)
const MAX_BISECT_ITERATIONS: usize = 100;

/// Relative tolerance for bisection termination
const BISECT_REL_TOLERANCE: f64 = 1e-12;

/// ln B(a, b)
pub fn ln_beta(a: f64, b: f64) -> Result<f64> {
    if !(a > 0.0 && b > 0.0) || !a.is_finite() || !b.is_finite() {
        return Err(RecallError::NumericDegenerate(format!(
            "ln_beta requires positive finite arguments, got a={a}, b={b}"
        )));
    }
    Ok(beta::ln_beta(a, b))
}

/// ln(e^a - e^b), requires a > b.
///
/// Returns `-inf` when the two terms are equal.
pub fn ln_sub_exp(a: f64, b: f64) -> f64 {
    if b == f64::NEG_INFINITY {
        return a;
    }
    let diff = b - a;
    if diff >= 0.0 {
        return f64::NEG_INFINITY;
    }
    a + (-diff.exp()).ln_1p()
}

/// Find `[low, high]` such that `f(low) > 0 > f(high)` for a decreasing `f`.
///
/// Starts at `[init / grow, init * grow]` and walks the bracket geometrically.
pub fn find_bracket<F>(f: F, init: f64, grow: f64) -> Result<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let mut low = init / grow;
    let mut high = init * grow;
    let mut f_low = f(low);
    let mut f_high = f(high);

    let mut steps = 0;
    while f_low > 0.0 && f_high > 0.0 {
        low = high;
        f_low = f_high;
        high *= grow;
        f_high = f(high);
        steps += 1;
        if steps > MAX_BRACKET_STEPS || !high.is_finite() {
            return Err(RecallError::NumericDegenerate(
                "root bracket diverged upward".to_string(),
            ));
        }
    }
    while f_low < 0.0 && f_high < 0.0 {
        high = low;
        f_high = f_low;
        low /= grow;
        f_low = f(low);
        steps += 1;
        if steps > MAX_BRACKET_STEPS || low <= 0.0 {
            return Err(RecallError::NumericDegenerate(
                "root bracket diverged downward".to_string(),
            ));
        }
    }

    if f_low.is_nan() || f_high.is_nan() || !(f_low >= 0.0 && f_high <= 0.0) {
        return Err(RecallError::NumericDegenerate(format!(
            "no sign change in bracket [{low}, {high}]"
        )));
    }
    Ok((low, high))
}

/// Bisection on a bracket of a decreasing function.
pub fn bisect<F>(f: F, mut low: f64, mut high: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    for _ in 0..MAX_BISECT_ITERATIONS {
        let mid = 0.5 * (low + high);
        let value = f(mid);
        if value == 0.0 {
            return mid;
        }
        if value > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
        if (high - low) <= BISECT_REL_TOLERANCE * mid.abs() {
            break;
        }
    }
    0.5 * (low + high)
}

/// Fit Beta(alpha, beta) to a mean and variance by moment matching.
pub fn mean_var_to_beta(mean: f64, var: f64) -> Result<(f64, f64)> {
    if !(mean > 0.0 && mean < 1.0) || !(var > 0.0) || !mean.is_finite() || !var.is_finite() {
        return Err(RecallError::NumericDegenerate(format!(
            "cannot fit beta to mean={mean}, var={var}"
        )));
    }
    let tmp = mean * (1.0 - mean) / var - 1.0;
    if tmp <= 0.0 {
        return Err(RecallError::NumericDegenerate(format!(
            "variance {var} too large for mean {mean}"
        )));
    }
    Ok((mean * tmp, (1.0 - mean) * tmp))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_ln_beta_known_values() {
        // B(1, 1) = 1, B(2, 3) = 1/12
        assert!(ln_beta(1.0, 1.0).unwrap().abs() < EPSILON);
        assert!((ln_beta(2.0, 3.0).unwrap() - (1.0f64 / 12.0).ln()).abs() < EPSILON);
    }

    #[test]
    fn test_ln_beta_rejects_non_positive() {
        assert!(ln_beta(0.0, 1.0).is_err());
        assert!(ln_beta(1.0, -2.0).is_err());
        assert!(ln_beta(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_ln_sub_exp() {
        let value = ln_sub_exp(3.0f64.ln(), 1.0f64.ln());
        assert!((value - 2.0f64.ln()).abs() < EPSILON);
        assert_eq!(ln_sub_exp(1.0, 1.0), f64::NEG_INFINITY);
        assert_eq!(ln_sub_exp(0.5, f64::NEG_INFINITY), 0.5);
    }

    #[test]
    fn test_bracket_and_bisect() {
        // root of 10 - x at x = 10
        let f = |x: f64| 10.0 - x;
        let (low, high) = find_bracket(f, 1.0, 2.0).unwrap();
        assert!(low <= 10.0 && high >= 10.0);
        let root = bisect(f, low, high);
        assert!((root - 10.0).abs() < 1e-8);
    }

    #[test]
    fn test_bracket_moves_down() {
        let f = |x: f64| 0.01 - x;
        let (low, high) = find_bracket(f, 1.0, 2.0).unwrap();
        assert!(low <= 0.01 && high >= 0.01);
    }

    #[test]
    fn test_bracket_without_root_fails() {
        assert!(find_bracket(|_| 1.0, 1.0, 2.0).is_err());
    }

    #[test]
    fn test_mean_var_to_beta_round_trip() {
        // Beta(3, 3): mean 0.5, var = 9 / (36 * 7)
        let (a, b) = mean_var_to_beta(0.5, 9.0 / (36.0 * 7.0)).unwrap();
        assert!((a - 3.0).abs() < 1e-9);
        assert!((b - 3.0).abs() < 1e-9);
        assert!(mean_var_to_beta(0.5, 0.3).is_err());
    }
}

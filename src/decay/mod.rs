//! Beta-Decay Recall Model
//!
//! Core theory:
//! - Recall probability decays exponentially: p(t) = p_h^(t/h), where h is the halflife
//!   and p_h is the recall probability exactly one halflife after the last review
//! - Uncertainty about p_h is a Beta(α, β) distribution, so the prediction at any
//!   elapsed time is an expectation over that Beta
//! - A single pass/fail observation updates the belief by Bayes' rule; the posterior
//!   is projected back onto a Beta at a new halflife (moment matching)
//!
//! Mathematical formulas:
//! - Expected recall after δ = t/h halflives: E[p^δ] = B(α + δ, β) / B(α, β)
//! - Posterior moments at a new horizon r = h'/h, success observed at δ:
//!   - E[p^(m·r) | pass] = B(α + δ + m·r, β) / B(α + δ, β)
//!   - E[p^(m·r) | fail] = (B(α + m·r, β) - B(α + δ + m·r, β)) / (B(α, β) - B(α + δ, β))
//! - Rebalancing picks r so that the posterior mean at h' is exactly 1/2, then
//!   fits (α', β') from the first two moments
//!
//! All Beta functions are evaluated in log space.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, ContinuousCDF};

use crate::error::{RecallError, Result};
use crate::math::{bisect, find_bracket, ln_beta, ln_sub_exp, mean_var_to_beta};
use crate::sanitize::{
    clamp_halflife, clamp_probability, is_positive_finite, sanitize_update, validate_triple,
};
use crate::types::MIN_ELAPSED_HOURS;

// ==================== Constants ====================

/// Geometric growth factor used while bracketing roots
const BRACKET_GROWTH: f64 = 2.0;

// ==================== Data Structures ====================

/// (α, β, halflife) triple describing the belief about an item's decay.
///
/// `halflife` is in hours.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetaDecay {
    pub alpha: f64,
    pub beta: f64,
    pub halflife: f64,
}

impl BetaDecay {
    pub fn new(alpha: f64, beta: f64, halflife: f64) -> Result<Self> {
        validate_triple(alpha, beta, halflife)?;
        Ok(Self {
            alpha,
            beta,
            halflife,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validate_triple(self.alpha, self.beta, self.halflife)
    }

    /// See [`predict_recall`].
    pub fn predict(&self, elapsed_hours: f64, exact: bool) -> Result<f64> {
        predict_recall(self, elapsed_hours, exact)
    }

    /// See [`update_recall`].
    pub fn update(&self, success: bool, elapsed_hours: f64) -> Result<Self> {
        update_recall(self, success, elapsed_hours)
    }
}

// ==================== Prediction ====================

/// Expected recall `elapsed_hours` after the last review.
///
/// With `exact = false` the natural log of the expectation is returned (always
/// `<= 0`); it orders items identically and skips the final `exp`. With
/// `exact = true` the probability itself in `[0, 1]` is returned.
///
/// Negative elapsed time is treated as zero.
pub fn predict_recall(model: &BetaDecay, elapsed_hours: f64, exact: bool) -> Result<f64> {
    model.validate()?;
    let delta = elapsed_hours.max(0.0) / model.halflife;
    let ln_recall = (ln_beta(model.alpha + delta, model.beta)?
        - ln_beta(model.alpha, model.beta)?)
    .min(0.0);

    if exact {
        Ok(clamp_probability(ln_recall.exp()))
    } else {
        Ok(ln_recall)
    }
}

/// Credible interval for the recall probability at `elapsed_hours`.
///
/// Quantiles of p_h ~ Beta(α, β) map monotonically through x ↦ x^δ.
pub fn recall_interval(model: &BetaDecay, elapsed_hours: f64, level: f64) -> Result<(f64, f64)> {
    model.validate()?;
    if !(level > 0.0 && level < 1.0) {
        return Err(RecallError::NumericDegenerate(format!(
            "credible level must lie in (0, 1), got {level}"
        )));
    }

    let dist = Beta::new(model.alpha, model.beta)
        .map_err(|err| RecallError::InvalidModel(err.to_string()))?;
    let tail = (1.0 - level) / 2.0;
    let delta = elapsed_hours.max(0.0) / model.halflife;

    let low = clamp_probability(dist.inverse_cdf(tail).powf(delta));
    let high = clamp_probability(dist.inverse_cdf(1.0 - tail).powf(delta));
    Ok((low.min(high), high.max(low)))
}

/// Hours after the last review at which expected recall falls to `percentile`.
///
/// `halflife_at_percentile(model, 0.5)` is the model's true halflife, which
/// differs from `model.halflife` when α ≠ β.
pub fn halflife_at_percentile(model: &BetaDecay, percentile: f64) -> Result<f64> {
    model.validate()?;
    if !(percentile > 0.0 && percentile < 1.0) {
        return Err(RecallError::NumericDegenerate(format!(
            "percentile must lie in (0, 1), got {percentile}"
        )));
    }

    let ln_den = ln_beta(model.alpha, model.beta)?;
    let target = percentile.ln();
    let (alpha, beta) = (model.alpha, model.beta);
    let f = move |delta: f64| match ln_beta(alpha + delta, beta) {
        Ok(ln_num) => ln_num - ln_den - target,
        Err(_) => f64::NAN,
    };

    let (low, high) = find_bracket(f, 1.0, BRACKET_GROWTH)?;
    Ok(bisect(f, low, high) * model.halflife)
}

/// Re-express the model with symmetric shape at its true halflife, scaled by `scale`.
///
/// Used to make an item manually easier (`scale > 1`) or harder (`scale < 1`)
/// without an observed attempt.
pub fn rescale_halflife(model: &BetaDecay, scale: f64) -> Result<BetaDecay> {
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(RecallError::NumericDegenerate(format!(
            "halflife scale must be positive, got {scale}"
        )));
    }
    let true_halflife = halflife_at_percentile(model, 0.5)?;
    let delta = true_halflife / model.halflife;
    let m2 = (ln_beta(model.alpha + 2.0 * delta, model.beta)? - ln_beta(model.alpha, model.beta)?)
        .exp();
    // Symmetric Beta(a, a) with mean 1/2 and second moment m2
    let shape = 1.0 / (8.0 * m2 - 2.0) - 0.5;
    if !(shape > 0.0) {
        return Err(RecallError::NumericDegenerate(format!(
            "rescaling produced non-positive shape {shape}"
        )));
    }
    let (alpha, beta, halflife) = sanitize_update(shape, shape, true_halflife * scale)?;
    Ok(BetaDecay {
        alpha,
        beta,
        halflife,
    })
}

// ==================== Update ====================

/// Posterior after one pass/fail observation `elapsed_hours` after the last review.
///
/// The returned halflife is rebalanced to where the posterior mean recall is 1/2.
/// When that horizon lies outside `[MIN_HALFLIFE_HOURS, MAX_HALFLIFE_HOURS]` the
/// posterior is fitted at the clamped horizon instead, so `(α, β)` always describe
/// recall at the stored halflife. If the rebalanced fit is numerically unusable
/// the posterior is fitted at the unchanged halflife, and if that fails too the
/// model is kept as is.
///
/// Elapsed times below [`MIN_ELAPSED_HOURS`] carry no information and return
/// the model unchanged.
pub fn update_recall(model: &BetaDecay, success: bool, elapsed_hours: f64) -> Result<BetaDecay> {
    model.validate()?;
    if !elapsed_hours.is_finite() || elapsed_hours < 0.0 {
        return Err(RecallError::NumericDegenerate(format!(
            "elapsed time must be finite and non-negative, got {elapsed_hours}"
        )));
    }
    if elapsed_hours < MIN_ELAPSED_HOURS {
        return Ok(*model);
    }

    let posterior = Posterior {
        alpha: model.alpha,
        beta: model.beta,
        delta: elapsed_hours / model.halflife,
        success,
    };
    let ln_den = posterior.ln_moment(0.0, 0.0)?;
    if !ln_den.is_finite() {
        tracing::warn!(
            delta = posterior.delta,
            success,
            "observation has no usable likelihood, model kept"
        );
        return Ok(*model);
    }

    let horizon = match posterior.rebalanced_scale(ln_den) {
        Ok(scale) => scale * model.halflife,
        Err(err) => {
            tracing::warn!(error = %err, "rebalancing failed, keeping halflife");
            model.halflife
        }
    };
    let halflife = clamp_halflife(horizon);

    let (alpha, beta, halflife) = match posterior.fit(ln_den, halflife / model.halflife) {
        Ok((alpha, beta)) => (alpha, beta, halflife),
        Err(err) if halflife != model.halflife => {
            tracing::warn!(error = %err, horizon = halflife, "fit at rebalanced horizon failed");
            match posterior.fit(ln_den, 1.0) {
                Ok((alpha, beta)) => (alpha, beta, model.halflife),
                Err(err) => {
                    tracing::warn!(error = %err, "posterior fit failed, model kept");
                    return Ok(*model);
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "posterior fit failed, model kept");
            return Ok(*model);
        }
    };

    let (alpha, beta, halflife) = sanitize_update(alpha, beta, halflife)?;
    Ok(BetaDecay {
        alpha,
        beta,
        halflife,
    })
}

/// Unnormalized posterior moments for a single observation.
struct Posterior {
    alpha: f64,
    beta: f64,
    delta: f64,
    success: bool,
}

impl Posterior {
    /// ln of the unnormalized m-th moment of p^scale
    fn ln_moment(&self, m: f64, scale: f64) -> Result<f64> {
        let shift = m * scale;
        let passed = ln_beta(self.alpha + self.delta + shift, self.beta)?;
        if self.success {
            Ok(passed)
        } else {
            Ok(ln_sub_exp(ln_beta(self.alpha + shift, self.beta)?, passed))
        }
    }

    /// Horizon (in old halflives) at which the posterior mean recall is 1/2
    fn rebalanced_scale(&self, ln_den: f64) -> Result<f64> {
        let target = 0.5f64.ln();
        let mean_gap = |scale: f64| match self.ln_moment(1.0, scale) {
            Ok(ln_m1) => ln_m1 - ln_den - target,
            Err(_) => f64::NAN,
        };
        let (low, high) = find_bracket(mean_gap, 1.0, BRACKET_GROWTH)?;
        Ok(bisect(mean_gap, low, high))
    }

    /// Moment-matched Beta for recall `scale` old halflives after the review
    fn fit(&self, ln_den: f64, scale: f64) -> Result<(f64, f64)> {
        let ln_mean = self.ln_moment(1.0, scale)? - ln_den;
        let mean = ln_mean.exp();
        let second = (self.ln_moment(2.0, scale)? - ln_den).exp();
        let var = second - (2.0 * ln_mean).exp();

        let (alpha, beta) = mean_var_to_beta(mean, var)?;
        if !is_positive_finite(alpha) || !is_positive_finite(beta) {
            return Err(RecallError::NumericDegenerate(format!(
                "fitted shape out of range: alpha={alpha}, beta={beta}"
            )));
        }
        Ok((alpha, beta))
    }
}

// ==================== Tests ====================

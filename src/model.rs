//! Per-(user, item) recall state
//!
//! A `RecallModel` is uninitialized (no halflife, no last review) until the
//! first attempt; that attempt only picks a halflife from the initial-interval
//! table. Every later attempt runs the Bayesian update in [`crate::decay`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::InitialInterval;
use crate::decay::BetaDecay;
use crate::error::{RecallError, Result};
use crate::types::{hours_between, hours_to_duration, outcome_label};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecallModel {
    pub alpha: f64,
    pub beta: f64,
    /// Hours; `None` before the first attempt
    pub halflife: Option<f64>,
    pub last_review: Option<DateTime<Utc>>,
}

impl RecallModel {
    pub fn new(prior_alpha: f64, prior_beta: f64) -> Self {
        Self {
            alpha: prior_alpha,
            beta: prior_beta,
            halflife: None,
            last_review: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.halflife.is_some() && self.last_review.is_some()
    }

    /// The (α, β, halflife) triple, once initialized.
    pub fn decay(&self) -> Result<Option<BetaDecay>> {
        match self.halflife {
            Some(halflife) if self.last_review.is_some() => {
                BetaDecay::new(self.alpha, self.beta, halflife).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Apply one attempt outcome at `at_time` (now when `None`).
    ///
    /// On error the model is left untouched.
    pub fn attempt(
        &mut self,
        success: bool,
        at_time: Option<DateTime<Utc>>,
        initial: &InitialInterval,
    ) -> Result<()> {
        let at_time = at_time.unwrap_or_else(Utc::now);

        let (Some(decay), Some(last_review)) = (self.decay()?, self.last_review) else {
            self.halflife = Some(initial.hours_for(success)?);
            self.last_review = Some(at_time);
            tracing::debug!(
                outcome = outcome_label(success),
                halflife = ?self.halflife,
                "recall model initialized"
            );
            return Ok(());
        };

        if at_time < last_review {
            tracing::warn!(%last_review, %at_time, "out-of-order attempt rejected");
            return Err(RecallError::OrderingViolation {
                last_review,
                at_time,
            });
        }

        let elapsed = hours_between(last_review, at_time);
        let updated = decay.update(success, elapsed).inspect_err(|err| {
            tracing::warn!(error = %err, elapsed, "recall update failed");
        })?;

        self.alpha = updated.alpha;
        self.beta = updated.beta;
        self.halflife = Some(updated.halflife);
        self.last_review = Some(at_time);

        tracing::debug!(
            outcome = outcome_label(success),
            elapsed,
            alpha = updated.alpha,
            beta = updated.beta,
            halflife = updated.halflife,
            "recall model updated"
        );
        Ok(())
    }

    /// Recall prediction at `at_time` (now when `None`).
    ///
    /// Uninitialized models report `0.0` when `exact` and `-inf` otherwise, so
    /// they rank below every reviewed item while displaying as zero. Ranking
    /// callers use `exact = false` (log scale); display callers use `exact = true`.
    pub fn predict(&self, at_time: Option<DateTime<Utc>>, exact: bool) -> Result<f64> {
        let (Some(decay), Some(last_review)) = (self.decay()?, self.last_review) else {
            return Ok(if exact { 0.0 } else { f64::NEG_INFINITY });
        };
        let at_time = at_time.unwrap_or_else(Utc::now);
        decay.predict(hours_between(last_review, at_time), exact)
    }

    /// Linear due-time marker `last_review + halflife`, used as a cheap queue pre-filter.
    pub fn next_review(&self) -> Option<DateTime<Utc>> {
        let last_review = self.last_review?;
        let halflife = self.halflife?;
        last_review.checked_add_signed(hours_to_duration(halflife))
    }

    /// Whether the record is eligible for review at `reference_time`.
    pub fn is_due(&self, reference_time: DateTime<Utc>) -> bool {
        if !self.is_initialized() {
            return true;
        }
        match self.next_review() {
            Some(scheduled) => scheduled <= reference_time,
            // Due time beyond the representable range
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_PRIOR_ALPHA, DEFAULT_PRIOR_BETA};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn fresh() -> RecallModel {
        RecallModel::new(DEFAULT_PRIOR_ALPHA, DEFAULT_PRIOR_BETA)
    }

    fn table() -> InitialInterval {
        InitialInterval::new(24.0, 4.0)
    }

    #[test]
    fn test_uninitialized_sentinels() {
        let model = fresh();
        assert!(!model.is_initialized());
        assert_eq!(model.predict(Some(t0()), true).unwrap(), 0.0);
        assert_eq!(model.predict(Some(t0()), false).unwrap(), f64::NEG_INFINITY);
        assert_eq!(model.next_review(), None);
        assert!(model.is_due(t0()));
    }

    #[test]
    fn test_first_success_uses_success_interval() {
        let mut model = fresh();
        model.attempt(true, Some(t0()), &table()).unwrap();
        assert_eq!(model.halflife, Some(24.0));
        assert_eq!(model.last_review, Some(t0()));
        assert_eq!(model.alpha, DEFAULT_PRIOR_ALPHA);
        assert_eq!(model.beta, DEFAULT_PRIOR_BETA);
    }

    #[test]
    fn test_first_failure_uses_failure_interval() {
        let mut model = fresh();
        model.attempt(false, Some(t0()), &table()).unwrap();
        assert_eq!(model.halflife, Some(4.0));
        assert_eq!(model.next_review(), Some(t0() + Duration::hours(4)));
    }

    #[test]
    fn test_missing_interval_leaves_model_untouched() {
        let mut model = fresh();
        let partial = InitialInterval {
            success: None,
            failure: Some(4.0),
        };
        let err = model.attempt(true, Some(t0()), &partial).unwrap_err();
        assert!(matches!(err, RecallError::MissingInitialInterval { .. }));
        assert_eq!(model, fresh());
    }

    #[test]
    fn test_second_attempt_runs_update() {
        let mut model = fresh();
        model.attempt(true, Some(t0()), &table()).unwrap();
        model
            .attempt(true, Some(t0() + Duration::hours(30)), &table())
            .unwrap();
        assert!(model.halflife.unwrap() > 24.0);
        assert_eq!(model.last_review, Some(t0() + Duration::hours(30)));
    }

    #[test]
    fn test_out_of_order_attempt_rejected() {
        let mut model = fresh();
        model.attempt(true, Some(t0()), &table()).unwrap();
        let before = model.clone();
        let err = model
            .attempt(false, Some(t0() - Duration::minutes(1)), &table())
            .unwrap_err();
        assert!(matches!(err, RecallError::OrderingViolation { .. }));
        assert_eq!(model, before);
    }

    #[test]
    fn test_same_instant_attempt_keeps_state() {
        let mut model = fresh();
        model.attempt(false, Some(t0()), &table()).unwrap();
        let before = model.clone();
        model.attempt(false, Some(t0()), &table()).unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn test_predict_two_hours_after_failure() {
        let mut model = fresh();
        model.attempt(false, Some(t0()), &table()).unwrap();
        let p2 = model.predict(Some(t0() + Duration::hours(2)), true).unwrap();
        let p3 = model.predict(Some(t0() + Duration::hours(3)), true).unwrap();
        assert!(p2 > 0.5 && p2 < 1.0);
        assert!(p3 < p2);
    }

    #[test]
    fn test_predict_is_pure() {
        let mut model = fresh();
        model.attempt(true, Some(t0()), &table()).unwrap();
        let snapshot = model.clone();
        let at = Some(t0() + Duration::hours(10));
        let first = model.predict(at, false).unwrap();
        let second = model.predict(at, false).unwrap();
        assert_eq!(first, second);
        assert_eq!(model, snapshot);
    }

    #[test]
    fn test_is_due_uses_linear_marker() {
        let mut model = fresh();
        model.attempt(true, Some(t0()), &table()).unwrap();
        assert!(!model.is_due(t0() + Duration::hours(23)));
        assert!(model.is_due(t0() + Duration::hours(24)));
    }

    #[test]
    fn test_corrupt_record_reports_invalid_model() {
        let model = RecallModel {
            alpha: 0.0,
            beta: 3.0,
            halflife: Some(4.0),
            last_review: Some(t0()),
        };
        assert!(matches!(
            model.predict(Some(t0()), true),
            Err(RecallError::InvalidModel(_))
        ));
    }
}

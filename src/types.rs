//! Common Types and Constants
//!
//! Shared data structures used across the scheduling modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Default prior alpha for a freshly created recall model
pub const DEFAULT_PRIOR_ALPHA: f64 = 3.0;

/// Default prior beta for a freshly created recall model
pub const DEFAULT_PRIOR_BETA: f64 = 3.0;

/// Default initial halflife after a successful first attempt (hours)
pub const DEFAULT_SUCCESS_INTERVAL_HOURS: f64 = 24.0;

/// Default initial halflife after a failed first attempt (hours)
pub const DEFAULT_FAILURE_INTERVAL_HOURS: f64 = 4.0;

/// Elapsed time below which an attempt carries no information (hours, ~0.36s)
pub const MIN_ELAPSED_HOURS: f64 = 1e-4;

/// Smallest shape parameter kept in stored state
pub const MIN_SHAPE: f64 = 1e-3;

/// Largest shape parameter kept in stored state
pub const MAX_SHAPE: f64 = 1e6;

/// Smallest halflife kept in stored state (hours)
pub const MIN_HALFLIFE_HOURS: f64 = 1e-3;

/// Largest halflife kept in stored state (hours, ~1000 years)
pub const MAX_HALFLIFE_HOURS: f64 = 1e7;

/// Milliseconds per hour, for converting between chrono durations and hours
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// ==================== Identity ====================

/// Key of a review record: one recall model per (user, item) pair
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressKey {
    pub user_id: String,
    pub item_id: String,
}

impl ProgressKey {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
        }
    }
}

impl std::fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.item_id)
    }
}

/// Human-readable label for an attempt outcome, used in logs and errors
pub fn outcome_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

// ==================== Time helpers ====================

/// Hours elapsed between two instants (negative if `to` precedes `from`)
pub fn hours_between(from: chrono::DateTime<chrono::Utc>, to: chrono::DateTime<chrono::Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Convert fractional hours into a chrono duration (millisecond precision)
pub fn hours_to_duration(hours: f64) -> chrono::Duration {
    let millis = (hours * MILLIS_PER_HOUR).round();
    let millis = if millis.is_finite() {
        millis.clamp(-(i64::MAX as f64), i64::MAX as f64) as i64
    } else {
        0
    };
    chrono::Duration::milliseconds(millis)
}

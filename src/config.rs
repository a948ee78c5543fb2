//! Scheduler configuration
//!
//! The initial-interval table decides the first halflife of a record depending
//! on whether the very first attempt succeeded. It is read once at start-up.

use serde::{Deserialize, Serialize};

use crate::error::{RecallError, Result};
use crate::types::{
    outcome_label, DEFAULT_FAILURE_INTERVAL_HOURS, DEFAULT_PRIOR_ALPHA, DEFAULT_PRIOR_BETA,
    DEFAULT_SUCCESS_INTERVAL_HOURS,
};

/// First halflife (hours) per outcome of the first attempt.
///
/// Entries are optional so that an incomplete deployment table is detected when
/// the missing outcome is first applied, not silently defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialInterval {
    #[serde(default)]
    pub success: Option<f64>,
    #[serde(default)]
    pub failure: Option<f64>,
}

impl Default for InitialInterval {
    fn default() -> Self {
        Self {
            success: Some(DEFAULT_SUCCESS_INTERVAL_HOURS),
            failure: Some(DEFAULT_FAILURE_INTERVAL_HOURS),
        }
    }
}

impl InitialInterval {
    pub fn new(success_hours: f64, failure_hours: f64) -> Self {
        Self {
            success: Some(success_hours),
            failure: Some(failure_hours),
        }
    }

    pub fn hours_for(&self, success: bool) -> Result<f64> {
        let entry = if success { self.success } else { self.failure };
        entry.ok_or(RecallError::MissingInitialInterval {
            outcome: outcome_label(success),
        })
    }

    fn validate(&self) -> Result<()> {
        for (label, entry) in [("success", self.success), ("failure", self.failure)] {
            if let Some(hours) = entry {
                if !hours.is_finite() || hours <= 0.0 {
                    return Err(RecallError::InvalidConfig(format!(
                        "initial {label} interval must be positive, got {hours}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub initial_interval: InitialInterval,
    #[serde(default = "default_prior_alpha")]
    pub prior_alpha: f64,
    #[serde(default = "default_prior_beta")]
    pub prior_beta: f64,
    /// Level (`"debug"`) or full filter directive (`"info,danci_recall=trace"`)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily rolling log files; stdout only when `None`
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_prior_alpha() -> f64 {
    DEFAULT_PRIOR_ALPHA
}

fn default_prior_beta() -> f64 {
    DEFAULT_PRIOR_BETA
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_interval: InitialInterval::default(),
            prior_alpha: DEFAULT_PRIOR_ALPHA,
            prior_beta: DEFAULT_PRIOR_BETA,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl SchedulerConfig {
    /// Reads `.env` (if any), then `INITIAL_INTERVAL_SUCCESS_HOURS`,
    /// `INITIAL_INTERVAL_FAILURE_HOURS`, `RECALL_PRIOR_ALPHA`, `RECALL_PRIOR_BETA`,
    /// `RUST_LOG` and `RECALL_LOG_DIR`. Unset or unparsable values use the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let success = env_f64("INITIAL_INTERVAL_SUCCESS_HOURS")
            .unwrap_or(DEFAULT_SUCCESS_INTERVAL_HOURS);
        let failure = env_f64("INITIAL_INTERVAL_FAILURE_HOURS")
            .unwrap_or(DEFAULT_FAILURE_INTERVAL_HOURS);
        let prior_alpha = env_f64("RECALL_PRIOR_ALPHA").unwrap_or(DEFAULT_PRIOR_ALPHA);
        let prior_beta = env_f64("RECALL_PRIOR_BETA").unwrap_or(DEFAULT_PRIOR_BETA);
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_level());
        let log_dir = std::env::var("RECALL_LOG_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty());

        Self {
            initial_interval: InitialInterval::new(success, failure),
            prior_alpha,
            prior_beta,
            log_level,
            log_dir,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| RecallError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (label, value) in [("prior_alpha", self.prior_alpha), ("prior_beta", self.prior_beta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RecallError::InvalidConfig(format!(
                    "{label} must be positive, got {value}"
                )));
            }
        }
        self.initial_interval.validate()
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
}

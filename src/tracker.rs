//! Progress tracker
//!
//! Entry point for hosts: applies attempt events to stored recall models and
//! answers prediction and review-queue queries. Each attempt is a single
//! read-modify-write through [`ProgressStore::update_with`].

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::model::RecallModel;
use crate::queue::{build_review_queue, due_forecast, sample_unseen, QueueEntry};
use crate::store::{ProgressStore, ReviewRecord};
use crate::types::{outcome_label, ProgressKey};

pub struct ProgressTracker {
    config: SchedulerConfig,
    store: Arc<dyn ProgressStore>,
}

impl ProgressTracker {
    pub fn new(config: SchedulerConfig, store: Arc<dyn ProgressStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Fresh model carrying the configured priors.
    pub fn new_model(&self) -> RecallModel {
        RecallModel::new(self.config.prior_alpha, self.config.prior_beta)
    }

    /// Apply one attempt and persist the result.
    ///
    /// The record is created with the configured priors on first contact.
    /// Errors leave the stored record unchanged.
    pub fn attempt(
        &self,
        user_id: &str,
        item_id: &str,
        success: bool,
        at_time: Option<DateTime<Utc>>,
    ) -> Result<ReviewRecord> {
        let key = ProgressKey::new(user_id, item_id);
        let at_time = at_time.unwrap_or_else(Utc::now);
        let initial = &self.config.initial_interval;

        let record = self.store.update_with(&key, &mut |current| {
            let mut record =
                current.unwrap_or_else(|| ReviewRecord::new(&key, self.new_model()));
            record.model.attempt(success, Some(at_time), initial)?;
            Ok(record)
        })?;

        tracing::debug!(
            user_id,
            item_id,
            outcome = outcome_label(success),
            halflife = ?record.model.halflife,
            "attempt recorded"
        );
        Ok(record)
    }

    /// Recall prediction for one pair; `None` when the user never met the item.
    pub fn prediction(
        &self,
        user_id: &str,
        item_id: &str,
        at_time: Option<DateTime<Utc>>,
        exact: bool,
    ) -> Result<Option<f64>> {
        let key = ProgressKey::new(user_id, item_id);
        match self.store.load(&key)? {
            Some(record) => record.model.predict(at_time, exact).map(Some),
            None => Ok(None),
        }
    }

    /// Due items for a user, least likely to be recalled first.
    ///
    /// `item_ids` restricts the candidates (e.g. to one course); `reference_time`
    /// defaults to now.
    pub fn review_queue(
        &self,
        user_id: &str,
        item_ids: Option<&[String]>,
        reference_time: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<QueueEntry>> {
        let reference_time = reference_time.unwrap_or_else(Utc::now);
        let records = self.store.records_for_user(user_id, item_ids)?;
        build_review_queue(&records, reference_time, limit)
    }

    /// Scheduled reviews per UTC day for a user.
    pub fn forecast(
        &self,
        user_id: &str,
        item_ids: Option<&[String]>,
    ) -> Result<BTreeMap<NaiveDate, usize>> {
        let records = self.store.records_for_user(user_id, item_ids)?;
        Ok(due_forecast(&records))
    }

    /// Up to `n` random candidates the user has never attempted.
    pub fn introduce<R>(
        &self,
        user_id: &str,
        candidates: &[String],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<String>>
    where
        R: Rng + ?Sized,
    {
        let seen: HashSet<String> = self
            .store
            .records_for_user(user_id, Some(candidates))?
            .into_iter()
            .map(|record| record.item_id)
            .collect();
        Ok(sample_unseen(candidates, &seen, n, rng))
    }
}

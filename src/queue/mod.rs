//! Review Queue
//!
//! Two-phase ordering over a snapshot of one user's records:
//! 1. Cheap pre-filter on the linear marker `last_review + halflife <= reference_time`
//!    (never-reviewed records always pass)
//! 2. Stable ascending sort by predicted log-recall, so the items least likely to
//!    be remembered come first and never-reviewed items (`-inf`) lead
//!
//! The pre-filter and the Bayesian prediction may disagree near the threshold;
//! nothing that fails the pre-filter is ever reported as due.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::ReviewRecord;

/// One ranked queue position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub item_id: String,
    /// Log of expected recall at the reference time (`-inf` if never reviewed)
    pub score: f64,
    /// Expected recall at the reference time, `0.0` if never reviewed
    pub recall_probability: f64,
    pub scheduled_review: Option<DateTime<Utc>>,
}

/// Rank the due records, lowest predicted recall first.
///
/// Ties keep the input order. `limit` truncates after sorting.
pub fn build_review_queue(
    records: &[ReviewRecord],
    reference_time: DateTime<Utc>,
    limit: Option<usize>,
) -> Result<Vec<QueueEntry>> {
    let mut entries: Vec<QueueEntry> = records
        .par_iter()
        .filter(|record| record.model.is_due(reference_time))
        .map(|record| -> Result<QueueEntry> {
            let score = record.model.predict(Some(reference_time), false)?;
            Ok(QueueEntry {
                item_id: record.item_id.clone(),
                score,
                recall_probability: score.exp(),
                scheduled_review: record.model.next_review(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by(|a, b| a.score.total_cmp(&b.score));

    if let Some(n) = limit {
        entries.truncate(n);
    }

    tracing::debug!(
        candidates = records.len(),
        queued = entries.len(),
        %reference_time,
        "review queue built"
    );
    Ok(entries)
}

/// Number of reviewed records scheduled on each UTC calendar day.
///
/// Never-reviewed records have no scheduled day and are skipped.
pub fn due_forecast(records: &[ReviewRecord]) -> BTreeMap<NaiveDate, usize> {
    let mut days = BTreeMap::new();
    for scheduled in records.iter().filter_map(|r| r.model.next_review()) {
        *days.entry(scheduled.date_naive()).or_insert(0) += 1;
    }
    days
}

/// Pick up to `n` distinct candidates the user has no record for yet.
///
/// Candidate order does not matter; pass a seeded RNG for reproducible picks.
pub fn sample_unseen<R>(
    candidates: &[String],
    seen: &HashSet<String>,
    n: usize,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut distinct: HashSet<&str> = HashSet::new();
    let mut unseen: Vec<&str> = Vec::new();
    for item in candidates {
        if !seen.contains(item) && distinct.insert(item.as_str()) {
            unseen.push(item.as_str());
        }
    }

    unseen
        .choose_multiple(rng, n)
        .map(|item| item.to_string())
        .collect()
}

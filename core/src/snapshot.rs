//! Snapshot serialization: the whole history to/from JSON.
//!
//! A snapshot is a JSON array of at most HISTORY_LIMIT records, newest
//! first, each shaped `{id, timestamp, status, score, recommendation,
//! formData}`. It is written whole on every mutation and read whole on
//! startup.

use crate::{
    error::{RiskError, RiskResult},
    history::History,
    record::ResultRecord,
    types::{Recommendation, RiskOutcome, RiskStatus, Timestamp, TransactionInput, MAX_SCORE},
};
use serde::Deserialize;

/// Name under which the snapshot is stored.
pub const SNAPSHOT_KEY: &str = "fraudDetectionHistory";

/// Wire shape of a single record, before validation.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    id:             String,
    timestamp:      Timestamp,
    status:         RiskStatus,
    score:          i64,
    recommendation: Recommendation,
    #[serde(rename = "formData", default)]
    form_data:      TransactionInput,
}

impl TryFrom<StoredRecord> for ResultRecord {
    type Error = RiskError;

    fn try_from(stored: StoredRecord) -> RiskResult<Self> {
        if stored.id.is_empty() {
            return Err(RiskError::InvalidRecord {
                id:     stored.id,
                reason: "empty id".into(),
            });
        }
        let score = u8::try_from(stored.score)
            .ok()
            .filter(|s| *s <= MAX_SCORE)
            .ok_or_else(|| RiskError::InvalidRecord {
                id:     stored.id.clone(),
                reason: format!("score {} outside 0..={MAX_SCORE}", stored.score),
            })?;

        let outcome = RiskOutcome::new(stored.status, score, stored.recommendation);
        if !outcome.is_consistent() {
            return Err(RiskError::InvalidRecord {
                id:     stored.id,
                reason: format!(
                    "status {:?} does not pair with recommendation {:?}",
                    stored.status, stored.recommendation
                ),
            });
        }

        Ok(ResultRecord::from_parts(stored.id, stored.timestamp, outcome, stored.form_data))
    }
}

pub fn encode(history: &History) -> RiskResult<Vec<u8>> {
    Ok(serde_json::to_vec(history)?)
}

/// Decode a snapshot. Any invalid record makes the whole snapshot invalid.
/// Snapshots longer than the history bound keep only the newest entries.
pub fn decode(bytes: &[u8]) -> RiskResult<History> {
    let stored: Vec<StoredRecord> = serde_json::from_slice(bytes)?;
    let records = stored
        .into_iter()
        .map(ResultRecord::try_from)
        .collect::<RiskResult<Vec<_>>>()?;
    Ok(History::from_newest_first(records))
}

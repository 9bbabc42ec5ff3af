//! Result records and the factory that mints them.
//!
//! RULE: A ResultRecord is immutable once created. Fields are private;
//! a change means building a new record.

use crate::types::{RecordId, RiskOutcome, Timestamp, TransactionInput};
use serde::Serialize;

/// One scored submission as kept in history.
///
/// Serializes to the persisted layout:
/// `{id, timestamp, status, score, recommendation, formData}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    id:        RecordId,
    timestamp: Timestamp,
    #[serde(flatten)]
    outcome:   RiskOutcome,
    #[serde(rename = "formData")]
    input:     TransactionInput,
}

impl ResultRecord {
    pub(crate) fn from_parts(
        id: RecordId,
        timestamp: Timestamp,
        outcome: RiskOutcome,
        input: TransactionInput,
    ) -> Self {
        Self { id, timestamp, outcome, input }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn outcome(&self) -> &RiskOutcome {
        &self.outcome
    }

    /// The input as it was at submission time.
    pub fn input_snapshot(&self) -> &TransactionInput {
        &self.input
    }
}

/// Highest id picked up from a restored history: 9999-12-31T23:59:59.999Z
/// in milliseconds. Larger ids are left alone when resuming.
pub const MAX_RESUMABLE_ID: i64 = 253_402_300_799_999;

/// Mints records with ids unique within a session.
///
/// Ids are the creation timestamp, bumped by one whenever the clock has
/// not moved past the last id issued, so they are strictly increasing.
/// Once the counter reaches `i64::MAX` ids become `"<i64::MAX>-<n>"`.
#[derive(Debug, Clone, Default)]
pub struct RecordFactory {
    last_issued: Option<i64>,
    saturated:   u64,
}

impl RecordFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after the given records. Non-numeric ids and ids
    /// outside `0..=MAX_RESUMABLE_ID` are ignored.
    pub fn resume_after<'a>(records: impl IntoIterator<Item = &'a ResultRecord>) -> Self {
        let last_issued = records
            .into_iter()
            .filter_map(|r| r.id.parse::<i64>().ok())
            .filter(|id| (0..=MAX_RESUMABLE_ID).contains(id))
            .max();
        Self { last_issued, saturated: 0 }
    }

    pub fn create(
        &mut self,
        input: &TransactionInput,
        outcome: RiskOutcome,
        now: Timestamp,
    ) -> ResultRecord {
        let id = match self.last_issued {
            Some(last) if now <= last => match last.checked_add(1) {
                Some(next) => {
                    self.last_issued = Some(next);
                    next.to_string()
                }
                None => {
                    self.saturated += 1;
                    log::warn!("record ids exhausted; issuing suffixed id");
                    format!("{last}-{}", self.saturated)
                }
            },
            _ => {
                self.last_issued = Some(now);
                now.to_string()
            }
        };

        ResultRecord {
            id,
            timestamp: now,
            outcome,
            input:     input.clone(),
        }
    }
}

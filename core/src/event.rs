//! Events emitted by the desk for each user action.
//!
//! Variants are only ever appended.

use crate::{
    rules::MatchedRule,
    types::{RecordId, Recommendation, RiskStatus, Timestamp},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    TransactionScored {
        record_id:      RecordId,
        timestamp:      Timestamp,
        status:         RiskStatus,
        score:          u8,
        recommendation: Recommendation,
        matched:        MatchedRule,
    },
    RecordEvicted {
        record_id: RecordId,
    },
    HistoryCleared {
        removed: usize,
    },
    ResultReset,
}

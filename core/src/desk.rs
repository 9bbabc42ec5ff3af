//! The risk desk, one session of the transaction checker.
//!
//! CONTROL FLOW (per submission, fixed):
//!   1. Normalizer      raw strings → NormalizedTransaction
//!   2. RuleEngine      first matching rule → RiskOutcome
//!   3. RecordFactory   outcome + input copy + id/timestamp → ResultRecord
//!   4. HistoryStore    prepend, truncate, write snapshot
//!
//! RULES:
//!   - Each action (submit, reset, clear) runs to completion before the next.
//!   - The history store is the only stateful component besides the
//!     current result.

use crate::{
    clock::{Clock, SystemClock},
    config::RiskConfig,
    event::DeskEvent,
    history::{History, HistoryStore},
    normalizer::normalize,
    record::{RecordFactory, ResultRecord},
    rules::{Evaluation, RuleEngine},
    storage::SnapshotStorage,
    types::TransactionInput,
};

pub struct RiskDesk<S: SnapshotStorage, C: Clock = SystemClock> {
    engine:  RuleEngine,
    factory: RecordFactory,
    history: HistoryStore<S>,
    clock:   C,
    current: Option<ResultRecord>,
}

impl<S: SnapshotStorage> RiskDesk<S, SystemClock> {
    pub fn open(config: &RiskConfig, storage: S) -> Self {
        Self::with_clock(config, storage, SystemClock)
    }
}

impl<S: SnapshotStorage, C: Clock> RiskDesk<S, C> {
    pub fn with_clock(config: &RiskConfig, storage: S, clock: C) -> Self {
        Self::with_engine(RuleEngine::new(&config.thresholds), storage, clock)
    }

    /// Build around an arbitrary rule engine.
    pub fn with_engine(engine: RuleEngine, storage: S, clock: C) -> Self {
        let history = HistoryStore::open(storage);
        let factory = RecordFactory::resume_after(history.history());
        Self {
            engine,
            factory,
            history,
            clock,
            current: None,
        }
    }

    /// Classify without recording anything.
    pub fn preview(&self, input: &TransactionInput) -> Evaluation {
        self.engine.explain(&normalize(input))
    }

    /// Score `input`, record it, and make it the current result.
    pub fn submit(&mut self, input: &TransactionInput) -> Vec<DeskEvent> {
        let evaluation = self.preview(input);
        let record = self.factory.create(input, evaluation.outcome, self.clock.now());

        log::debug!(
            "desk: record {} scored {:?}/{} via {:?}",
            record.id(),
            evaluation.outcome.status(),
            evaluation.outcome.score(),
            evaluation.matched,
        );

        let mut events = vec![DeskEvent::TransactionScored {
            record_id:      record.id().to_string(),
            timestamp:      record.timestamp(),
            status:         evaluation.outcome.status(),
            score:          evaluation.outcome.score(),
            recommendation: evaluation.outcome.recommendation(),
            matched:        evaluation.matched,
        }];

        self.current = Some(record.clone());
        if let Some(old) = self.history.append(record).evicted {
            events.push(DeskEvent::RecordEvicted { record_id: old.id().to_string() });
        }
        events
    }

    /// Drop the current result. History is untouched.
    pub fn reset(&mut self) -> Vec<DeskEvent> {
        self.current = None;
        vec![DeskEvent::ResultReset]
    }

    pub fn clear_history(&mut self) -> Vec<DeskEvent> {
        let removed = self.history.history().len();
        self.history.clear();
        vec![DeskEvent::HistoryCleared { removed }]
    }

    pub fn current_result(&self) -> Option<&ResultRecord> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &History {
        self.history.history()
    }

    pub fn find(&self, id: &str) -> Option<&ResultRecord> {
        self.history.find(id)
    }

    pub fn storage(&self) -> &S {
        self.history.storage()
    }
}

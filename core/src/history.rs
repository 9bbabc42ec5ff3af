//! Bounded history and the store that owns it.
//!
//! INVARIANTS (checked on every mutation):
//!   - 0 <= len <= HISTORY_LIMIT
//!   - newest first; relative order of surviving records never changes
//!   - every mutation writes the full snapshot through the storage
//!
//! LIFECYCLE:
//!   Empty → Populated          (append)
//!   Populated → Populated      (append; the oldest falls off past the limit)
//!   Populated | Empty → Empty  (clear)

use crate::{
    error::RiskResult,
    record::ResultRecord,
    snapshot,
    storage::SnapshotStorage,
};
use serde::Serialize;
use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 10;

/// Newest-first sequence of at most HISTORY_LIMIT records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    records: VecDeque<ResultRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records already ordered newest first. Anything past
    /// the limit is dropped.
    pub fn from_newest_first(records: impl IntoIterator<Item = ResultRecord>) -> Self {
        Self {
            records: records.into_iter().take(HISTORY_LIMIT).collect(),
        }
    }

    /// Put `record` in front. Returns the record pushed past the limit, if any.
    fn push_newest(&mut self, record: ResultRecord) -> Option<ResultRecord> {
        self.records.push_front(record);
        let evicted = if self.records.len() > HISTORY_LIMIT {
            self.records.pop_back()
        } else {
            None
        };
        debug_assert!(self.records.len() <= HISTORY_LIMIT);
        evicted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&ResultRecord> {
        self.records.front()
    }

    pub fn get(&self, index: usize) -> Option<&ResultRecord> {
        self.records.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&ResultRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<ResultRecord> {
        self.records.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a ResultRecord;
    type IntoIter = std::collections::vec_deque::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Read the persisted history. Absent or malformed data yields an empty
/// history; the failure is logged, never returned.
pub fn load<S: SnapshotStorage + ?Sized>(storage: &S) -> History {
    let Some(bytes) = storage.load() else {
        return History::new();
    };
    match snapshot::decode(&bytes) {
        Ok(history) => history,
        Err(e) => {
            log::warn!("history: discarding malformed snapshot: {e}");
            History::new()
        }
    }
}

/// Result of an append.
#[derive(Debug)]
pub struct Appended<'a> {
    pub history: &'a History,
    /// The oldest record, if the append pushed it out.
    pub evicted: Option<ResultRecord>,
}

/// Sole owner of the history. Single writer; every call runs to completion.
pub struct HistoryStore<S: SnapshotStorage> {
    history: History,
    storage: S,
}

impl<S: SnapshotStorage> HistoryStore<S> {
    /// Rehydrate from `storage`.
    pub fn open(storage: S) -> Self {
        let history = load(&storage);
        log::info!("history: restored {} record(s)", history.len());
        Self { history, storage }
    }

    /// Prepend `record`, truncate to the limit, write the full snapshot.
    pub fn append(&mut self, record: ResultRecord) -> Appended<'_> {
        let evicted = self.history.push_newest(record);
        if let Some(old) = &evicted {
            log::debug!("history: evicted record {}", old.id());
        }
        self.write_snapshot();
        Appended { history: &self.history, evicted }
    }

    /// Drop every record and remove the persisted snapshot.
    pub fn clear(&mut self) -> &History {
        let removed = self.history.len();
        self.history = History::new();
        if let Err(e) = self.storage.remove() {
            log::warn!("history: failed to remove snapshot: {e}");
        }
        log::info!("history: cleared {removed} record(s)");
        &self.history
    }

    /// Serialize the current history exactly as it is persisted.
    pub fn persist(&self) -> RiskResult<Vec<u8>> {
        snapshot::encode(&self.history)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn latest(&self) -> Option<&ResultRecord> {
        self.history.latest()
    }

    pub fn find(&self, id: &str) -> Option<&ResultRecord> {
        self.history.find(id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn write_snapshot(&self) {
        self.save_encoded(self.persist());
    }

    /// Save an encoded snapshot. On an encode error nothing is written, so
    /// the stored snapshot is left as it was.
    fn save_encoded(&self, encoded: RiskResult<Vec<u8>>) {
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("history: encode failed, snapshot not written: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.save(&bytes) {
            // In-memory history stays authoritative for this session.
            log::warn!("history: snapshot write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::RiskError,
        record::RecordFactory,
        rules::DEFAULT_OUTCOME,
        storage::MemoryStorage,
        types::TransactionInput,
    };

    fn records(n: usize) -> Vec<ResultRecord> {
        let mut factory = RecordFactory::new();
        (0..n)
            .map(|i| factory.create(&TransactionInput::default(), DEFAULT_OUTCOME, i as i64))
            .collect()
    }

    #[test]
    fn push_evicts_only_past_limit() {
        let mut history = History::new();
        for r in records(HISTORY_LIMIT) {
            assert!(history.push_newest(r).is_none());
        }
        let extra = records(HISTORY_LIMIT + 1).pop().unwrap();
        let evicted = history.push_newest(extra).unwrap();
        assert_eq!(evicted.id(), "0");
        assert_eq!(history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn clear_on_empty_is_harmless() {
        let mut store = HistoryStore::open(MemoryStorage::new());
        assert!(store.clear().is_empty());
        assert!(store.clear().is_empty());
        assert!(store.storage().load().is_none());
    }

    #[test]
    fn append_writes_whole_snapshot() {
        let mut store = HistoryStore::open(MemoryStorage::new());
        for r in records(3) {
            store.append(r);
        }
        assert_eq!(store.storage().write_count(), 3);
        let reloaded = load(store.storage());
        assert_eq!(&reloaded, store.history());
    }

    #[test]
    fn malformed_snapshot_loads_empty() {
        let mismatched = br#"[{"id":"1","timestamp":1,"status":"Legitimate","score":91,"recommendation":"Decline","formData":{}}]"#;
        for bytes in [&b"not json"[..], &b"{}"[..], &b"[{\"id\": 3}]"[..], &b""[..], &mismatched[..]] {
            let storage = MemoryStorage::with_bytes(bytes);
            assert!(load(&storage).is_empty());
        }
    }

    #[test]
    fn encode_failure_leaves_stored_snapshot_alone() {
        let storage = MemoryStorage::new();
        let mut store = HistoryStore::open(&storage);
        for r in records(2) {
            store.append(r);
        }
        let before = storage.bytes();
        let writes = storage.write_count();

        store.save_encoded(Err(RiskError::Other(anyhow::anyhow!("encoder broke"))));

        assert_eq!(storage.bytes(), before);
        assert_eq!(storage.write_count(), writes);
        assert_eq!(load(&storage).len(), 2);
    }

    #[test]
    fn find_by_id() {
        let mut store = HistoryStore::open(MemoryStorage::new());
        for r in records(4) {
            store.append(r);
        }
        assert_eq!(store.find("2").map(|r| r.timestamp()), Some(2));
        assert!(store.find("missing").is_none());
        assert_eq!(store.latest().map(|r| r.id()), Some("3"));
    }
}

//! History store tests: the bound, eviction order, clear, and round trip.

use riskdesk_core::{
    history::{self, HistoryStore, HISTORY_LIMIT},
    record::{RecordFactory, ResultRecord},
    rules::RuleEngine,
    normalizer::normalize,
    storage::{MemoryStorage, SnapshotStorage},
    types::{InputField, TransactionInput},
};

/// `n` records with ids "1000".."1000+n", oldest first.
fn make_records(n: usize) -> Vec<ResultRecord> {
    let engine = RuleEngine::default();
    let mut factory = RecordFactory::new();
    (0..n)
        .map(|i| {
            let input = TransactionInput::default()
                .with(InputField::CreditScore, (i * 7 % 101).to_string())
                .with(InputField::Income, (i * 500).to_string());
            let outcome = engine.evaluate(&normalize(&input));
            factory.create(&input, outcome, 1_000 + i as i64)
        })
        .collect()
}

fn ids(store: &HistoryStore<&MemoryStorage>) -> Vec<String> {
    store.history().iter().map(|r| r.id().to_string()).collect()
}

#[test]
fn history_never_exceeds_limit() {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::open(&storage);
    let records = make_records(25);

    for (n, r) in records.iter().cloned().enumerate() {
        let len = store.append(r).history.len();
        assert_eq!(len, (n + 1).min(HISTORY_LIMIT));
    }

    // The ten most recent, newest first.
    let expected: Vec<String> = records.iter().rev().take(HISTORY_LIMIT).map(|r| r.id().to_string()).collect();
    assert_eq!(ids(&store), expected);
}

#[test]
fn eleventh_append_evicts_exactly_the_oldest() {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::open(&storage);
    let records = make_records(11);

    for r in records.iter().take(10).cloned() {
        assert!(store.append(r).evicted.is_none());
    }
    let before = ids(&store);

    let evicted = store.append(records[10].clone()).evicted.expect("eviction");
    assert_eq!(evicted.id(), records[0].id());

    let after = ids(&store);
    assert_eq!(after[0], records[10].id());
    assert_eq!(&after[1..], &before[..9]);
}

#[test]
fn clear_empties_and_removes_snapshot() {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::open(&storage);
    for r in make_records(4) {
        store.append(r);
    }
    assert!(storage.load().is_some());

    assert!(store.clear().is_empty());
    assert!(storage.load().is_none());

    // Idempotent.
    assert!(store.clear().is_empty());
    assert!(store.history().is_empty());
}

#[test]
fn append_after_clear_starts_fresh() {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::open(&storage);
    let records = make_records(3);
    store.append(records[0].clone());
    store.append(records[1].clone());
    store.clear();
    store.append(records[2].clone());
    assert_eq!(ids(&store), vec![records[2].id().to_string()]);
}

#[test]
fn persist_then_load_round_trips_bounded_history() {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::open(&storage);
    let records = make_records(13);
    for r in records.iter().cloned() {
        store.append(r);
    }

    let snapshot = store.persist().expect("encode snapshot");
    let restored = history::load(&MemoryStorage::with_bytes(snapshot));
    let expected: Vec<ResultRecord> = records.into_iter().rev().take(HISTORY_LIMIT).collect();
    assert_eq!(restored.to_vec(), expected);
    assert_eq!(&restored, store.history());
}

#[test]
fn reopening_restores_previous_session() {
    let storage = MemoryStorage::new();
    let records = make_records(5);
    {
        let mut store = HistoryStore::open(&storage);
        for r in records.iter().cloned() {
            store.append(r);
        }
    }
    let store = HistoryStore::open(&storage);
    assert_eq!(store.history().len(), 5);
    assert_eq!(store.latest().map(|r| r.id()), Some(records[4].id()));
}

#[test]
fn corrupt_snapshot_opens_empty_and_recovers() {
    let storage = MemoryStorage::with_bytes("[{\"id\":");
    let mut store = HistoryStore::open(&storage);
    assert!(store.history().is_empty());

    store.append(make_records(1).remove(0));
    assert_eq!(history::load(&storage).len(), 1);
}

#[test]
fn stored_records_keep_submission_input() {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::open(&storage);
    let record = make_records(3).remove(2);
    let input = record.input_snapshot().clone();
    store.append(record);

    let restored = history::load(&storage);
    assert_eq!(restored.latest().map(|r| r.input_snapshot()), Some(&input));
}

//! Tests for log replay
//!
//! These tests verify:
//! - Replay of an empty log
//! - Last-write-wins index construction
//! - Replay statistics
//! - Fatal handling of a corrupt tail

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use kaido_store::config::SyncStrategy;
use kaido_store::index::Index;
use kaido_store::log::{append_record, encode, replay, Record};
use kaido_store::StoreError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("replay.db");
    (temp_dir, path)
}

fn open_rw(path: &PathBuf) -> File {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .unwrap()
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_empty_file() {
    let (_temp, path) = setup_temp_log();
    let file = open_rw(&path);
    let mut index = Index::new();

    let stats = replay(&file, &mut index).unwrap();

    assert!(index.is_empty());
    assert_eq!(stats.records_replayed, 0);
    assert_eq!(stats.live_keys, 0);
    assert_eq!(stats.bytes_scanned, 0);
}

#[test]
fn test_replay_indexes_every_key() {
    let (_temp, path) = setup_temp_log();
    let mut file = open_rw(&path);

    let mut expected = Vec::new();
    for i in 0..10 {
        let record = Record::with_timestamp(i, format!("key{}", i), format!("value{}", i));
        let offset = append_record(&mut file, &record, SyncStrategy::Never).unwrap();
        expected.push((record.key, offset));
    }

    let mut index = Index::new();
    let stats = replay(&file, &mut index).unwrap();

    assert_eq!(stats.records_replayed, 10);
    assert_eq!(stats.live_keys, 10);
    for (key, offset) in expected {
        assert_eq!(index.get(&key), Some(offset));
    }
}

#[test]
fn test_replay_last_write_wins() {
    let (_temp, path) = setup_temp_log();
    let mut file = open_rw(&path);

    append_record(&mut file, &Record::with_timestamp(1, "a", "1"), SyncStrategy::Never).unwrap();
    append_record(&mut file, &Record::with_timestamp(2, "b", "x"), SyncStrategy::Never).unwrap();
    append_record(&mut file, &Record::with_timestamp(3, "a", "2"), SyncStrategy::Never).unwrap();
    let last = append_record(&mut file, &Record::with_timestamp(4, "a", "3"), SyncStrategy::Never).unwrap();

    let mut index = Index::new();
    let stats = replay(&file, &mut index).unwrap();

    assert_eq!(index.get(b"a"), Some(last));
    assert_eq!(stats.records_replayed, 4);
    assert_eq!(stats.live_keys, 2);
    assert_eq!(stats.shadowed_records(), 2);
    assert_eq!(stats.bytes_scanned, file.metadata().unwrap().len());
}

#[test]
fn test_replay_corrupt_tail_is_fatal() {
    let (_temp, path) = setup_temp_log();
    {
        let mut file = File::create(&path).unwrap();
        file.write_all(&encode(&Record::with_timestamp(1, "good", "value")).unwrap()).unwrap();
        let partial = encode(&Record::with_timestamp(2, "partial", "lost")).unwrap();
        file.write_all(&partial[..partial.len() - 2]).unwrap();
    }
    let file = open_rw(&path);
    let mut index = Index::new();

    let err = replay(&file, &mut index).unwrap_err();

    assert!(matches!(err, StoreError::Corruption { .. }));
}

#[test]
fn test_append_returns_previous_end_of_file() {
    let (_temp, path) = setup_temp_log();
    let mut file = open_rw(&path);

    let first = Record::with_timestamp(1, "k1", "v1");
    let second = Record::with_timestamp(2, "k2", "v2");

    assert_eq!(append_record(&mut file, &first, SyncStrategy::EveryWrite).unwrap(), 0);
    assert_eq!(
        append_record(&mut file, &second, SyncStrategy::EveryWrite).unwrap(),
        first.encoded_len()
    );
}

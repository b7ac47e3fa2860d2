//! Durability tests for the Redb backend.

use std::time::Duration;

use sealbox_crypto::{Envelope, SymmetricKey, encrypt};
use sealbox_store::{
    ManualClock, MessageRecord, MessageStore, RedbStorage, Storage, StoreError,
};

fn sealed(plaintext: &str) -> Envelope {
    encrypt(plaintext, &SymmetricKey::from_bytes([7u8; 32])).expect("encrypt")
}

fn record() -> MessageRecord {
    MessageRecord {
        envelope: vec![0u8; 28],
        created_at_millis: 0,
        expires_at_millis: 1_000,
        view_count: 0,
        max_views: 1,
        is_active: true,
    }
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("messages.redb");
    let clock = ManualClock::new(1_000_000);
    let envelope = sealed("durable");

    let id = {
        let store = MessageStore::new(RedbStorage::open(&path).expect("open"), clock.clone());
        store.create(&envelope, Duration::from_secs(60), 2).expect("create")
    };

    // Reopen the database, as after a process restart.
    let store = MessageStore::new(RedbStorage::open(&path).expect("reopen"), clock);
    let retrieved = store.retrieve(id).expect("retrieve after reopen");

    assert_eq!(retrieved, envelope);
}

#[test]
fn consumed_state_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("messages.redb");
    let clock = ManualClock::new(1_000_000);

    let id = {
        let store = MessageStore::new(RedbStorage::open(&path).expect("open"), clock.clone());
        let id = store.create(&sealed("once"), Duration::from_secs(60), 1).expect("create");
        store.retrieve(id).expect("consume the single view");
        id
    };

    let store = MessageStore::new(RedbStorage::open(&path).expect("reopen"), clock);

    assert_eq!(store.retrieve(id), Err(StoreError::NotFound), "consumed stays consumed");
}

#[test]
fn version_cas_rejects_stale_writers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = RedbStorage::open(dir.path().join("cas.redb")).expect("open");
    let id = sealbox_store::MessageId::from_bytes([9; 16]);

    storage.insert(id, &record()).expect("insert");

    assert!(storage.update(id, 0, &record()).expect("cas"));
    assert!(!storage.update(id, 0, &record()).expect("cas"), "stale version must lose");

    let versioned = storage.load(id).expect("load").expect("exists");
    assert_eq!(versioned.version, 1);
}

#[test]
fn active_ids_reflects_deactivation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = RedbStorage::open(dir.path().join("scan.redb")).expect("open");
    let id = sealbox_store::MessageId::from_bytes([4; 16]);

    storage.insert(id, &record()).expect("insert");
    assert_eq!(storage.active_ids().expect("scan"), vec![id]);

    let mut dead = record();
    dead.is_active = false;
    assert!(storage.update(id, 0, &dead).expect("cas"));

    assert!(storage.active_ids().expect("scan").is_empty());
}

#[test]
fn sweep_works_against_redb() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = ManualClock::new(1_000_000);
    let store = MessageStore::new(
        RedbStorage::open(dir.path().join("sweep.redb")).expect("open"),
        clock.clone(),
    );

    store.create(&sealed("a"), Duration::from_secs(1), 5).expect("create");
    store.create(&sealed("b"), Duration::from_secs(120), 5).expect("create");
    clock.advance(2_000);

    assert_eq!(store.sweep_expired().expect("sweep"), 1);
    assert_eq!(store.sweep_expired().expect("sweep again"), 0);
}

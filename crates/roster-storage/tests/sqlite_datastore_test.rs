use proptest::prelude::*;

use roster_core::config::{StorageBackend, StorageConfig};
use roster_core::constants::SCHEMA_VERSION;
use roster_core::errors::DatastoreError;
use roster_core::models::{EntryFilter, RosterItem, Subscription};
use roster_core::traits::IRosterDatastore;
use roster_storage::pool::pragmas::verify_wal_mode;
use roster_storage::{migrations, open_datastore, SqliteDatastore};
use test_fixtures::{check_datastore_contract, jid};

#[test]
fn sqlite_datastore_honours_contract() {
    check_datastore_contract(&SqliteDatastore::open_in_memory().unwrap());
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let owner = jid("owner@example.com");
    let contact = jid("friend@example.com");

    {
        let ds = SqliteDatastore::open(&path).unwrap();
        assert!(ds.writer().with_conn_sync(verify_wal_mode).unwrap());
        let item = RosterItem::new(&contact)
            .with_group("family")
            .with_subscription(Subscription::From);
        ds.save(&owner, &item).unwrap();
    }

    let ds = SqliteDatastore::open(&path).unwrap();
    assert_eq!(ds.entries(None, &EntryFilter::all()).unwrap(), vec![owner.clone()]);
    let item = ds.load(&owner, &contact).unwrap().unwrap();
    assert_eq!(item.subscription, Subscription::From);
    assert!(item.groups.contains("family"));
}

#[test]
fn migrations_are_idempotent() {
    let ds = SqliteDatastore::open_in_memory().unwrap();
    assert_eq!(ds.schema_version().unwrap(), SCHEMA_VERSION);
    let again = ds.writer().with_conn_sync(migrations::run_migrations).unwrap();
    assert_eq!(again, SCHEMA_VERSION);
    assert_eq!(ds.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn corrupt_subscription_is_reported() {
    let ds = SqliteDatastore::open_in_memory().unwrap();
    ds.writer()
        .with_conn_sync(|conn| {
            conn.execute(
                "INSERT INTO roster_items (owner, jid, subscription, updated_at)
                 VALUES ('o@example.com', 'c@example.com', 'sideways', '2024-01-01T00:00:00Z')",
                [],
            )
            .map_err(|e| DatastoreError::Query {
                message: e.to_string(),
            })?;
            Ok(())
        })
        .unwrap();

    let err = ds
        .load(&jid("o@example.com"), &jid("c@example.com"))
        .unwrap_err();
    assert!(matches!(err, DatastoreError::Corrupt { .. }), "got {err:?}");
}

#[test]
fn open_datastore_follows_config() {
    assert!(open_datastore(&StorageConfig::default()).unwrap().is_none());

    let memory = StorageConfig {
        backend: StorageBackend::Memory,
        path: None,
    };
    assert!(open_datastore(&memory).unwrap().is_some());

    let dir = tempfile::tempdir().unwrap();
    let sqlite = StorageConfig {
        backend: StorageBackend::Sqlite,
        path: Some(dir.path().join("cfg.db")),
    };
    let ds = open_datastore(&sqlite).unwrap().unwrap();
    ds.save(&jid("a@b.c"), &RosterItem::new(&jid("d@e.f"))).unwrap();
    assert!(dir.path().join("cfg.db").exists());
}

proptest! {
    #[test]
    fn prop_saved_items_load_back(
        name in proptest::option::of("[A-Za-z ]{1,20}"),
        groups in proptest::collection::btree_set("[a-z]{1,8}", 0..4),
        sub_idx in 0usize..4,
        whitelisted in any::<bool>(),
    ) {
        let ds = SqliteDatastore::open_in_memory().unwrap();
        let owner = jid("owner@example.com");
        let mut item = RosterItem::new(&jid("contact@example.com"))
            .with_subscription(Subscription::ALL[sub_idx]);
        item.name = name;
        item.groups = groups;
        item.whitelisted = whitelisted;

        ds.save(&owner, &item).unwrap();
        let loaded = ds.load(&owner, &item.jid).unwrap().unwrap();

        prop_assert_eq!(loaded.name, item.name);
        prop_assert_eq!(loaded.groups, item.groups);
        prop_assert_eq!(loaded.subscription, item.subscription);
        prop_assert_eq!(loaded.whitelisted, item.whitelisted);
        prop_assert_eq!(loaded.updated_at, item.updated_at);
    }
}

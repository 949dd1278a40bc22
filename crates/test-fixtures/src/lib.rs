//! Shared test doubles for the roster workspace.
//!
//! - [`RecordingNode`]: an `IRosterNode` that records every call the
//!   collection makes on it.
//! - [`ScriptedDatastore`]: a datastore with a fixed owner list that can be
//!   switched into a failing mode.
//! - [`check_datastore_contract`]: behaviour every datastore adapter must share.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use roster_core::errors::{DatastoreError, DatastoreResult, RosterError, RosterResult};
use roster_core::models::{EntryFilter, RosterItem, Subscription};
use roster_core::traits::{IRosterDatastore, IRosterNode, SharedDatastore};
use roster_core::Jid;

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
/// Honors `RUST_LOG`, defaulting to `debug` for roster crates.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("roster=debug,warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Parse a JID, panicking on malformed test input.
pub fn jid(s: &str) -> Jid {
    Jid::parse(s).unwrap_or_else(|e| panic!("bad test jid {s:?}: {e}"))
}

/// Stand-in for the connection or component owning a collection.
#[derive(Debug, Default)]
pub struct TestConnection {
    pub name: String,
}

impl TestConnection {
    pub fn shared(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

/// A node that only records what was done to it.
///
/// Its own flag defaults are `false`, the opposite of a collection's, so
/// tests can tell forced flags from untouched ones.
pub struct RecordingNode {
    pub connection: Arc<TestConnection>,
    pub jid: Jid,
    pub datastore: Option<SharedDatastore>,
    pub auto_authorize: bool,
    pub auto_subscribe: bool,
    pub authorize_sets: usize,
    pub subscribe_sets: usize,
    pub reset_calls: usize,
    pub backend_history: Vec<Option<SharedDatastore>>,
    /// When set, `set_backend` fails and leaves the node untouched.
    pub fail_set_backend: bool,
}

impl RecordingNode {
    /// Number of `set_backend` calls that received exactly `datastore`.
    pub fn backend_calls_with(&self, datastore: &SharedDatastore) -> usize {
        self.backend_history
            .iter()
            .filter(|d| d.as_ref().is_some_and(|d| Arc::ptr_eq(d, datastore)))
            .count()
    }

    pub fn is_bound_to(&self, datastore: &SharedDatastore) -> bool {
        self.datastore
            .as_ref()
            .is_some_and(|d| Arc::ptr_eq(d, datastore))
    }
}

impl IRosterNode for RecordingNode {
    type Connection = TestConnection;

    fn new(
        connection: Arc<TestConnection>,
        jid: Jid,
        datastore: Option<SharedDatastore>,
    ) -> RosterResult<Self> {
        Ok(Self {
            connection,
            jid,
            datastore,
            auto_authorize: false,
            auto_subscribe: false,
            authorize_sets: 0,
            subscribe_sets: 0,
            reset_calls: 0,
            backend_history: Vec::new(),
            fail_set_backend: false,
        })
    }

    fn jid(&self) -> &Jid {
        &self.jid
    }

    fn reset(&mut self) {
        self.reset_calls += 1;
    }

    fn set_backend(&mut self, datastore: Option<SharedDatastore>) -> RosterResult<()> {
        if self.fail_set_backend {
            return Err(RosterError::datastore(
                "rebind roster node",
                DatastoreError::Unreachable {
                    reason: format!("scripted rebind failure for {}", self.jid),
                },
            ));
        }
        self.backend_history.push(datastore.clone());
        self.datastore = datastore;
        Ok(())
    }

    fn auto_authorize(&self) -> bool {
        self.auto_authorize
    }

    fn set_auto_authorize(&mut self, value: bool) {
        self.authorize_sets += 1;
        self.auto_authorize = value;
    }

    fn auto_subscribe(&self) -> bool {
        self.auto_subscribe
    }

    fn set_auto_subscribe(&mut self, value: bool) {
        self.subscribe_sets += 1;
        self.auto_subscribe = value;
    }
}

/// A datastore reporting a fixed set of owners from `entries(None, _)`.
///
/// Items saved through it are kept in memory so nodes can round-trip them.
#[derive(Default)]
pub struct ScriptedDatastore {
    owners: Mutex<Vec<Jid>>,
    items: Mutex<HashMap<Jid, BTreeMap<Jid, RosterItem>>>,
    failing: AtomicBool,
    entries_calls: AtomicUsize,
}

impl ScriptedDatastore {
    pub fn with_owners(owners: &[&str]) -> Self {
        Self {
            owners: Mutex::new(owners.iter().map(|o| jid(o)).collect()),
            ..Self::default()
        }
    }

    /// A datastore whose every call fails with `DatastoreError::Unreachable`.
    pub fn failing() -> Self {
        let ds = Self::default();
        ds.set_failing(true);
        ds
    }

    pub fn shared(owners: &[&str]) -> Arc<Self> {
        Arc::new(Self::with_owners(owners))
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_owners(&self, owners: &[&str]) {
        let mut guard = self.owners.lock().unwrap_or_else(|e| e.into_inner());
        *guard = owners.iter().map(|o| jid(o)).collect();
    }

    /// How many times `entries` has been called.
    pub fn entries_calls(&self) -> usize {
        self.entries_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> DatastoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatastoreError::Unreachable {
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

impl IRosterDatastore for ScriptedDatastore {
    fn entries(&self, owner: Option<&Jid>, filter: &EntryFilter) -> DatastoreResult<Vec<Jid>> {
        self.entries_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        match owner {
            None => Ok(self
                .owners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()),
            Some(owner) => Ok(self
                .items
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(&owner.bare())
                .map(|items| {
                    items
                        .values()
                        .filter(|i| filter.matches(i))
                        .map(|i| i.jid.clone())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()),
        }
    }

    fn load(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<Option<RosterItem>> {
        self.check()?;
        Ok(self
            .items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&owner.bare())
            .and_then(|items| items.get(&contact.bare()).cloned()))
    }

    fn save(&self, owner: &Jid, item: &RosterItem) -> DatastoreResult<()> {
        self.check()?;
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(owner.bare())
            .or_default()
            .insert(item.jid.bare(), item.clone());
        Ok(())
    }

    fn remove(&self, owner: &Jid, contact: &Jid) -> DatastoreResult<bool> {
        self.check()?;
        Ok(self
            .items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&owner.bare())
            .is_some_and(|items| items.remove(&contact.bare()).is_some()))
    }
}

/// Behaviour every `IRosterDatastore` adapter must share. Expects an empty store.
pub fn check_datastore_contract(ds: &dyn IRosterDatastore) {
    let alice = jid("alice@example.com");
    let bob = jid("bob@example.com");
    let carol = jid("carol@example.net");

    assert!(ds.entries(None, &EntryFilter::all()).unwrap().is_empty());
    assert!(ds.load(&alice, &carol).unwrap().is_none());

    let friend = RosterItem::new(&carol)
        .with_name("Carol")
        .with_group("friends")
        .with_subscription(Subscription::Both);
    ds.save(&alice, &friend).unwrap();
    ds.save(&alice, &RosterItem::new(&bob)).unwrap();
    ds.save(&bob, &RosterItem::new(&alice).with_subscription(Subscription::To))
        .unwrap();

    // Full-form identities resolve to the same rows.
    let loaded = ds
        .load(&jid("alice@example.com/phone"), &jid("carol@example.net/desk"))
        .unwrap()
        .expect("saved item should load");
    assert_eq!(loaded.name.as_deref(), Some("Carol"));
    assert_eq!(loaded.subscription, Subscription::Both);
    assert!(loaded.groups.contains("friends"));

    let mut owners = ds.entries(None, &EntryFilter::all()).unwrap();
    owners.sort();
    assert_eq!(owners, vec![alice.clone(), bob.clone()]);

    let both = EntryFilter::all().with_subscription(Subscription::Both);
    assert_eq!(ds.entries(None, &both).unwrap(), vec![alice.clone()]);

    let mut contacts = ds.entries(Some(&alice), &EntryFilter::all()).unwrap();
    contacts.sort();
    assert_eq!(contacts, vec![bob.clone(), carol.clone()]);
    assert_eq!(
        ds.entries(Some(&alice), &EntryFilter::all().with_group("friends"))
            .unwrap(),
        vec![carol.clone()]
    );

    // Save replaces.
    ds.save(&alice, &friend.clone().with_name("C.")).unwrap();
    let replaced = ds.load(&alice, &carol).unwrap().unwrap();
    assert_eq!(replaced.name.as_deref(), Some("C."));
    assert_eq!(ds.entries(Some(&alice), &EntryFilter::all()).unwrap().len(), 2);

    assert!(ds.remove(&alice, &carol).unwrap());
    assert!(!ds.remove(&alice, &carol).unwrap());
    assert!(ds.load(&alice, &carol).unwrap().is_none());

    assert!(ds.remove(&bob, &alice).unwrap());
    assert_eq!(ds.entries(None, &EntryFilter::all()).unwrap(), vec![alice]);
}

//! Persisted stores
//!
//! A [`PersistedStore`] wraps a reducer store and writes the full state
//! through a [`Persistence`] adapter after every mutation. On open, the
//! adapter is asked for previously saved state; if there is none (or it
//! cannot be read) the store starts from `S::default()`.
//!
//! Storage is split in two layers:
//!
//! - [`StorageBackend`]: string key/value storage (files on disk, memory).
//! - [`Persistence`]: typed `load()`/`save()` of one state value.
//!   [`JsonPersistence`] implements it on top of any backend by storing the
//!   state as JSON under a fixed key.
//!
//! # Example
//!
//! ```ignore
//! use ui_dispatch::persist::{FileStorage, JsonPersistence, PersistedStore};
//!
//! let backend = FileStorage::new("/tmp/app-state");
//! let mut store = PersistedStore::open(reducer, JsonPersistence::new("prefs", backend));
//!
//! // Written to /tmp/app-state/prefs.json before dispatch returns
//! store.dispatch(PrefsAction::DarkModeToggle)?;
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::action::Action;
use crate::store::{Middleware, NoopMiddleware, Reducer, StoreWithMiddleware};

/// Errors raised while reading or writing persisted state
#[derive(Debug)]
pub enum PersistError {
    /// The storage medium failed
    Io(io::Error),
    /// The state could not be encoded, or stored data could not be decoded
    Serialize(serde_json::Error),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "Storage error: {}", e),
            PersistError::Serialize(e) => write!(f, "State serialization error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Serialize(e)
    }
}

// ============================================================================
// Storage backends
// ============================================================================

/// Durable string key/value storage
pub trait StorageBackend {
    /// Read the value stored under `key`, or `None` if there is none.
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> io::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the platform's local data directory
    /// (e.g. `~/.local/share/ui-dispatch` on Linux), falling back to `./ui-dispatch`.
    pub fn default_location() -> Self {
        Self::new(default_storage_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

/// Platform data directory used by [`FileStorage::default_location`]
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ui-dispatch")
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn remove_item(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process storage. Clones share the same map, so a clone handed to a
/// second store observes everything the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> io::Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// ============================================================================
// Typed persistence
// ============================================================================

/// Typed load/save of a single state value
pub trait Persistence<S> {
    /// Load previously saved state. `Ok(None)` means nothing was saved yet.
    fn load(&self) -> Result<Option<S>, PersistError>;

    /// Save the full state, replacing what was stored before.
    fn save(&mut self, state: &S) -> Result<(), PersistError>;
}

/// Stores state as JSON under a fixed key of a [`StorageBackend`]
#[derive(Debug, Clone)]
pub struct JsonPersistence<B> {
    key: String,
    backend: B,
}

impl<B: StorageBackend> JsonPersistence<B> {
    pub fn new(key: impl Into<String>, backend: B) -> Self {
        Self {
            key: key.into(),
            backend,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Remove the stored entry
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.backend.remove_item(&self.key)?;
        Ok(())
    }
}

impl<S, B> Persistence<S> for JsonPersistence<B>
where
    S: Serialize + DeserializeOwned,
    B: StorageBackend,
{
    fn load(&self) -> Result<Option<S>, PersistError> {
        match self.backend.get_item(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &S) -> Result<(), PersistError> {
        let raw = serde_json::to_string(state)?;
        self.backend.set_item(&self.key, &raw)?;
        Ok(())
    }
}

// ============================================================================
// Persisted store
// ============================================================================

/// A reducer store whose state is written through `P` after every mutation
///
/// Reads are plain in-memory borrows. Writes (`dispatch` that reports a
/// change, `update`, `reset`) save the full state before returning. If the
/// save fails the in-memory state keeps the mutation and the error is
/// returned to the caller.
///
/// Single-writer: the store is mutated through `&mut self` only.
pub struct PersistedStore<S, A, P, M = NoopMiddleware>
where
    A: Action,
    M: Middleware<A>,
{
    store: StoreWithMiddleware<S, A, M>,
    persistence: P,
}

impl<S, A, P> PersistedStore<S, A, P, NoopMiddleware>
where
    S: Default,
    A: Action,
    P: Persistence<S>,
{
    /// Open a store, restoring any saved state
    pub fn open(reducer: Reducer<S, A>, persistence: P) -> Self {
        Self::open_with_middleware(reducer, persistence, NoopMiddleware)
    }
}

impl<S, A, P, M> PersistedStore<S, A, P, M>
where
    S: Default,
    A: Action,
    P: Persistence<S>,
    M: Middleware<A>,
{
    /// Open a store with middleware, restoring any saved state
    ///
    /// Unreadable or corrupt saved state is logged and replaced by defaults;
    /// it is overwritten on the next mutation.
    pub fn open_with_middleware(reducer: Reducer<S, A>, persistence: P, middleware: M) -> Self {
        let state = match persistence.load() {
            Ok(Some(state)) => {
                tracing::debug!("Restored persisted state");
                state
            }
            Ok(None) => S::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted state");
                S::default()
            }
        };

        Self {
            store: StoreWithMiddleware::new(state, reducer, middleware),
            persistence,
        }
    }

    /// Dispatch an action, saving the state if the reducer changed it
    ///
    /// Returns whether the state changed.
    pub fn dispatch(&mut self, action: A) -> Result<bool, PersistError> {
        let changed = self.store.dispatch(action);
        if changed {
            self.flush()?;
        }
        Ok(changed)
    }

    /// Mutate the state directly and save it
    pub fn update<F>(&mut self, f: F) -> Result<(), PersistError>
    where
        F: FnOnce(&mut S),
    {
        f(self.store.state_mut());
        self.flush()
    }

    /// Restore the default state and save it
    pub fn reset(&mut self) -> Result<(), PersistError> {
        self.update(|state| *state = S::default())
    }

    /// Save the current state now
    pub fn flush(&mut self) -> Result<(), PersistError> {
        self.persistence.save(self.store.state())
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn middleware(&self) -> &M {
        self.store.middleware()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: i32,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Increment,
        Set(i32),
    }

    impl Action for CounterAction {
        fn name(&self) -> &'static str {
            match self {
                CounterAction::Increment => "Increment",
                CounterAction::Set(_) => "Set",
            }
        }
    }

    fn reducer(state: &mut Counter, action: CounterAction) -> bool {
        match action {
            CounterAction::Increment => {
                state.value += 1;
                true
            }
            CounterAction::Set(value) => {
                let changed = state.value != value;
                state.value = value;
                changed
            }
        }
    }

    /// Counts saves so tests can check when the store writes
    #[derive(Default)]
    struct CountingPersistence {
        saved: Option<Counter>,
        saves: usize,
    }

    impl Persistence<Counter> for CountingPersistence {
        fn load(&self) -> Result<Option<Counter>, PersistError> {
            Ok(self.saved.clone())
        }

        fn save(&mut self, state: &Counter) -> Result<(), PersistError> {
            self.saves += 1;
            self.saved = Some(state.clone());
            Ok(())
        }
    }

    #[test]
    fn test_open_without_saved_state_uses_default() {
        let store = PersistedStore::open(reducer, CountingPersistence::default());
        assert_eq!(store.state(), &Counter::default());
        assert_eq!(store.persistence().saves, 0);
    }

    #[test]
    fn test_dispatch_saves_only_on_change() {
        let mut store = PersistedStore::open(reducer, CountingPersistence::default());

        assert!(store.dispatch(CounterAction::Set(3)).unwrap());
        assert!(!store.dispatch(CounterAction::Set(3)).unwrap());
        assert!(store.dispatch(CounterAction::Increment).unwrap());

        assert_eq!(store.persistence().saves, 2);
        assert_eq!(store.persistence().saved, Some(Counter { value: 4 }));
    }

    #[test]
    fn test_update_and_reset_always_save() {
        let mut store = PersistedStore::open(reducer, CountingPersistence::default());

        store.update(|s| s.value = 10).unwrap();
        assert_eq!(store.persistence().saved, Some(Counter { value: 10 }));

        store.reset().unwrap();
        assert_eq!(store.state(), &Counter::default());
        assert_eq!(store.persistence().saved, Some(Counter::default()));
        assert_eq!(store.persistence().saves, 2);
    }

    #[test]
    fn test_memory_storage_survives_reopen() {
        let storage = MemoryStorage::new();

        {
            let mut store =
                PersistedStore::open(reducer, JsonPersistence::new("counter", storage.clone()));
            store.dispatch(CounterAction::Set(7)).unwrap();
        }

        let store = PersistedStore::open(reducer, JsonPersistence::new("counter", storage));
        assert_eq!(store.state().value, 7);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_default() {
        let mut storage = MemoryStorage::new();
        storage.set_item("counter", "{not json").unwrap();

        let mut store =
            PersistedStore::open(reducer, JsonPersistence::new("counter", storage.clone()));
        assert_eq!(store.state(), &Counter::default());

        // Next write replaces the corrupt entry
        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(
            storage.get_item("counter").unwrap().as_deref(),
            Some(r#"{"value":1}"#)
        );
    }

    #[test]
    fn test_json_persistence_clear() {
        let storage = MemoryStorage::new();
        let mut persistence = JsonPersistence::new("counter", storage.clone());

        Persistence::<Counter>::save(&mut persistence, &Counter { value: 2 }).unwrap();
        assert_eq!(storage.len(), 1);

        persistence.clear().unwrap();
        assert!(storage.is_empty());
        let loaded = Persistence::<Counter>::load(&persistence).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("menu").unwrap(), None);

        storage.set_item("menu", "{\"a\":1}").unwrap();
        assert!(storage.path_for("menu").exists());
        assert_eq!(
            storage.get_item("menu").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove_item("menu").unwrap();
        assert_eq!(storage.get_item("menu").unwrap(), None);
        // Removing twice is fine
        storage.remove_item("menu").unwrap();
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let backend = FileStorage::new(dir.path());
            let mut store = PersistedStore::open(reducer, JsonPersistence::new("counter", backend));
            store.dispatch(CounterAction::Set(42)).unwrap();
        }

        let backend = FileStorage::new(dir.path());
        let store = PersistedStore::open(reducer, JsonPersistence::new("counter", backend));
        assert_eq!(store.state().value, 42);
    }

    #[test]
    fn test_save_error_is_returned() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A regular file where the storage directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "x").unwrap();

        let backend = FileStorage::new(&blocker);
        let mut store = PersistedStore::open(reducer, JsonPersistence::new("counter", backend));

        let err = store.dispatch(CounterAction::Increment).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
        // In-memory mutation is kept
        assert_eq!(store.state().value, 1);
    }
}

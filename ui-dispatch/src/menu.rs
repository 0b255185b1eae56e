//! Persisted menu UI state
//!
//! Two flags shared by the menu views, kept in a [`PersistedStore`] stored
//! under the key [`MENU_STORE_ID`]:
//!
//! - `isBigData`: whether the big-data views are enabled
//! - `forceActiveKey`: menu key to force as active (empty = none)
//!
//! ```
//! use ui_dispatch::menu::{open_menu_store, MenuAction};
//! use ui_dispatch::persist::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let mut store = open_menu_store(storage.clone());
//! store.dispatch(MenuAction::SetBigData(true)).unwrap();
//!
//! // A second store on the same storage sees the saved state
//! let reopened = open_menu_store(storage);
//! assert!(reopened.is_big_data());
//! ```

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionSummary};
use crate::persist::{JsonPersistence, PersistError, PersistedStore, StorageBackend};
use crate::store::{Middleware, NoopMiddleware};

/// Storage key of the menu store
pub const MENU_STORE_ID: &str = "menu";

/// Menu UI flags
///
/// Missing fields in stored data fall back to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuState {
    pub is_big_data: bool,
    pub force_active_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    SetBigData(bool),
    ToggleBigData,
    SetForceActiveKey(String),
    ClearForceActiveKey,
}

impl Action for MenuAction {
    fn name(&self) -> &'static str {
        match self {
            MenuAction::SetBigData(_) => "SetBigData",
            MenuAction::ToggleBigData => "ToggleBigData",
            MenuAction::SetForceActiveKey(_) => "SetForceActiveKey",
            MenuAction::ClearForceActiveKey => "ClearForceActiveKey",
        }
    }
}

impl ActionSummary for MenuAction {}

/// Returns `true` only when a field actually changed, so no-op dispatches
/// don't touch storage.
pub fn menu_reducer(state: &mut MenuState, action: MenuAction) -> bool {
    match action {
        MenuAction::SetBigData(value) => {
            let changed = state.is_big_data != value;
            state.is_big_data = value;
            changed
        }
        MenuAction::ToggleBigData => {
            state.is_big_data = !state.is_big_data;
            true
        }
        MenuAction::SetForceActiveKey(key) => {
            if state.force_active_key == key {
                false
            } else {
                state.force_active_key = key;
                true
            }
        }
        MenuAction::ClearForceActiveKey => {
            let changed = !state.force_active_key.is_empty();
            state.force_active_key.clear();
            changed
        }
    }
}

/// The persisted menu store over storage backend `B`
pub type MenuStore<B, M = NoopMiddleware> =
    PersistedStore<MenuState, MenuAction, JsonPersistence<B>, M>;

/// Open the menu store, restoring saved state from `backend` if present
pub fn open_menu_store<B: StorageBackend>(backend: B) -> MenuStore<B> {
    PersistedStore::open(menu_reducer, JsonPersistence::new(MENU_STORE_ID, backend))
}

/// Open the menu store with middleware attached
pub fn open_menu_store_with<B, M>(backend: B, middleware: M) -> MenuStore<B, M>
where
    B: StorageBackend,
    M: Middleware<MenuAction>,
{
    PersistedStore::open_with_middleware(
        menu_reducer,
        JsonPersistence::new(MENU_STORE_ID, backend),
        middleware,
    )
}

impl<B, M> PersistedStore<MenuState, MenuAction, JsonPersistence<B>, M>
where
    B: StorageBackend,
    M: Middleware<MenuAction>,
{
    pub fn is_big_data(&self) -> bool {
        self.state().is_big_data
    }

    pub fn force_active_key(&self) -> &str {
        &self.state().force_active_key
    }

    /// The forced active key, or `None` when unset
    pub fn active_key(&self) -> Option<&str> {
        Some(self.force_active_key()).filter(|key| !key.is_empty())
    }

    pub fn set_big_data(&mut self, value: bool) -> Result<bool, PersistError> {
        self.dispatch(MenuAction::SetBigData(value))
    }

    pub fn toggle_big_data(&mut self) -> Result<bool, PersistError> {
        self.dispatch(MenuAction::ToggleBigData)
    }

    pub fn set_force_active_key(&mut self, key: impl Into<String>) -> Result<bool, PersistError> {
        self.dispatch(MenuAction::SetForceActiveKey(key.into()))
    }

    pub fn clear_force_active_key(&mut self) -> Result<bool, PersistError> {
        self.dispatch(MenuAction::ClearForceActiveKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{FileStorage, MemoryStorage};
    use crate::store::LoggingMiddleware;

    #[test]
    fn test_default_state_on_first_open() {
        let store = open_menu_store(MemoryStorage::new());

        assert_eq!(
            store.state(),
            &MenuState {
                is_big_data: false,
                force_active_key: String::new(),
            }
        );
        assert_eq!(store.active_key(), None);
    }

    #[test]
    fn test_state_survives_restart() {
        let storage = MemoryStorage::new();

        {
            let mut store = open_menu_store(storage.clone());
            store.set_big_data(true).unwrap();
            store.set_force_active_key("abc").unwrap();
        }

        let store = open_menu_store(storage);
        assert!(store.is_big_data());
        assert_eq!(store.force_active_key(), "abc");
        assert_eq!(store.active_key(), Some("abc"));
    }

    #[test]
    fn test_state_survives_restart_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let mut store = open_menu_store(FileStorage::new(dir.path()));
            store.set_big_data(true).unwrap();
            store.set_force_active_key("abc").unwrap();
        }

        let raw = std::fs::read_to_string(dir.path().join("menu.json")).unwrap();
        assert_eq!(raw, r#"{"isBigData":true,"forceActiveKey":"abc"}"#);

        let store = open_menu_store(FileStorage::new(dir.path()));
        assert!(store.is_big_data());
        assert_eq!(store.force_active_key(), "abc");
    }

    #[test]
    fn test_stored_under_menu_key() {
        let storage = MemoryStorage::new();
        let mut store = open_menu_store(storage.clone());
        store.toggle_big_data().unwrap();

        assert_eq!(store.persistence().key(), MENU_STORE_ID);
        assert_eq!(
            storage.get_item("menu").unwrap().as_deref(),
            Some(r#"{"isBigData":true,"forceActiveKey":""}"#)
        );
    }

    #[test]
    fn test_partial_stored_state_keeps_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("menu", r#"{"forceActiveKey":"reports","legacy":1}"#)
            .unwrap();

        let store = open_menu_store(storage);
        assert!(!store.is_big_data());
        assert_eq!(store.force_active_key(), "reports");
    }

    #[test]
    fn test_reducer_reports_changes() {
        let mut state = MenuState::default();

        assert!(!menu_reducer(&mut state, MenuAction::SetBigData(false)));
        assert!(menu_reducer(&mut state, MenuAction::SetBigData(true)));
        assert!(menu_reducer(&mut state, MenuAction::ToggleBigData));
        assert!(!state.is_big_data);

        assert!(!menu_reducer(&mut state, MenuAction::ClearForceActiveKey));
        assert!(menu_reducer(
            &mut state,
            MenuAction::SetForceActiveKey("k".into())
        ));
        assert!(!menu_reducer(
            &mut state,
            MenuAction::SetForceActiveKey("k".into())
        ));
        assert!(menu_reducer(&mut state, MenuAction::ClearForceActiveKey));
        assert_eq!(state.force_active_key, "");
    }

    #[test]
    fn test_reset_writes_defaults() {
        let storage = MemoryStorage::new();
        let mut store = open_menu_store_with(storage.clone(), LoggingMiddleware::new());
        store.set_force_active_key("abc").unwrap();

        store.reset().unwrap();

        let reopened = open_menu_store(storage);
        assert_eq!(reopened.state(), &MenuState::default());
    }
}

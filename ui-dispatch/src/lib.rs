//! ui-dispatch: typed JSON fetching and persisted UI state
//!
//! Two independent building blocks for UI front-ends:
//!
//! - **Fetch**: [`FetchClient`] wraps an HTTP request, rejects non-2xx
//!   responses, and decodes the JSON body into a typed value. It can inject
//!   a fixed delay before each request to simulate latency.
//! - **Persisted stores**: [`PersistedStore`] is a Redux-style reducer store
//!   that writes its full state through a [`Persistence`] adapter after every
//!   mutation and restores it on open. [`menu`] builds the `menu` UI store on
//!   top of it.
//!
//! # Basic Example
//!
//! ```ignore
//! use ui_dispatch::prelude::*;
//!
//! let mut menu = open_menu_store(FileStorage::default_location());
//! menu.set_force_active_key("reports")?;
//!
//! let client = FetchClient::simulated();
//! let tree: Vec<MenuNode> = client.fetch("https://example.com/menu.json", None).await?;
//! ```
//!
//! # Async Handler Pattern
//!
//! Stores stay synchronous. Fetches run as async tasks and report back as
//! result actions, using the `Did*` naming convention for results:
//!
//! ```ignore
//! enum Action {
//!     MenuFetch,
//!     MenuDidLoad(Vec<MenuNode>),
//!     MenuDidError(String),
//! }
//!
//! tokio::spawn(async move {
//!     let action = match client.fetch::<Vec<MenuNode>>(&url, None).await {
//!         Ok(tree) => Action::MenuDidLoad(tree),
//!         Err(e) => Action::MenuDidError(e.to_string()),
//!     };
//!     let _ = tx.send(action);
//! });
//! ```

pub mod action;
pub mod fetch;
pub mod menu;
pub mod persist;
pub mod store;
pub mod types;

pub use action::{Action, ActionSummary};

// Store exports
pub use store::{LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store, StoreWithMiddleware};

// Persistence exports
pub use persist::{
    FileStorage, JsonPersistence, MemoryStorage, PersistError, PersistedStore, Persistence,
    StorageBackend,
};

// Fetch exports
pub use fetch::{FetchBody, FetchClient, FetchError, FetchOptions, SIMULATED_LATENCY};

pub use menu::{open_menu_store, open_menu_store_with, MenuAction, MenuState, MenuStore, MENU_STORE_ID};
pub use types::{find_in_menu, AnimationMode, MenuNode};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::fetch::{FetchBody, FetchClient, FetchError, FetchOptions};
    pub use crate::menu::{open_menu_store, open_menu_store_with, MenuAction, MenuState, MenuStore};
    pub use crate::persist::{
        FileStorage, JsonPersistence, MemoryStorage, PersistError, PersistedStore, Persistence,
        StorageBackend,
    };
    pub use crate::store::{
        LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store, StoreWithMiddleware,
    };
    pub use crate::types::{AnimationMode, MenuNode};
}

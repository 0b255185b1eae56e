//! menu-demo: command-line front end for ui-dispatch
//!
//! - `fetch` runs a request through [`ui_dispatch::FetchClient`]
//! - `state` reads and writes the persisted `menu` store
//! - `modes` lists the animation modes

pub mod cli;
pub mod commands;
pub mod render;

//! Command handlers
//!
//! Each handler returns the text to print so the binary stays a thin shell
//! around them.

use std::time::Duration;

use anyhow::Context;
use reqwest::Method;
use ui_dispatch::prelude::*;

use crate::cli::{FetchArgs, StateCommand, Switch};
use crate::render::render_menu_tree;

/// Build the fetch options and client described by `args`
pub fn fetch_request(args: &FetchArgs) -> anyhow::Result<(FetchClient, FetchOptions)> {
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method {:?}", args.method))?;

    let mut options = FetchOptions::new().method(method);
    for (name, value) in &args.headers {
        options = options.header(name.clone(), value.clone());
    }
    if let Some(data) = &args.data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data is not valid JSON")?;
        options = options.json(body);
    }

    let client = if args.simulate_latency {
        FetchClient::simulated()
    } else {
        FetchClient::new()
    };
    if let Some(ms) = args.delay_ms {
        options = options.delay(Duration::from_millis(ms));
    }

    Ok((client, options))
}

/// Run `fetch`, rendering the result against the persisted menu state
pub async fn run_fetch<B, M>(args: &FetchArgs, menu: &MenuStore<B, M>) -> anyhow::Result<String>
where
    B: StorageBackend,
    M: Middleware<MenuAction>,
{
    let (client, options) = fetch_request(args)?;

    if args.menu {
        let tree: Vec<MenuNode> = client
            .fetch(&args.url, Some(options))
            .await
            .with_context(|| format!("fetching menu from {}", args.url))?;
        let mut out = render_menu_tree(&tree, menu.active_key());
        if let Some(key) = menu.active_key() {
            if ui_dispatch::find_in_menu(&tree, key).is_none() {
                out.push_str(&format!("(forced active key {:?} is not in this menu)\n", key));
            }
        }
        return Ok(out);
    }

    let value: serde_json::Value = client
        .fetch(&args.url, Some(options))
        .await
        .with_context(|| format!("fetching {}", args.url))?;
    Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
}

/// Apply a `state` subcommand and return the resulting state as JSON
pub fn run_state<B, M>(command: &StateCommand, menu: &mut MenuStore<B, M>) -> anyhow::Result<String>
where
    B: StorageBackend,
    M: Middleware<MenuAction>,
{
    match command {
        StateCommand::Show => {}
        StateCommand::BigData { value } => {
            let saved = match value {
                Switch::On => menu.set_big_data(true),
                Switch::Off => menu.set_big_data(false),
                Switch::Toggle => menu.toggle_big_data(),
            };
            saved.context("saving menu state")?;
        }
        StateCommand::Active { key } => {
            menu.set_force_active_key(key.clone())
                .context("saving menu state")?;
        }
        StateCommand::ClearActive => {
            menu.clear_force_active_key()
                .context("saving menu state")?;
        }
        StateCommand::Reset => {
            menu.reset().context("saving menu state")?;
        }
    }

    Ok(format!("{}\n", serde_json::to_string_pretty(menu.state())?))
}

/// One animation mode per line
pub fn list_modes() -> String {
    AnimationMode::ALL
        .iter()
        .map(|mode| format!("{}\n", mode))
        .collect()
}

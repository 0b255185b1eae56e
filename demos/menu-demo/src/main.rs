//! menu-demo - ui-dispatch example
//!
//! # Usage
//!
//! ```sh
//! # Fetch and pretty-print JSON
//! cargo run -p menu-demo -- fetch https://example.com/data.json
//!
//! # Same request with the 500ms simulated latency
//! cargo run -p menu-demo -- fetch https://example.com/data.json --simulate-latency
//!
//! # Render a menu tree, marking the persisted forced-active key
//! cargo run -p menu-demo -- state active reports
//! cargo run -p menu-demo -- fetch https://example.com/menu.json --menu
//!
//! # Inspect or reset the persisted state
//! cargo run -p menu-demo -- state show
//! cargo run -p menu-demo -- state reset
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see requests and dispatches.

use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use ui_dispatch::prelude::*;

use menu_demo::cli::{Args, Command};
use menu_demo::commands::{list_modes, run_fetch, run_state};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let storage = match &args.storage_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    };
    tracing::debug!(dir = %storage.dir().display(), "Using storage directory");

    let output = if args.log_actions {
        run(&args.command, open_menu_store_with(storage, LoggingMiddleware::verbose())).await?
    } else {
        run(&args.command, open_menu_store(storage)).await?
    };

    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

async fn run<M>(command: &Command, mut menu: MenuStore<FileStorage, M>) -> anyhow::Result<String>
where
    M: Middleware<MenuAction>,
{
    match command {
        Command::Fetch(fetch) => run_fetch(fetch, &menu).await,
        Command::State(state) => run_state(state, &mut menu),
        Command::Modes => Ok(list_modes()),
    }
}

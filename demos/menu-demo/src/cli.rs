//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Fetch JSON and inspect the persisted menu state
#[derive(Parser, Debug)]
#[command(name = "menu-demo")]
#[command(about = "Drives the ui-dispatch fetch client and persisted menu store")]
pub struct Args {
    /// Directory holding persisted stores
    /// (defaults to the platform data dir, e.g. ~/.local/share/ui-dispatch)
    #[arg(long, env = "UI_DISPATCH_STORAGE_DIR", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Log every action dispatched to the menu store (at debug level)
    #[arg(long, global = true)]
    pub log_actions: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a URL and print the decoded JSON
    Fetch(FetchArgs),

    /// Read or change the persisted menu state
    #[command(subcommand)]
    State(StateCommand),

    /// List the animation modes
    Modes,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    pub url: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request header as `Name: value` (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Wait this long before issuing the request
    #[arg(long, conflicts_with = "simulate_latency")]
    pub delay_ms: Option<u64>,

    /// Wait the standard simulated latency (500ms) before issuing the request
    #[arg(long)]
    pub simulate_latency: bool,

    /// Decode the body as a menu tree and render it, marking the forced active key
    #[arg(long)]
    pub menu: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum StateCommand {
    /// Print the persisted state as JSON
    Show,
    /// Turn the big-data views on or off
    BigData {
        #[arg(value_enum)]
        value: Switch,
    },
    /// Force a menu key to be active
    Active { key: String },
    /// Stop forcing an active menu key
    ClearActive,
    /// Restore defaults
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

/// Parse `Name: value` (or `Name:value`) into a header pair
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in {:?}", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: application/json"),
            Ok(("Accept".into(), "application/json".into()))
        );
        assert_eq!(parse_header("X-A:b:c"), Ok(("X-A".into(), "b:c".into())));
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(" : value").is_err());
    }

    #[test]
    fn test_parse_fetch_args() {
        let args = Args::try_parse_from([
            "menu-demo",
            "fetch",
            "http://localhost/menu",
            "-H",
            "Accept: application/json",
            "--simulate-latency",
            "--menu",
        ])
        .unwrap();

        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch command");
        };
        assert_eq!(fetch.url, "http://localhost/menu");
        assert_eq!(fetch.method, "GET");
        assert_eq!(fetch.headers.len(), 1);
        assert!(fetch.simulate_latency);
        assert!(fetch.menu);
    }

    #[test]
    fn test_delay_conflicts_with_simulated_latency() {
        let result = Args::try_parse_from([
            "menu-demo",
            "fetch",
            "http://localhost",
            "--delay-ms",
            "10",
            "--simulate-latency",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_state_args() {
        let args = Args::try_parse_from([
            "menu-demo",
            "--storage-dir",
            "/tmp/x",
            "state",
            "big-data",
            "toggle",
        ])
        .unwrap();

        assert_eq!(args.storage_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            args.command,
            Command::State(StateCommand::BigData {
                value: Switch::Toggle
            })
        ));
    }
}

//! Process entry point. Loads `notify-gateway.config.ron`, then either
//! runs the gateway or validates the configuration and exits (spec.md §6
//! "CLI surface").
//!
//! Config file resolution precedence: `--config` flag, then
//! `NOTIFY_GATEWAY_CONFIG` environment variable, then a couple of default
//! search paths (SPEC_FULL.md §6 "Configuration loading").

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ngw", about = "Notification gateway: bus-driven dispatch engine", version)]
struct Cli {
    /// Path to the configuration file. Overrides `NOTIFY_GATEWAY_CONFIG`
    /// and the default search path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the gateway service. The default when no subcommand is given.
    Run,
    /// Parse and validate the configuration file without starting the
    /// service (spec.md §6 "CLI surface").
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = find_config_file(cli.config)?;
    let config_content = std::fs::read_to_string(&config_path).map_err(|error| {
        anyhow::anyhow!("failed to read config from {}: {error}", config_path.display())
    })?;
    let config: ngw::Config = ron::from_str(&config_content)
        .map_err(|error| anyhow::anyhow!("failed to parse config from {}: {error}", config_path.display()))?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => ngw::Gateway::new(config).run().await,
        Command::Config { action: ConfigAction::Check } => {
            ngw::Gateway::validate(&config)?;
            println!("configuration OK: {}", config_path.display());
            Ok(())
        }
    }
}

/// Find the configuration file using the following precedence:
/// 1. `--config` command-line flag
/// 2. `NOTIFY_GATEWAY_CONFIG` environment variable
/// 3. `./notify-gateway.config.ron` (current working directory)
/// 4. `/etc/notify-gateway/notify-gateway.config.ron` (system-wide config)
fn find_config_file(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path);
        }
        anyhow::bail!("--config points to a non-existent file: {}", path.display());
    }

    if let Ok(env_path) = std::env::var("NOTIFY_GATEWAY_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        anyhow::bail!("NOTIFY_GATEWAY_CONFIG points to a non-existent file: {}", path.display());
    }

    let default_paths = vec![
        PathBuf::from("./notify-gateway.config.ron"),
        PathBuf::from("/etc/notify-gateway/notify-gateway.config.ron"),
    ];

    for path in &default_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let paths_tried = default_paths.iter().map(|p| format!("  - {}", p.display())).collect::<Vec<_>>().join("\n");

    anyhow::bail!(
        "no configuration file found. Tried:\n  - --config flag\n  - NOTIFY_GATEWAY_CONFIG environment variable\n{paths_tried}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_when_it_exists() {
        let file = tempfile::NamedTempFile::new().expect("create temp file");
        let path = find_config_file(Some(file.path().to_path_buf())).expect("should resolve");
        assert_eq!(path, file.path());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let missing = PathBuf::from("/nonexistent/path/to/nowhere.config.ron");
        assert!(find_config_file(Some(missing)).is_err());
    }

    #[test]
    fn no_explicit_path_and_no_env_var_falls_through_to_default_search() {
        // SAFETY: this test owns its own temporary-env-var lifetime and does
        // not run concurrently with another test that touches this key, per
        // `serial_test`'s absence here being intentional: the crate does not
        // otherwise mutate process environment.
        unsafe {
            std::env::remove_var("NOTIFY_GATEWAY_CONFIG");
        }
        let result = find_config_file(None);
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("no configuration file found"));
    }
}

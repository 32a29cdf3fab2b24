//! Mode routing
//!
//! This module provides unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (command-line interface)
//!
//! Mode selection is based on command-line arguments and feature flags.

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Detect which mode to run based on command-line arguments.
///
/// Expects `args` to already have the `-c`/`--config` pair filtered out,
/// so a bare `gotolink -c custom.toml` still starts the server.
///
/// # Mode Detection Logic
/// 1. If there are any arguments and the CLI feature is enabled -> CLI mode
/// 2. If the server feature is enabled -> Server mode (default)
/// 3. Otherwise -> Unknown (no features enabled)
pub fn detect_mode(args: &[String]) -> Mode {
    #[cfg(feature = "cli")]
    if args.len() > 1 {
        return Mode::Cli;
    }

    #[cfg(feature = "server")]
    return Mode::Server;

    #[cfg(not(feature = "server"))]
    Mode::Unknown
}

#[cfg(all(test, feature = "server", feature = "cli"))]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_server_mode() {
        assert_eq!(detect_mode(&args(&["gotolink"])), Mode::Server);
    }

    #[test]
    fn test_any_subcommand_is_cli_mode() {
        assert_eq!(detect_mode(&args(&["gotolink", "list"])), Mode::Cli);
        assert_eq!(detect_mode(&args(&["gotolink", "stats"])), Mode::Cli);
    }
}

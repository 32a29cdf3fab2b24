//! Command-line handling for the configuration file path
//!
//! The `-c`/`--config` flag is shared by both runtime modes and has to
//! be stripped before mode detection looks at the remaining arguments.

/// Extract the configuration file path from command-line arguments.
///
/// Accepts `-c path`, `--config path`, `-c=path` and `--config=path`.
pub fn parse_config_path(args: &[String]) -> Option<String> {
    let mut i = 1; // Skip program name
    while i < args.len() {
        let arg = &args[i];

        if (arg == "-c" || arg == "--config") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }

        if let Some(path) = arg.strip_prefix("-c=") {
            return Some(path.to_string());
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }

        i += 1;
    }

    None
}

/// Remove `-c`/`--config` and their values from the argument list so
/// mode detection doesn't trip over them.
pub fn filter_config_args(args: &[String]) -> Vec<String> {
    let mut filtered = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if (arg == "-c" || arg == "--config") && i + 1 < args.len() {
            i += 2; // Skip both the flag and its value
            continue;
        }

        if arg.starts_with("-c=") || arg.starts_with("--config=") {
            i += 1;
            continue;
        }

        filtered.push(arg.clone());
        i += 1;
    }

    filtered
}

use std::env;

use gotolink::config;
use gotolink::runtime::{Mode, detect_mode};
use gotolink::system;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // -c/--config must be honored before anything reads the config
    match config::args::parse_config_path(&args) {
        Some(path) => config::init_config_from(&path),
        None => config::init_config(),
    }

    // A bare `gotolink -c custom.toml` is still a server invocation
    let filtered_args = config::args::filter_config_args(&args);

    match detect_mode(&filtered_args) {
        #[cfg(feature = "server")]
        Mode::Server => {
            let config = config::get_config();
            let _guard = system::init_logging(&config);

            if let Err(e) = gotolink::runtime::modes::run_server().await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }

        #[cfg(feature = "cli")]
        Mode::Cli => {
            system::init_cli_logging();

            if let Err(e) = gotolink::runtime::modes::run_cli().await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }

        Mode::Unknown => {
            eprintln!("No execution mode available (rebuild with the server and cli features)");
            std::process::exit(2);
        }
    }

    Ok(())
}

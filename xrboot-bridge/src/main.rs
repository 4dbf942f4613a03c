use std::path::PathBuf;
use std::process::ExitCode;

use xrboot_bridge::{launcher, util};
use xrboot_core::{AppConfig, ConfigSource};

fn main() -> ExitCode {
    // Usage: xrboot [config.json]
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let source = ConfigSource::discover(config_path.as_deref());

    // Tracing isn't up yet; the filter itself comes from the config.
    let config = match AppConfig::from_source(&source) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("xrboot: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    util::init_tracing(&config.log_filter);
    util::install_panic_hook();

    tracing::info!("xrboot v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!(%source, "Config loaded");
    tracing::debug!(?config, "Effective config");

    match launcher::run_with_config(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

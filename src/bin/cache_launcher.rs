// Cache launcher entry point.
// Loads the configuration, wires up logging from it, and prints the
// application summary. The library never touches global logger state; the
// subscriber is installed here, once.

use std::process::ExitCode;

use tracing::info;

use ninja_tools::Result;
use ninja_tools::launcher::{ConfigHandler, init_from_config};

fn main() -> ExitCode {
    let Some(handler) = ConfigHandler::new() else {
        eprintln!("error: could not determine the user config directory");
        return ExitCode::FAILURE;
    };

    match run(&handler) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(handler: &ConfigHandler) -> Result<()> {
    let _guard = init_from_config(&handler.get_config()?)?;

    // Re-read rather than reuse: the document is validated on every read.
    let config = handler.get_config()?;
    info!(app = %config.app_name, "starting application");

    println!("appName:  {}", config.app_name);
    println!("version:  {}", config.version);
    println!("settings: {}", serde_json::to_string_pretty(&config.settings)?);
    println!("paths:    {}", serde_json::to_string_pretty(&config.paths)?);

    Ok(())
}

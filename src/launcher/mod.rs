// Cache launcher module.
// Configuration loading/validation and logging setup for the launcher app.

pub mod config;
pub mod logging;

pub use config::{ConfigHandler, LauncherConfig, LauncherPaths, Settings, UiSettings};
pub use logging::init_from_config;

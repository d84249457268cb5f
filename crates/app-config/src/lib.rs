// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, Settings};

/// Loads the application settings from the `config/` directory of the
/// current working directory. See [`load_settings_from`].
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Built-in defaults.
/// 2. An optional `base.toml` in `dir`.
/// 3. An optional environment-specific file (e.g., `development.toml`).
/// 4. Environment variables (e.g., `APP__ANALYSIS__LONG_WINDOW=50`).
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .set_default("app.environment", environment.as_str())?
        .set_default("app.log_level", "info")?
        .set_default("analysis.short_window", 5)?
        .set_default("analysis.long_window", 25)?
        .add_source(File::with_name(&dir.join("base").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(&environment).to_string_lossy()).required(false))
        // The prefix is `APP`, separator is `__`.
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

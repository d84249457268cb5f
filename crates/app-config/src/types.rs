// In crates/app-config/src/types.rs

use serde::Deserialize;
use strategies::TrendSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Default moving-average windows, overridable per command.
    #[serde(default)]
    pub analysis: TrendSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

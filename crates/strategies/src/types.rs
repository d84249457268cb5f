// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TrendSettings {
    /// Period of the fast moving average, in bars.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Period of the slow moving average, in bars.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

fn default_short_window() -> usize { 5 }
fn default_long_window() -> usize { 25 }

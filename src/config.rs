use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use crate::stats::TieBreak;

const DEFAULT_DATA_DIR: &str = ".tourneyhub";
const DEFAULT_BCRYPT_COST: u32 = 10;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub tie_break: TieBreak,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; unset or unusable
    /// values fall back to the defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("TOURNEYHUB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        // bcrypt rejects costs outside 4..=31
        let bcrypt_cost = lookup("TOURNEYHUB_BCRYPT_COST")
            .and_then(|s| s.parse().ok())
            .filter(|cost| (4..=31).contains(cost))
            .unwrap_or(DEFAULT_BCRYPT_COST);

        let tie_break = match lookup("TOURNEYHUB_TIE_BREAK") {
            Some(raw) => TieBreak::from_str(&raw).unwrap_or_else(|_| {
                warn!(value = %raw, "Unknown TOURNEYHUB_TIE_BREAK, using input-order");
                TieBreak::default()
            }),
            None => TieBreak::default(),
        };

        Self {
            data_dir,
            bcrypt_cost,
            tie_break,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            tie_break: TieBreak::default(),
        }
    }
}

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub target: String,
    /// Send interval for the live ping stream, in milliseconds.
    pub interval_ms: u64,
    /// Consecutive replies required to call connectivity stable.
    pub stable_run: u64,
    /// Budget for the initial reachability wait, in seconds.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: "8.8.8.8".to_string(),
            interval_ms: 1000,
            stable_run: 10,
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("netwait");

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Self {
        Self::get_config_path()
            .ok()
            .and_then(|path| {
                if path.exists() {
                    fs::read_to_string(&path)
                        .ok()
                        .and_then(|content| serde_json::from_str::<AppConfig>(&content).ok())
                } else {
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::get_config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target, "8.8.8.8");
        assert_eq!(back.interval_ms, 1000);
        assert_eq!(back.stable_run, 10);
        assert_eq!(back.timeout_secs, 60);
    }
}

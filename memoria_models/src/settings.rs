use std::path::PathBuf;

use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SchedulerSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            timezone: default_timezone(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_timezone() -> Tz {
    Tz::UTC
}

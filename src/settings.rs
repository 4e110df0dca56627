use crate::analysis::{AnalysisConfig, DEFAULT_WINDOW_SECS};
use log::LevelFilter;
use nba_stats::client::STATS_HOST;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the player and team lookup files live.
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub window_secs: u32,
    pub timeout: Duration,
    pub base_url: String,
    pub log_level: Option<LevelFilter>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("tech_runs"),
            workers: 10,
            window_secs: DEFAULT_WINDOW_SECS,
            timeout: Duration::from_secs(10),
            base_url: STATS_HOST.to_owned(),
            log_level: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::from_vars(opt_env)
    }

    /// Defaults overlaid with whatever `var` yields. Unparseable values keep the default.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: var("HOOPSTATS_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            output_dir: var("HOOPSTATS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            workers: var("HOOPSTATS_WORKERS")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.workers)
                .max(1),
            window_secs: var("HOOPSTATS_WINDOW_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.window_secs),
            timeout: var("HOOPSTATS_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or(defaults.timeout),
            base_url: var("HOOPSTATS_BASE_URL").unwrap_or(defaults.base_url),
            log_level: None,
        }
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig { workers: self.workers, window_secs: self.window_secs }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

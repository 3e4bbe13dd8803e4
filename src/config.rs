//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc};
use clap::{builder::RangedU64ValueParser, Parser};

use crate::{
    engine::Notifier,
    services::{DesktopNotifier, FileStore, KeyValueStore, LogNotifier, MemoryStore},
    state::{
        garden::{DEFAULT_GARDEN_SLOTS, MAX_GARDEN_SLOTS},
        TimerOptions,
    },
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "trove-timer")]
#[command(about = "A focus/break timer service with a to-do tracker and persisted settings")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Key-value store file for settings, sessions and to-do items
    #[arg(short, long, default_value = "trove-store.json")]
    pub store: PathBuf,

    /// Keep all state in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Send desktop notifications when a countdown completes
    #[arg(short, long)]
    pub notifications: bool,

    /// Number of garden slots to display
    #[arg(
        long,
        default_value_t = DEFAULT_GARDEN_SLOTS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_GARDEN_SLOTS)
    )]
    pub slots: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Store selected by `--store` / `--no-persist`
    pub fn open_store(&self) -> Arc<dyn KeyValueStore> {
        if self.no_persist {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::open(&self.store))
        }
    }

    /// Timer capabilities selected by the flags
    pub fn timer_options(&self) -> TimerOptions {
        let notifier: Arc<dyn Notifier> = if self.notifications {
            Arc::new(DesktopNotifier::new())
        } else {
            Arc::new(LogNotifier)
        };

        TimerOptions {
            notifier: Some(notifier),
            garden_slots: self.slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["trove-timer"]).unwrap();
        assert_eq!(config.port, 20554);
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.store, PathBuf::from("trove-store.json"));
        assert!(!config.no_persist);
        assert_eq!(config.slots, DEFAULT_GARDEN_SLOTS);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "trove-timer", "-p", "8080", "--no-persist", "-n", "--slots", "6", "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.no_persist);
        assert!(config.notifications);
        assert_eq!(config.slots, 6);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.timer_options().garden_slots, 6);
    }

    #[test]
    fn test_slots_out_of_range_rejected() {
        assert!(Config::try_parse_from(["trove-timer", "--slots", "0"]).is_err());
        assert!(Config::try_parse_from(["trove-timer", "--slots", "65"]).is_err());
        let config = Config::try_parse_from(["trove-timer", "--slots", "64"]).unwrap();
        assert_eq!(config.slots, 64);
    }
}

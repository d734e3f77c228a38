//! Command-line and environment configuration.
//!
//! # Responsibility
//! - Parse store and logging settings from flags with env fallbacks.
//! - Resolve relative paths so the logging layer only sees absolute ones.

use clap::Parser;
use registrar_core::default_log_level;
use std::path::{Path, PathBuf};

const DEFAULT_DB_PATH: &str = "registrar.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "registrar-logs";

/// Console student registration over a local SQLite store.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, env = "REGISTRAR_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Keep all records in memory; overrides `--db-path`.
    #[arg(long)]
    pub in_memory: bool,

    /// Directory for rolling log files.
    #[arg(long, env = "REGISTRAR_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// One of trace, debug, info, warn, error.
    #[arg(long, env = "REGISTRAR_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Log directory made absolute against the current working directory.
    pub fn resolved_log_dir(&self) -> PathBuf {
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        absolutize(&dir)
    }

    pub fn resolved_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn explicit_flags_are_parsed() {
        let args = Args::try_parse_from([
            "registrar",
            "--db-path",
            "school.db",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(args.db_path.to_str(), Some("school.db"));
        assert!(!args.in_memory);
        assert_eq!(args.resolved_log_level(), "warn");
    }

    #[test]
    fn log_dir_is_always_absolute() {
        let args = Args::try_parse_from(["registrar", "--in-memory", "--log-dir", "logs"]).unwrap();
        assert!(args.in_memory);
        let dir = args.resolved_log_dir();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("logs"));
    }
}

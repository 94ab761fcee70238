//! Configuration loaded from environment variables

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::decoder::InputSource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format {0:?} (expected json or kv)")]
pub struct UnknownOutputFormat(String);

/// How readings are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Kv,
}

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "kv" => Ok(Self::Kv),
            _ => Err(UnknownOutputFormat(s.to_string())),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Where capture lines are read from
    pub source: InputSource,

    /// Output record format
    pub output: OutputFormat,

    /// Stats summary interval in seconds
    pub stats_interval_secs: u64,

    /// Capacity of the runner -> manager capture channel
    pub channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let command = lookup("HG01_SOURCE_CMD").and_then(|cmd| {
            let mut parts = cmd.split_whitespace().map(str::to_string);
            let program = parts.next()?;
            Some(InputSource::Command {
                program,
                args: parts.collect(),
            })
        });

        let source = command.unwrap_or_else(|| match lookup("HG01_INPUT") {
            Some(path) if !path.is_empty() && path != "-" => InputSource::File(PathBuf::from(path)),
            _ => InputSource::Stdin,
        });

        Self {
            source,

            output: lookup("HG01_OUTPUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),

            stats_interval_secs: lookup("HG01_STATS_INTERVAL_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(10),

            channel_capacity: lookup("HG01_CHANNEL_CAPACITY")
                .and_then(|s| s.parse().ok())
                .filter(|&cap| cap > 0)
                .unwrap_or(256),
        }
    }
}

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::ConfigError;
use crate::types::price::Price;
use crate::types::watch_entry::WatchEntry;

pub type DynamicWatchlist = Box<dyn WatchlistSource + Send + Sync>;

/// Read at the start of every cycle, so edits apply without a restart.
pub trait WatchlistSource: Send + Sync {
    fn load(&self) -> Result<Vec<WatchEntry>, ConfigError>;
}

/// `{ "ICICIBANK": 880, "HDFCBANK": 1600 }` on disk.
#[derive(Debug, Clone)]
pub struct JsonWatchlist {
    path: PathBuf,
}

impl JsonWatchlist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WatchlistSource for JsonWatchlist {
    fn load(&self) -> Result<Vec<WatchEntry>, ConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::Missing {
                path: self.path.clone(),
            },
            _ => ConfigError::Unreadable {
                path: self.path.clone(),
                source,
            },
        })?;

        parse_watchlist(&raw)
    }
}

/// All or nothing: one bad threshold rejects the whole document.
/// Entries keep document order.
pub fn parse_watchlist(raw: &str) -> Result<Vec<WatchEntry>, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::Empty);
    }

    let Value::Object(entries) = serde_json::from_str::<Value>(raw)? else {
        return Err(ConfigError::NotAnObject);
    };

    entries
        .into_iter()
        .map(|(symbol, value)| {
            let threshold = value.as_f64().and_then(Price::new).ok_or_else(|| {
                ConfigError::InvalidThreshold {
                    symbol: symbol.clone(),
                    value: value.to_string(),
                }
            })?;

            Ok(WatchEntry::new(symbol, threshold))
        })
        .collect()
}

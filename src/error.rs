use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The watchlist could not be turned into watch entries.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("watchlist is empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected an object mapping stock symbols to alert prices")]
    NotAnObject,

    #[error("alert price for {symbol} must be a non-negative number, got {value}")]
    InvalidThreshold { symbol: String, value: String },
}

/// One symbol's price lookup failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteFetchError {
    #[error("quote source unavailable for {symbol}: {reason}")]
    Unavailable { symbol: String, reason: String },

    #[error("unexpected quote data for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },
}

impl QuoteFetchError {
    pub fn unavailable(symbol: &str, reason: impl fmt::Display) -> Self {
        Self::Unavailable {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(symbol: &str, reason: impl fmt::Display) -> Self {
        Self::Malformed {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Anything else that went wrong while processing one watch entry.
#[derive(Error, Debug)]
#[error("processing {symbol} failed unexpectedly: {detail}")]
pub struct UnexpectedError {
    pub symbol: String,
    pub detail: String,
}

impl UnexpectedError {
    pub fn from_panic(symbol: &str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let detail = if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "panic with a non-string payload".to_string()
        };

        Self {
            symbol: symbol.to_string(),
            detail,
        }
    }
}

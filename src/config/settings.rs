use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::FixedOffset;
use serde::Deserialize;
use tracing::info;

use crate::types::market_hours::MarketHours;

/// Optional YAML file next to the watchlist. Read once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub market_hours: MarketHours,

    /// Exchange offset from UTC in minutes (330 for IST). Unset means the
    /// host timezone decides what "local" is.
    pub utc_offset_minutes: Option<i32>,

    /// Overrides the selected provider's endpoint.
    pub quote_base_url: Option<String>,

    pub sound_file: Option<PathBuf>,

    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            market_hours: MarketHours::default(),
            utc_offset_minutes: None,
            quote_base_url: None,
            sound_file: None,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no settings file, using defaults");

            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;

        Self::from_yaml(&raw).with_context(|| format!("invalid settings {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings =
            serde_yaml::from_str(raw).context("failed to parse settings yaml")?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn utc_offset(&self) -> Result<Option<FixedOffset>> {
        self.utc_offset_minutes
            .map(|minutes| {
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| anyhow!("utc_offset_minutes out of range: {minutes}"))
            })
            .transpose()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        self.market_hours
            .validate()
            .context("market_hours validation failed")?;

        self.utc_offset()?;

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be > 0");
        }
        Ok(())
    }
}

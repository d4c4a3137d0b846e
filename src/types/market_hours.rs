use anyhow::{Result, bail};
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarketHours {
    /// Opening hour in exchange-local time (inclusive), 0–23
    pub open_hour: u32,
    pub open_minute: u32,

    /// Closing hour in exchange-local time (inclusive), 0–23
    pub close_hour: u32,
    pub close_minute: u32,
}

impl Default for MarketHours {
    fn default() -> Self {
        Self {
            open_hour: 9, // 09:30 local
            open_minute: 30,
            close_hour: 15, // 15:00 local
            close_minute: 0,
        }
    }
}

impl MarketHours {
    pub fn opens_at(&self) -> (u32, u32) {
        (self.open_hour, self.open_minute)
    }

    pub fn closes_at(&self) -> (u32, u32) {
        (self.close_hour, self.close_minute)
    }

    /// Offset of the opening bell from local midnight, in seconds.
    pub fn open_offset_secs(&self) -> i64 {
        i64::from(self.open_hour) * 3600 + i64::from(self.open_minute) * 60
    }

    pub fn validate(&self) -> Result<()> {
        if self.open_hour > 23 || self.close_hour > 23 {
            bail!("market hours must be between 0 and 23");
        }
        if self.open_minute > 59 || self.close_minute > 59 {
            bail!("market minutes must be between 0 and 59");
        }
        if self.opens_at() >= self.closes_at() {
            bail!("market must open before it closes");
        }
        Ok(())
    }
}

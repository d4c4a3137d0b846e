use chrono::{DateTime, Datelike, FixedOffset, Local, TimeDelta, TimeZone, Timelike, Utc, Weekday};

use crate::types::market_hours::MarketHours;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Source of "now" for the poll loop.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock. Without a fixed offset, "local" is the host timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketClock {
    hours: MarketHours,
}

impl MarketClock {
    pub fn new(hours: MarketHours) -> Self {
        Self { hours }
    }

    pub fn hours(&self) -> &MarketHours {
        &self.hours
    }

    /// Weekday and inside the inclusive [open, close] window. Seconds are ignored.
    pub fn is_market_open<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        if is_weekend(now.weekday()) {
            return false;
        }

        let time_of_day = (now.hour(), now.minute());

        self.hours.opens_at() <= time_of_day && time_of_day <= self.hours.closes_at()
    }

    /// How long to sleep before the gate should be checked again.
    ///
    /// On weekends this counts whole days to Monday plus the opening offset,
    /// measured from `now` rather than from midnight, so the wake-up lands
    /// later than the opening bell. The caller re-checks the gate after
    /// waking, which absorbs the difference.
    ///
    /// On weekdays the target is today's opening bell, or tomorrow's once the
    /// closing hour has been reached. The result is negative when called
    /// during trading hours.
    pub fn sleep_duration_until_open<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TimeDelta {
        let weekday = now.weekday();

        if is_weekend(weekday) {
            let days_to_monday = 7 - i64::from(weekday.num_days_from_monday());

            return TimeDelta::seconds(
                days_to_monday * SECONDS_PER_DAY + self.hours.open_offset_secs(),
            );
        }

        let since_midnight = TimeDelta::seconds(i64::from(now.num_seconds_from_midnight()))
            + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
        let mut wait = TimeDelta::seconds(self.hours.open_offset_secs()) - since_midnight;

        if now.hour() >= self.hours.close_hour {
            wait += TimeDelta::days(1);
        }

        wait
    }
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

//! Time source used for ids, dates and deadline polling.
//!
//! Every scheduled behavior (timer tick, carousel dwell, debounce) is
//! expressed as a deadline compared against `Clock::now_ms`, so tests can
//! drive time explicitly through `ManualClock`.

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::cell::Cell;

/// Wall-clock source in epoch milliseconds plus the local calendar date.
pub trait Clock {
    fn now_ms(&self) -> i64;
    fn today(&self) -> NaiveDate;
}

/// System clock backed by `chrono::Local`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually advanced clock. `today` is derived from `now_ms` in UTC.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn at_date(date: NaiveDate) -> Self {
        let start = date
            .and_hms_opt(9, 0, 0)
            .map(|naive| naive.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self::new(start)
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.now_ms.get())
            .map(|instant| instant.date_naive())
            .unwrap_or_default()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

//! Billing periods.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, Result};

/// A half-open time window `[start, end)` over which credits are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct BillingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Unchecked wire form; converted through [`BillingPeriod::new`].
#[derive(Deserialize)]
struct RawPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawPeriod> for BillingPeriod {
    type Error = BillingError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl BillingPeriod {
    /// Create a period from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidPeriod` if `end` is not after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(BillingError::InvalidPeriod(format!(
                "end {end} is not after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The UTC calendar month containing `now`.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidPeriod` if the month bounds fall outside
    /// the representable date range.
    pub fn monthly(now: DateTime<Utc>) -> Result<Self> {
        let (year, month) = (now.year(), now.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        let start = month_start(year, month)?;
        let end = month_start(next_year, next_month)?;
        Self::new(start, end)
    }

    /// Inclusive start of the period.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end of the period.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `ts` falls inside the period.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| BillingError::InvalidPeriod(format!("no such month: {year}-{month:02}")))
}

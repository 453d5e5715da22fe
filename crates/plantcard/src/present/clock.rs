use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Local;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Offset;
use chrono::TimeDelta;
use chrono::TimeZone;
use chrono::Utc;

/// Source of "today" for fertilization day counts.
pub trait Clock {
    /// Local midnight at the start of the current day.
    fn start_of_today(&self) -> DateTime<FixedOffset>;

    fn today(&self) -> NaiveDate {
        self.start_of_today().date_naive()
    }
}

/// The local date and zone of the machine the card runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn start_of_today(&self) -> DateTime<FixedOffset> {
        local_midnight(Local::now().date_naive())
    }
}

/// Always the same midnight. Used by tests and `plantcard render --today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Midnight of `today` in UTC.
    pub fn utc(today: NaiveDate) -> Self {
        Self::in_offset(today, Utc.fix())
    }

    /// Midnight of `today` in the given offset.
    pub fn in_offset(today: NaiveDate, offset: FixedOffset) -> Self {
        Self(midnight_in(today, offset))
    }

    /// Midnight of `today` in the machine's zone.
    pub fn local(today: NaiveDate) -> Self {
        Self(local_midnight(today))
    }
}

impl Clock for FixedClock {
    fn start_of_today(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

fn midnight_in(day: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let midnight = day.and_time(NaiveTime::MIN);
    let utc = midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

/// Midnight of `day` in the local zone. When midnight does not exist (a DST gap), the
/// current local offset is used.
fn local_midnight(day: NaiveDate) -> DateTime<FixedOffset> {
    match Local.from_local_datetime(&day.and_time(NaiveTime::MIN)).earliest() {
        Some(midnight) => midnight.fixed_offset(),
        None => midnight_in(day, Local::now().offset().fix()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_in_offset() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let clock = FixedClock::in_offset(today, tokyo);

        assert_eq!(clock.today(), today);
        assert_eq!(clock.start_of_today().to_rfc3339(), "2024-01-10T00:00:00+09:00");
        assert_eq!(
            FixedClock::utc(today).start_of_today().to_rfc3339(),
            "2024-01-10T00:00:00+00:00"
        );
    }
}

//! Fertilization schedule.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

use super::status::humanize;
use super::MeasurementStatus;

const MS_PER_DAY: i64 = 86_400_000;

/// Days from `start_of_today` until `date`, rounded up. Negative when `date` is past.
///
/// Accepts a plain date (`2024-01-15`, counted in calendar days), an RFC 3339 timestamp
/// (an absolute instant), or a timestamp without an offset (read as wall-clock time in the
/// zone of `start_of_today`). `None` for anything else.
pub fn days_until(date: &str, start_of_today: DateTime<FixedOffset>) -> Option<i64> {
    let date = date.trim();
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some((day - start_of_today.date_naive()).num_days());
    }

    let ms = match DateTime::parse_from_rfc3339(date) {
        Ok(instant) => instant.timestamp_millis() - start_of_today.timestamp_millis(),
        Err(_) => {
            let wall = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()?;
            (wall - start_of_today.naive_local()).num_milliseconds()
        }
    };
    Some(-(-ms).div_euclid(MS_PER_DAY))
}

/// The date part of an ISO timestamp: everything before `T`.
pub fn format_date_for_display(date: &str) -> &str {
    date.split_once('T').map_or(date, |(day, _)| day)
}

/// "day" or "days" for a day count. Only exactly one (or minus one) is singular.
pub fn day_unit(days: Option<i64>) -> &'static str {
    match days {
        Some(1) | Some(-1) => "day",
        _ => "days",
    }
}

/// Tooltip of the nutrition row. The fertilization dates are listed only when the day count
/// is known.
pub fn nutrition_tooltip(
    status: Option<MeasurementStatus>,
    days: Option<i64>,
    last_fertilized: Option<&str>,
    next_fertilization: Option<&str>,
) -> String {
    let mut lines = vec![format!(
        "Nutrition Status: {}",
        humanize(status.unwrap_or_default().as_ref())
    )];

    let Some(days) = days else {
        return lines.join("\n");
    };
    if days >= 0 {
        lines.push(format!("Fertilize in {} {}", days, day_unit(Some(days))));
    } else {
        lines.push(format!(
            "Fertilization overdue by {} {}",
            days.abs(),
            day_unit(Some(days))
        ));
    }

    if let Some(last) = last_fertilized.filter(|d| !d.is_empty()) {
        lines.push(format!("Last Fertilization: {}", format_date_for_display(last)));
    }
    if let Some(next) = next_fertilization.filter(|d| !d.is_empty()) {
        lines.push(format!("Next Fertilization: {}", format_date_for_display(next)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::Clock;
    use crate::present::FixedClock;

    fn midnight(s: &str) -> DateTime<FixedOffset> {
        FixedClock::utc(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()).start_of_today()
    }

    #[test]
    fn test_days_until_dates() {
        let today = midnight("2024-01-10");
        assert_eq!(days_until("2024-01-15", today), Some(5));
        assert_eq!(days_until("2024-01-05", today), Some(-5));
        assert_eq!(days_until("2024-01-10", today), Some(0));
        assert_eq!(days_until("2024-02-10", today), Some(31));
    }

    #[test]
    fn test_days_until_timestamps_round_up() {
        let today = midnight("2024-01-10");
        assert_eq!(days_until("2024-01-15T00:00:00", today), Some(5));
        assert_eq!(days_until("2024-01-15T08:30:00", today), Some(6));
        assert_eq!(days_until("2024-01-15T08:30:00+02:00", today), Some(6));
        assert_eq!(days_until("2024-01-09T12:00:00Z", today), Some(0));
        assert_eq!(days_until("2024-01-08T12:00:00", today), Some(-1));
    }

    #[test]
    fn test_days_until_timestamps_are_instants() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let tokyo = FixedClock::in_offset(day, FixedOffset::east_opt(9 * 3600).unwrap());
        let today = tokyo.start_of_today();

        // 20:00 UTC on the 14th is 05:00 on the 15th in Tokyo.
        assert_eq!(days_until("2024-01-14T20:00:00Z", today), Some(6));
        assert_eq!(days_until("2024-01-15T05:00:00+09:00", today), Some(6));
        // Calendar dates and offset-less timestamps stay in Tokyo wall time.
        assert_eq!(days_until("2024-01-14", today), Some(4));
        assert_eq!(days_until("2024-01-14T20:00:00", today), Some(5));
        // 15:00 UTC on the 9th is midnight of the 10th in Tokyo.
        assert_eq!(days_until("2024-01-09T15:00:00Z", today), Some(0));
        assert_eq!(days_until("2024-01-09T14:00:00Z", today), Some(0));
        assert_eq!(days_until("2024-01-08T14:00:00Z", today), Some(-1));
    }

    #[test]
    fn test_days_until_rejects_garbage() {
        let today = midnight("2024-01-10");
        assert_eq!(days_until("unknown", today), None);
        assert_eq!(days_until("", today), None);
        assert_eq!(days_until("2024-13-01", today), None);
    }

    #[test]
    fn test_format_date_for_display() {
        assert_eq!(format_date_for_display("2024-01-15T08:30:00+00:00"), "2024-01-15");
        assert_eq!(format_date_for_display("2024-01-15"), "2024-01-15");
    }

    #[test]
    fn test_tooltip_upcoming() {
        let tooltip = nutrition_tooltip(
            Some(MeasurementStatus::Perfect),
            Some(1),
            Some("2024-01-01T10:00:00"),
            Some("2024-01-11"),
        );
        insta::assert_snapshot!(tooltip, @r"
        Nutrition Status: perfect
        Fertilize in 1 day
        Last Fertilization: 2024-01-01
        Next Fertilization: 2024-01-11
        ");
    }

    #[test]
    fn test_tooltip_overdue() {
        let tooltip = nutrition_tooltip(Some(MeasurementStatus::TooLow), Some(-3), None, None);
        insta::assert_snapshot!(tooltip, @r"
        Nutrition Status: too low
        Fertilization overdue by 3 days
        ");
    }

    #[test]
    fn test_tooltip_without_schedule() {
        assert_eq!(nutrition_tooltip(None, None, None, None), "Nutrition Status: no data");
    }

    #[test]
    fn test_tooltip_hides_dates_without_day_count() {
        let tooltip = nutrition_tooltip(
            Some(MeasurementStatus::Perfect),
            days_until("unknown", midnight("2024-01-10")),
            Some("2024-01-01"),
            Some("unknown"),
        );
        assert_eq!(tooltip, "Nutrition Status: perfect");
    }

    #[test]
    fn test_day_unit() {
        assert_eq!(day_unit(Some(1)), "day");
        assert_eq!(day_unit(Some(-1)), "day");
        assert_eq!(day_unit(Some(0)), "days");
        assert_eq!(day_unit(None), "days");
    }
}

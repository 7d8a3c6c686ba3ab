//! Time windows used to bucket events: today, current week, current month.
//!
//! All boundaries are computed in the time zone of `now` and are inclusive:
//! an event created exactly at week start belongs to the week. There is no
//! upper bound, so an event stamped slightly in the future (clock skew) still
//! counts as "this week" / "this month".
//!
//! The three membership flags are evaluated independently of each other.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Aggregation granularity selected on the category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindowTab {
    #[default]
    Today,
    Week,
    Month,
}

impl TimeWindowTab {
    pub const ALL: [TimeWindowTab; 3] = [
        TimeWindowTab::Today,
        TimeWindowTab::Week,
        TimeWindowTab::Month,
    ];

    /// Value of the `timeRange` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindowTab::Today => "today",
            TimeWindowTab::Week => "week",
            TimeWindowTab::Month => "month",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(TimeWindowTab::Today),
            "week" => Some(TimeWindowTab::Week),
            "month" => Some(TimeWindowTab::Month),
            _ => None,
        }
    }

    /// Tab title
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindowTab::Today => "Today",
            TimeWindowTab::Week => "This Week",
            TimeWindowTab::Month => "This Month",
        }
    }

    /// Caption under an aggregate value: "Events today", "12.00 this week"
    pub fn caption(&self) -> &'static str {
        match self {
            TimeWindowTab::Today => "today",
            TimeWindowTab::Week => "this week",
            TimeWindowTab::Month => "this month",
        }
    }

    /// Inclusive lower bound of the window, used for server-side filtering.
    pub fn range_start<Tz: TimeZone>(&self, windows: &TimeWindows<Tz>) -> DateTime<Utc> {
        match self {
            TimeWindowTab::Today => windows.today_start(),
            TimeWindowTab::Week => windows.week_start(),
            TimeWindowTab::Month => windows.month_start(),
        }
    }
}

/// Result of testing one timestamp against the three windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowMembership {
    pub is_today: bool,
    pub in_current_week: bool,
    pub in_current_month: bool,
}

/// Window boundaries for a fixed "now", computed once per fold.
#[derive(Debug, Clone)]
pub struct TimeWindows<Tz: TimeZone> {
    tz: Tz,
    today: NaiveDate,
    today_start: DateTime<Utc>,
    week_start: DateTime<Utc>,
    month_start: DateTime<Utc>,
}

impl<Tz: TimeZone> TimeWindows<Tz> {
    pub fn new(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        Self {
            today_start: local_midnight(&tz, today),
            week_start: local_midnight(&tz, week_start_date(today)),
            month_start: local_midnight(&tz, month_start_date(today)),
            today,
            tz,
        }
    }

    pub fn today_start(&self) -> DateTime<Utc> {
        self.today_start
    }

    pub fn week_start(&self) -> DateTime<Utc> {
        self.week_start
    }

    pub fn month_start(&self) -> DateTime<Utc> {
        self.month_start
    }

    pub fn is_today(&self, ts: &DateTime<Utc>) -> bool {
        ts.with_timezone(&self.tz).date_naive() == self.today
    }

    pub fn in_current_week(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.week_start
    }

    pub fn in_current_month(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.month_start
    }

    pub fn membership(&self, ts: &DateTime<Utc>) -> WindowMembership {
        WindowMembership {
            is_today: self.is_today(ts),
            in_current_week: self.in_current_week(ts),
            in_current_month: self.in_current_month(ts),
        }
    }
}

/// Start of the week containing `now` (Sunday, midnight).
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    TimeWindows::new(now).week_start()
}

/// Start of the month containing `now` (day 1, midnight).
pub fn month_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    TimeWindows::new(now).month_start()
}

pub fn is_today<Tz: TimeZone>(now: &DateTime<Tz>, ts: &DateTime<Utc>) -> bool {
    TimeWindows::new(now).is_today(ts)
}

pub fn membership<Tz: TimeZone>(now: &DateTime<Tz>, ts: &DateTime<Utc>) -> WindowMembership {
    TimeWindows::new(now).membership(ts)
}

fn week_start_date(today: NaiveDate) -> NaiveDate {
    let days_back = today.weekday().num_days_from_sunday();
    today - Duration::days(i64::from(days_back))
}

fn month_start_date(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

// Midnight may be skipped by a DST switch; take the first valid instant then.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_week_starts_on_sunday_midnight() {
        // Wednesday
        let now = utc("2024-05-15T12:00:00Z");
        assert_eq!(week_start(&now), utc("2024-05-12T00:00:00Z"));
    }

    #[test]
    fn test_week_start_on_sunday_is_same_day() {
        let now = utc("2024-05-12T08:30:00Z");
        assert_eq!(week_start(&now), utc("2024-05-12T00:00:00Z"));
    }

    #[test]
    fn test_week_boundary_is_inclusive() {
        let windows = TimeWindows::new(&utc("2024-05-15T12:00:00Z"));
        let start = windows.week_start();
        assert!(windows.in_current_week(&start));
        assert!(!windows.in_current_week(&(start - Duration::milliseconds(1))));
    }

    #[test]
    fn test_month_boundary_is_inclusive() {
        let windows = TimeWindows::new(&utc("2024-05-15T12:00:00Z"));
        let start = windows.month_start();
        assert_eq!(start, utc("2024-05-01T00:00:00Z"));
        assert!(windows.in_current_month(&start));
        assert!(!windows.in_current_month(&(start - Duration::milliseconds(1))));
    }

    #[test]
    fn test_flags_are_independent() {
        // Saturday the 1st: yesterday is in the week but in the previous month
        let now = utc("2024-06-01T10:00:00Z");
        let yesterday = utc("2024-05-31T18:00:00Z");
        let flags = membership(&now, &yesterday);
        assert_eq!(
            flags,
            WindowMembership {
                is_today: false,
                in_current_week: true,
                in_current_month: false,
            }
        );
    }

    #[test]
    fn test_future_timestamp_counts_in_week_and_month() {
        let now = utc("2024-05-15T12:00:00Z");
        let later = utc("2024-05-15T12:00:05Z");
        let flags = membership(&now, &later);
        assert!(flags.is_today && flags.in_current_week && flags.in_current_month);
    }

    #[test]
    fn test_today_uses_time_zone_of_now() {
        let msk = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = msk.with_ymd_and_hms(2024, 5, 15, 9, 0, 0).unwrap();
        // 01:30 local on the 15th
        assert!(is_today(&now, &utc("2024-05-14T22:30:00Z")));
        // 23:30 local on the 14th
        assert!(!is_today(&now, &utc("2024-05-14T20:30:00Z")));
        assert_eq!(month_start(&now), utc("2024-04-30T21:00:00Z"));
    }

    #[test]
    fn test_range_start_per_tab() {
        let windows = TimeWindows::new(&utc("2024-05-15T12:00:00Z"));
        assert_eq!(
            TimeWindowTab::Today.range_start(&windows),
            utc("2024-05-15T00:00:00Z")
        );
        assert_eq!(
            TimeWindowTab::Week.range_start(&windows),
            utc("2024-05-12T00:00:00Z")
        );
        assert_eq!(
            TimeWindowTab::Month.range_start(&windows),
            utc("2024-05-01T00:00:00Z")
        );
    }

    #[test]
    fn test_tab_wire_names() {
        for tab in TimeWindowTab::ALL {
            assert_eq!(TimeWindowTab::parse(tab.as_str()), Some(tab));
            let json = serde_json::to_string(&tab).unwrap();
            assert_eq!(json, format!("\"{}\"", tab.as_str()));
        }
        assert_eq!(TimeWindowTab::parse("year"), None);
    }
}

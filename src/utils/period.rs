use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

use crate::error::ApiError;

/// Source of "now" for the reporting endpoints.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the server's local timezone, matching BioTime punch times.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PeriodKind {
    Today,
    #[serde(rename = "last_7_days")]
    #[strum(serialize = "last_7_days")]
    Last7Days,
    MonthToDate,
    CurrentWeekToDate,
    PreviousWeek,
    CurrentMonthToDate,
    CustomMonth,
    PreviousMonth,
}

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub kind: PeriodKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportPeriod {
    fn whole_days(kind: PeriodKind, first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            kind,
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::default()))
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 00:00:00 to 23:59:59 of today.
pub fn today(now: NaiveDateTime) -> ReportPeriod {
    let day = now.date();
    ReportPeriod::whole_days(PeriodKind::Today, day, day)
}

/// The last seven days including today, up to now.
pub fn last_7_days(now: NaiveDateTime) -> ReportPeriod {
    ReportPeriod {
        kind: PeriodKind::Last7Days,
        start: start_of_day(now.date() - Days::new(6)),
        end: now,
    }
}

/// First of the current month up to now.
pub fn month_to_date(now: NaiveDateTime, kind: PeriodKind) -> ReportPeriod {
    ReportPeriod {
        kind,
        start: start_of_day(first_of_month(now.date())),
        end: now,
    }
}

/// This week's Monday up to now.
pub fn week_to_date(now: NaiveDateTime) -> ReportPeriod {
    ReportPeriod {
        kind: PeriodKind::CurrentWeekToDate,
        start: start_of_day(monday_of(now.date())),
        end: now,
    }
}

/// Most recent complete Monday to Sunday block before `today`.
pub fn previous_week(today: NaiveDate) -> ReportPeriod {
    let this_monday = monday_of(today);
    let first = this_monday - Days::new(7);
    let last = this_monday - Days::new(1);
    ReportPeriod::whole_days(PeriodKind::PreviousWeek, first, last)
}

/// Most recent complete calendar month before the one containing `today`.
pub fn previous_month(today: NaiveDate) -> ReportPeriod {
    let last = first_of_month(today) - Days::new(1);
    ReportPeriod::whole_days(PeriodKind::PreviousMonth, first_of_month(last), last)
}

/// The whole of `month`/`year`, first to last day.
pub fn full_month(year: i32, month: u32) -> Result<ReportPeriod, ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::BadRequest(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ApiError::BadRequest(format!("year {} is out of range", year)))?;
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or_else(|| ApiError::BadRequest(format!("year {} is out of range", year)))?;
    let last = next - Days::new(1);
    Ok(ReportPeriod::whole_days(PeriodKind::CustomMonth, first, last))
}

/// Every calendar date in `[first, last]`. Empty when `first > last`.
pub fn dates_between(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |d| *d <= last)
}

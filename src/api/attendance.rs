use actix_web::{HttpResponse, web};
use chrono::Datelike;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    aggregator::{absent_on, summaries_where, summarize_punches},
    biotime::AttendanceSource,
    config::Config,
    error::ApiError,
    model::{
        attendance::{AbsentEmployee, PunchSummary},
        transaction::Transaction,
    },
    utils::{
        period::{self, Clock, PeriodKind, ReportPeriod},
        punch_time::format_date,
    },
};

#[derive(Serialize, ToSchema)]
pub struct DaySummaryResponse {
    #[schema(example = "2025-12-11")]
    pub date: String,
    #[schema(example = "2025-12-11")]
    pub start_date: String,
    #[schema(example = "2025-12-11")]
    pub end_date: String,
    #[schema(example = 1)]
    pub count: usize,
    pub data: Vec<PunchSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct PresentResponse {
    #[schema(example = "2025-12-11")]
    pub date: String,
    pub count: usize,
    pub data: Vec<PunchSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct AbsentResponse {
    #[schema(example = "2025-12-11")]
    pub date: String,
    /// False on configured days off, where nobody is counted absent
    pub working_day: bool,
    pub count: usize,
    pub data: Vec<AbsentEmployee>,
}

#[derive(Serialize, ToSchema)]
pub struct LateResponse {
    #[schema(example = "2025-12-11")]
    pub date: String,
    pub count: usize,
    pub data: Vec<PunchSummary>,
    #[schema(example = "08:00:00")]
    pub work_start_time: String,
    #[schema(example = "08:05:00")]
    pub late_after_time: String,
}

#[derive(Serialize, ToSchema)]
pub struct EarlyLeaveResponse {
    #[schema(example = "2025-12-11")]
    pub date: String,
    pub count: usize,
    pub data: Vec<PunchSummary>,
    #[schema(example = "17:00:00")]
    pub early_leave_before: String,
}

#[derive(Serialize, ToSchema)]
pub struct PeriodSummaryResponse {
    pub period: PeriodKind,
    #[schema(example = "2025-12-05")]
    pub start_date: String,
    #[schema(example = "2025-12-11")]
    pub end_date: String,
    pub count: usize,
    pub data: Vec<PunchSummary>,
}

async fn fetch_window(
    source: &dyn AttendanceSource,
    window: &ReportPeriod,
) -> Result<Vec<Transaction>, ApiError> {
    Ok(source.all_transactions(window.start, window.end).await?)
}

/// Today's first/last punch per employee
#[utoipa::path(
    get,
    path = "/attendance/today",
    responses(
        (status = 200, description = "Employees who punched today", body = DaySummaryResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn today(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, ApiError> {
    let window = period::today(clock.now());
    let transactions = fetch_window(source.get_ref(), &window).await?;
    let data = summarize_punches(&transactions);
    let date = format_date(&window.start_date());

    Ok(HttpResponse::Ok().json(DaySummaryResponse {
        start_date: date.clone(),
        end_date: date.clone(),
        date,
        count: data.len(),
        data,
    }))
}

/// Employees with at least one punch today
#[utoipa::path(
    get,
    path = "/attendance/today/present",
    responses(
        (status = 200, body = PresentResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn today_present(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, ApiError> {
    let window = period::today(clock.now());
    let transactions = fetch_window(source.get_ref(), &window).await?;
    let data = summarize_punches(&transactions);

    Ok(HttpResponse::Ok().json(PresentResponse {
        date: format_date(&window.start_date()),
        count: data.len(),
        data,
    }))
}

/// Roster employees with no punch today
#[utoipa::path(
    get,
    path = "/attendance/today/absent",
    responses(
        (status = 200, body = AbsentResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn today_absent(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let window = period::today(clock.now());
    let day = window.start_date();

    let employees = source.all_employees().await?;
    let transactions = fetch_window(source.get_ref(), &window).await?;
    let data = absent_on(&transactions, &employees, day, &config.rules);
    info!(date = %day, absent = data.len(), roster = employees.len(), "Computed absentees");

    Ok(HttpResponse::Ok().json(AbsentResponse {
        date: format_date(&day),
        working_day: config.rules.working_weekdays.is_working(day.weekday()),
        count: data.len(),
        data,
    }))
}

/// Employees whose first in-punch today is after the late cutoff
#[utoipa::path(
    get,
    path = "/attendance/today/late",
    responses(
        (status = 200, body = LateResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn today_late(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let window = period::today(clock.now());
    let day = window.start_date();
    let transactions = fetch_window(source.get_ref(), &window).await?;
    let data = summaries_where(&transactions, day, &config.rules, |r| r.late);

    Ok(HttpResponse::Ok().json(LateResponse {
        date: format_date(&day),
        count: data.len(),
        data,
        work_start_time: config.rules.work_start_time.to_string(),
        late_after_time: config.rules.late_after_time.to_string(),
    }))
}

/// Employees whose last out-punch today is before the early-leave cutoff
#[utoipa::path(
    get,
    path = "/attendance/today/early-leave",
    responses(
        (status = 200, body = EarlyLeaveResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn today_early_leave(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let window = period::today(clock.now());
    let day = window.start_date();
    let transactions = fetch_window(source.get_ref(), &window).await?;
    let data = summaries_where(&transactions, day, &config.rules, |r| r.early_leave);

    Ok(HttpResponse::Ok().json(EarlyLeaveResponse {
        date: format_date(&day),
        count: data.len(),
        data,
        early_leave_before: config.rules.early_leave_time.to_string(),
    }))
}

async fn period_summary(
    source: &dyn AttendanceSource,
    window: ReportPeriod,
) -> Result<HttpResponse, ApiError> {
    let transactions = fetch_window(source, &window).await?;
    let data = summarize_punches(&transactions);

    Ok(HttpResponse::Ok().json(PeriodSummaryResponse {
        period: window.kind,
        start_date: format_date(&window.start_date()),
        end_date: format_date(&window.end_date()),
        count: data.len(),
        data,
    }))
}

/// First/last punch per employee over the last 7 days
#[utoipa::path(
    get,
    path = "/attendance/week",
    responses(
        (status = 200, body = PeriodSummaryResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn last_7_days(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, ApiError> {
    period_summary(source.get_ref(), period::last_7_days(clock.now())).await
}

/// First/last punch per employee for the month to date
#[utoipa::path(
    get,
    path = "/attendance/month",
    responses(
        (status = 200, body = PeriodSummaryResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Attendance"
)]
pub async fn month_to_date(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, ApiError> {
    period_summary(
        source.get_ref(),
        period::month_to_date(clock.now(), PeriodKind::MonthToDate),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        biotime::source::tests::MemorySource,
        model::employee::Employee,
        routes::tests::{call_json, test_app},
    };
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn employee(code: &str, first: &str) -> Employee {
        Employee {
            emp_code: Some(code.into()),
            first_name: Some(first.into()),
            last_name: Some("Test".into()),
            department: Some(serde_json::json!({ "dept_name": "Operations" })),
            ..Default::default()
        }
    }

    fn punch(code: &str, time: &str, state: &str) -> Transaction {
        Transaction {
            emp_code: Some(code.into()),
            first_name: Some(format!("emp-{}", code)),
            punch_time: Some(time.into()),
            punch_state: Some(state.into()),
            terminal_alias: Some("Main Gate".into()),
            ..Default::default()
        }
    }

    /// Thursday 2025-12-11: 1001 on time, 1002 late, 1003 left early, 1004 absent.
    fn thursday() -> MemorySource {
        MemorySource::new(
            vec![
                employee("1001", "Amina"),
                employee("1002", "Bashir"),
                employee("1003", "Chen"),
                employee("1004", "Dina"),
            ],
            vec![
                punch("1001", "2025-12-11 07:58:00", "0"),
                punch("1001", "2025-12-11 17:02:00", "1"),
                punch("1002", "2025-12-11 08:10:00", "0"),
                punch("1002", "2025-12-11 17:15:00", "1"),
                punch("1003", "2025-12-11 07:50:00", "0"),
                punch("1003", "2025-12-11 15:45:00", "1"),
            ],
        )
    }

    fn codes(body: &serde_json::Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["emp_code"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn today_lists_everyone_who_punched() {
        let app = test_app!(Arc::new(thursday()));

        let (status, body) = call_json!(&app, "/attendance/today");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2025-12-11");
        assert_eq!(body["count"], 3);
        assert_eq!(codes(&body), vec!["1001", "1002", "1003"]);
        assert_eq!(body["data"][0]["first_punch_time"], "2025-12-11 07:58:00");
        assert_eq!(body["data"][0]["last_punch_time"], "2025-12-11 17:02:00");
        assert_eq!(body["data"][0]["total_punches"], 2);

        let (_, present) = call_json!(&app, "/attendance/today/present");
        assert_eq!(present["count"], 3);
    }

    #[actix_web::test]
    async fn today_late_uses_cutoff() {
        let app = test_app!(Arc::new(thursday()));

        let (status, body) = call_json!(&app, "/attendance/today/late");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(codes(&body), vec!["1002"]);
        assert_eq!(body["late_after_time"], "08:05:00");
    }

    #[actix_web::test]
    async fn today_early_leave_uses_cutoff() {
        let app = test_app!(Arc::new(thursday()));

        let (_, body) = call_json!(&app, "/attendance/today/early-leave");
        assert_eq!(codes(&body), vec!["1003"]);
        assert_eq!(body["early_leave_before"], "17:00:00");
    }

    #[actix_web::test]
    async fn late_and_early_rows_follow_punch_direction() {
        let source = MemorySource::new(
            vec![employee("1005", "Eli"), employee("1006", "Farah")],
            vec![
                punch("1005", "2025-12-11 07:00:00", "1"),
                punch("1005", "2025-12-11 09:00:00", "0"),
                punch("1005", "2025-12-11 17:30:00", "1"),
                punch("1006", "2025-12-11 08:00:00", "0"),
                punch("1006", "2025-12-11 16:00:00", "1"),
                punch("1006", "2025-12-11 18:00:00", "0"),
            ],
        );
        let app = test_app!(Arc::new(source));

        let (_, late) = call_json!(&app, "/attendance/today/late");
        assert_eq!(codes(&late), vec!["1005"]);
        let row = &late["data"][0];
        assert_eq!(row["first_punch_time"], "2025-12-11 07:00:00");
        assert_eq!(row["first_in_time"], "2025-12-11 09:00:00");
        assert_eq!(row["late_by"], "0:55:00");
        assert!(row.get("left_early_by").is_none());

        let (_, early) = call_json!(&app, "/attendance/today/early-leave");
        assert_eq!(codes(&early), vec!["1006"]);
        let row = &early["data"][0];
        assert_eq!(row["last_punch_time"], "2025-12-11 18:00:00");
        assert_eq!(row["last_out_time"], "2025-12-11 16:00:00");
        assert_eq!(row["left_early_by"], "1:00:00");

        let (_, today) = call_json!(&app, "/attendance/today");
        assert!(today["data"][0].get("first_in_time").is_none());
    }

    #[actix_web::test]
    async fn today_absent_lists_roster_without_punches() {
        let app = test_app!(Arc::new(thursday()));

        let (_, body) = call_json!(&app, "/attendance/today/absent");
        assert_eq!(body["working_day"], true);
        assert_eq!(codes(&body), vec!["1004"]);
        assert_eq!(body["data"][0]["first_name"], "Dina");
        assert_eq!(body["data"][0]["department"], "Operations");
    }

    #[actix_web::test]
    async fn nobody_is_absent_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2025, 12, 14).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let app = test_app!(Arc::new(thursday()), Some(sunday));

        let (_, body) = call_json!(&app, "/attendance/today/absent");
        assert_eq!(body["working_day"], false);
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn week_and_month_summaries_carry_their_period() {
        let source = Arc::new(thursday());
        let app = test_app!(source.clone());

        let (_, week) = call_json!(&app, "/attendance/week");
        assert_eq!(week["period"], "last_7_days");
        assert_eq!(week["start_date"], "2025-12-05");
        assert_eq!(week["end_date"], "2025-12-11");

        let (_, month) = call_json!(&app, "/attendance/month");
        assert_eq!(month["period"], "month_to_date");
        assert_eq!(month["start_date"], "2025-12-01");
        assert_eq!(month["count"], 3);

        let queries = source.queries.lock().unwrap();
        assert_eq!(queries.last().unwrap().end_time.as_deref(), Some("2025-12-11 10:30:00"));
    }

    #[actix_web::test]
    async fn upstream_failure_is_bad_gateway() {
        let app = test_app!(Arc::new(MemorySource::failing()));

        let (status, _) = call_json!(&app, "/attendance/today/late");
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}

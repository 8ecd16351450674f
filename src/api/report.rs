use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    aggregator::{build_reports, compute_stats, flagged},
    biotime::AttendanceSource,
    config::Config,
    error::ApiError,
    model::attendance::EmployeeReport,
    utils::{
        period::{self, Clock, PeriodKind, ReportPeriod},
        punch_time::format_punch_time,
    },
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthlyQuery {
    /// Month number 1-12; requires `year`
    #[schema(example = 11)]
    pub month: Option<u32>,
    /// Four digit year; requires `month`
    #[schema(example = 2025)]
    pub year: Option<i32>,
}

/// Employees late or absent at least once in the period.
#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub period: PeriodKind,
    #[schema(example = "2025-11-01 00:00:00")]
    pub period_start: String,
    #[schema(example = "2025-11-30 23:59:59")]
    pub period_end: String,
    #[schema(example = 1)]
    pub count: usize,
    pub data: Vec<EmployeeReport>,
}

async fn flagged_report(
    source: &dyn AttendanceSource,
    config: &Config,
    window: ReportPeriod,
) -> Result<HttpResponse, ApiError> {
    let employees = source.all_employees().await?;
    let transactions = source.all_transactions(window.start, window.end).await?;

    let stats = compute_stats(
        &transactions,
        &employees,
        window.start_date(),
        window.end_date(),
        &config.rules,
    );
    let data = flagged(build_reports(&employees, stats));

    info!(
        period = %window.kind,
        start = %window.start_date(),
        end = %window.end_date(),
        roster = employees.len(),
        transactions = transactions.len(),
        flagged = data.len(),
        "Attendance report built"
    );

    Ok(HttpResponse::Ok().json(ReportResponse {
        period: window.kind,
        period_start: format_punch_time(&window.start),
        period_end: format_punch_time(&window.end),
        count: data.len(),
        data,
    }))
}

/// Current week (Monday to now): employees late or absent
#[utoipa::path(
    get,
    path = "/attendance/report/weekly",
    responses(
        (status = 200, body = ReportResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Report"
)]
pub async fn weekly(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    flagged_report(source.get_ref(), &config, period::week_to_date(clock.now())).await
}

/// Previous complete Monday-Sunday week: employees late or absent
#[utoipa::path(
    get,
    path = "/attendance/report/weekly-previous",
    responses(
        (status = 200, body = ReportResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Report"
)]
pub async fn weekly_previous(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    flagged_report(source.get_ref(), &config, period::previous_week(clock.today())).await
}

/// Resolves the monthly window: a full month when both parts are given,
/// otherwise the current month to date.
pub fn monthly_window(query: &MonthlyQuery, clock: &dyn Clock) -> Result<ReportPeriod, ApiError> {
    match (query.month, query.year) {
        (Some(month), Some(year)) => period::full_month(year, month),
        (None, None) => Ok(period::month_to_date(
            clock.now(),
            PeriodKind::CurrentMonthToDate,
        )),
        _ => Err(ApiError::BadRequest(
            "month and year must be given together".to_string(),
        )),
    }
}

/// Month report: employees late or absent
#[utoipa::path(
    get,
    path = "/attendance/report/monthly",
    params(MonthlyQuery),
    responses(
        (status = 200, body = ReportResponse),
        (status = 400, description = "Invalid month/year", body = Object, example = json!({
            "error": "bad request",
            "detail": "month must be between 1 and 12, got 13"
        })),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Report"
)]
pub async fn monthly(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
    query: web::Query<MonthlyQuery>,
) -> Result<HttpResponse, ApiError> {
    let window = monthly_window(&query, clock.get_ref())?;
    flagged_report(source.get_ref(), &config, window).await
}

/// Previous complete calendar month: employees late or absent
#[utoipa::path(
    get,
    path = "/attendance/report/monthly-previous",
    responses(
        (status = 200, body = ReportResponse),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Report"
)]
pub async fn monthly_previous(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    flagged_report(source.get_ref(), &config, period::previous_month(clock.today())).await
}

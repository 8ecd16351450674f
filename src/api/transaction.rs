use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::{
    biotime::{AttendanceSource, TransactionQuery, source::TRANSACTION_PAGE_SIZE},
    error::ApiError,
    utils::{
        period::{self, Clock},
        punch_time::{format_punch_time, parse_punch_time},
    },
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TransactionsQuery {
    /// Only punches of this employee
    #[schema(example = "1001")]
    pub emp_code: Option<String>,
    /// Window start, `YYYY-MM-DD HH:MM:SS`
    #[schema(example = "2025-12-01 00:00:00")]
    pub start_time: Option<String>,
    /// Window end, `YYYY-MM-DD HH:MM:SS`
    #[schema(example = "2025-12-07 23:59:59")]
    pub end_time: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 100)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 500)]
    pub page_size: Option<u32>,
}

/// Re-formats a caller supplied timestamp, rejecting anything unparseable.
fn normalize_time(name: &str, raw: Option<&str>) -> Result<Option<String>, ApiError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(r) => parse_punch_time(r)
            .map(|dt| Some(format_punch_time(&dt)))
            .ok_or_else(|| {
                ApiError::BadRequest(format!("{} must look like YYYY-MM-DD HH:MM:SS, got '{}'", name, r))
            }),
    }
}

/// Raw punch transactions from BioTime
#[utoipa::path(
    get,
    path = "/transactions",
    params(TransactionsQuery),
    responses(
        (status = 200, description = "One page of punch transactions", body = TransactionPage),
        (status = 400, description = "Malformed start_time or end_time"),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Transaction"
)]
pub async fn list_transactions(
    source: web::Data<dyn AttendanceSource>,
    query: web::Query<TransactionsQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = TransactionQuery {
        emp_code: query.emp_code.clone().filter(|c| !c.trim().is_empty()),
        start_time: normalize_time("start_time", query.start_time.as_deref())?,
        end_time: normalize_time("end_time", query.end_time.as_deref())?,
        page: query.page.unwrap_or(1).max(1),
        page_size: query.page_size.unwrap_or(100).clamp(1, TRANSACTION_PAGE_SIZE),
    };
    debug!(?query, "Fetching transactions");

    let page = source.transactions_page(&query).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Today's raw punch transactions
#[utoipa::path(
    get,
    path = "/transactions/today",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of today's punch transactions", body = TransactionPage),
        (status = 502, description = "BioTime unavailable")
    ),
    tag = "Transaction"
)]
pub async fn todays_transactions(
    source: web::Data<dyn AttendanceSource>,
    clock: web::Data<dyn Clock>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let today = period::today(clock.now());
    let query = TransactionQuery::between(
        today.start,
        today.end,
        query.page.unwrap_or(1).max(1),
        query.page_size.unwrap_or(500).clamp(1, TRANSACTION_PAGE_SIZE),
    );

    let page = source.transactions_page(&query).await?;

    Ok(HttpResponse::Ok().json(page))
}

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::{
    biotime::{AttendanceSource, source::EMPLOYEE_PAGE_SIZE},
    error::ApiError,
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Page number, starting at 1
    #[schema(example = 1)]
    pub page: Option<u32>,
    /// Items per page (max 1000)
    #[schema(example = 100)]
    pub page_size: Option<u32>,
}

/// List employees straight from BioTime
#[utoipa::path(
    get,
    path = "/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "One page of BioTime employees", body = EmployeePage),
        (status = 502, description = "BioTime unavailable", body = Object, example = json!({
            "error": "attendance server unavailable",
            "detail": "BioTime returned status 401: Unable to log in with provided credentials."
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    source: web::Data<dyn AttendanceSource>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(100).clamp(1, EMPLOYEE_PAGE_SIZE);
    debug!(page, page_size, "Fetching employees");

    let employees = source.employees_page(page, page_size).await?;

    Ok(HttpResponse::Ok().json(employees))
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
    use std::sync::Arc;

    fn roster(n: usize) -> Vec<Employee> {
        (0..n)
            .map(|i| Employee {
                emp_code: Some(format!("{:04}", i)),
                ..Default::default()
            })
            .collect()
    }

    #[actix_web::test]
    async fn pages_through_roster() {
        let app = test_app!(Arc::new(MemorySource::new(roster(5), Vec::new())));

        let (status, body) = call_json!(&app, "/employees?page=2&page_size=2");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 5);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["emp_code"], "0002");
        assert!(body["next"].is_string());
    }

    #[actix_web::test]
    async fn upstream_failure_is_bad_gateway() {
        let app = test_app!(Arc::new(MemorySource::failing()));

        let (status, body) = call_json!(&app, "/employees");
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "attendance server unavailable");
    }
}

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{
    biotime::BiotimeError,
    model::{employee::Employee, page::Page, transaction::Transaction},
    utils::punch_time::format_punch_time,
};

pub const EMPLOYEE_PAGE_SIZE: u32 = 1000;
pub const TRANSACTION_PAGE_SIZE: u32 = 2000;

/// Upper bound on pages walked by the `all_*` helpers.
const MAX_PAGES: u32 = 500;

/// Filters for the transactions endpoint. Times use the BioTime wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub emp_code: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl TransactionQuery {
    pub fn between(start: NaiveDateTime, end: NaiveDateTime, page: u32, page_size: u32) -> Self {
        Self {
            emp_code: None,
            start_time: Some(format_punch_time(&start)),
            end_time: Some(format_punch_time(&end)),
            page,
            page_size,
        }
    }

    /// Query parameters in the order BioTime documents them; unset filters are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(code) = self.emp_code.as_deref().filter(|c| !c.is_empty()) {
            params.push(("emp_code", code.to_string()));
        }
        if let Some(start) = self.start_time.as_deref().filter(|s| !s.is_empty()) {
            params.push(("start_time", start.to_string()));
        }
        if let Some(end) = self.end_time.as_deref().filter(|s| !s.is_empty()) {
            params.push(("end_time", end.to_string()));
        }
        params
    }
}

/// Where employees and punch transactions come from.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    async fn employees_page(&self, page: u32, page_size: u32) -> Result<Page<Employee>, BiotimeError>;

    async fn transactions_page(&self, query: &TransactionQuery) -> Result<Page<Transaction>, BiotimeError>;

    /// Most pages the `all_*` helpers walk before giving up.
    fn page_limit(&self) -> u32 {
        MAX_PAGES
    }

    /// Walks every employee page.
    async fn all_employees(&self) -> Result<Vec<Employee>, BiotimeError> {
        let mut all = Vec::new();
        for page in 1..=self.page_limit() {
            let resp = self.employees_page(page, EMPLOYEE_PAGE_SIZE).await?;
            let more = resp.has_next();
            let empty = resp.data.is_empty();
            all.extend(resp.data);
            if !more || empty {
                return Ok(all);
            }
        }
        tracing::warn!(pages = self.page_limit(), "Employee paging hit the page limit");
        Err(BiotimeError::PageLimit {
            resource: "employees",
            pages: self.page_limit(),
        })
    }

    /// Walks every transaction page between `start` and `end`.
    async fn all_transactions(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>, BiotimeError> {
        let mut all = Vec::new();
        for page in 1..=self.page_limit() {
            let query = TransactionQuery::between(start, end, page, TRANSACTION_PAGE_SIZE);
            let resp = self.transactions_page(&query).await?;
            let more = resp.has_next();
            let empty = resp.data.is_empty();
            all.extend(resp.data);
            if !more || empty {
                tracing::debug!(count = all.len(), %start, %end, "Fetched transactions");
                return Ok(all);
            }
        }
        tracing::warn!(pages = self.page_limit(), %start, %end, "Transaction paging hit the page limit");
        Err(BiotimeError::PageLimit {
            resource: "transactions",
            pages: self.page_limit(),
        })
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{employee::Employee, transaction::Transaction};

/// Paginated envelope used by every BioTime list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(EmployeePage = Page<Employee>, TransactionPage = Page<Transaction>)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|n| !n.is_empty())
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: None,
            next: None,
            previous: None,
            data: Vec::new(),
        }
    }
}

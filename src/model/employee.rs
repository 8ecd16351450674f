use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Employee record as returned by `/personnel/api/employees/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 12,
        "emp_code": "1001",
        "first_name": "Amina",
        "last_name": "Rahman",
        "department": { "id": 1, "dept_code": "1", "dept_name": "Operations" }
    })
)]
pub struct Employee {
    #[serde(default)]
    #[schema(example = 12)]
    pub id: Option<u64>,

    #[serde(default)]
    #[schema(example = "1001")]
    pub emp_code: Option<String>,

    #[serde(default)]
    #[schema(example = "Amina")]
    pub first_name: Option<String>,

    #[serde(default)]
    #[schema(example = "Rahman")]
    pub last_name: Option<String>,

    /// Usually `{id, dept_code, dept_name}`; some servers send a bare name.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub department: Option<Value>,
}

impl Employee {
    /// Employee code, or `None` when missing or blank.
    pub fn code(&self) -> Option<&str> {
        self.emp_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn department_name(&self) -> Option<String> {
        match self.department.as_ref()? {
            Value::Object(map) => map
                .get("dept_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::String(name) if !name.is_empty() => Some(name.clone()),
            _ => None,
        }
    }
}

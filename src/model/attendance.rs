use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

/// Classification of one employee on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub emp_code: String,
    pub date: NaiveDate,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
    pub present: bool,
    pub late: bool,
    pub absent: bool,
    pub early_leave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LateDetail {
    #[schema(example = "2025-12-11")]
    pub date: String,
    #[schema(example = "2025-12-11 08:10:00")]
    pub punch_time: String,
    #[schema(example = "0:05:00")]
    pub late_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EarlyLeaveDetail {
    #[schema(example = "2025-12-11")]
    pub date: String,
    #[schema(example = "2025-12-11 16:30:00")]
    pub punch_time: String,
    #[schema(example = "0:30:00")]
    pub left_early_by: String,
}

/// Per-employee counts over an inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RangeSummary {
    #[serde(skip)]
    pub emp_code: String,

    #[schema(example = 26)]
    pub work_days_required: u32,

    #[serde(rename = "present")]
    #[schema(example = 24)]
    pub days_present: u32,

    #[serde(rename = "late")]
    #[schema(example = 3)]
    pub days_late: u32,

    #[serde(rename = "absent")]
    #[schema(example = 2)]
    pub days_absent: u32,

    #[serde(rename = "early_leave")]
    #[schema(example = 1)]
    pub days_early_leave: u32,

    pub late_details: Vec<LateDetail>,

    #[schema(example = json!(["2025-11-03", "2025-11-17"]))]
    pub absent_details: Vec<String>,

    pub early_leave_details: Vec<EarlyLeaveDetail>,
}

impl RangeSummary {
    /// Late at least once or absent at least once.
    pub fn is_flagged(&self) -> bool {
        self.days_late > 0 || self.days_absent > 0
    }
}

/// Roster details joined with the employee's range summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeReport {
    #[schema(example = "1001")]
    pub emp_code: String,
    #[schema(example = "Amina")]
    pub first_name: String,
    #[schema(example = "Rahman")]
    pub last_name: String,
    #[schema(example = "Operations", nullable = true)]
    pub department: Option<String>,
    pub stats: RangeSummary,
}

/// First and last punch of one employee inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PunchSummary {
    #[schema(example = "1001")]
    pub emp_code: String,
    #[schema(example = "Amina", nullable = true)]
    pub first_name: Option<String>,
    #[schema(example = "Operations", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "2025-12-11 08:10:00")]
    pub first_punch_time: String,
    #[schema(example = "Main Gate", nullable = true)]
    pub first_terminal_alias: Option<String>,
    #[schema(example = "2025-12-11 17:04:12")]
    pub last_punch_time: String,
    #[schema(example = "Main Gate", nullable = true)]
    pub last_terminal_alias: Option<String>,
    #[schema(example = 2)]
    pub total_punches: u32,
    /// Earliest in-punch of the day; set on late/early-leave rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2025-12-11 08:10:00", nullable = true)]
    pub first_in_time: Option<String>,
    /// Latest out-punch of the day; set on late/early-leave rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2025-12-11 17:04:12", nullable = true)]
    pub last_out_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "0:05:00", nullable = true)]
    pub late_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "0:30:00", nullable = true)]
    pub left_early_by: Option<String>,
}

/// Roster employee with no punch in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AbsentEmployee {
    #[schema(example = "1002")]
    pub emp_code: String,
    #[schema(nullable = true)]
    pub first_name: Option<String>,
    #[schema(nullable = true)]
    pub last_name: Option<String>,
    #[schema(nullable = true)]
    pub department: Option<String>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::punch_time::parse_punch_time;

/// Punch record as returned by `/iclock/api/transactions/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 5521,
        "emp_code": "1001",
        "first_name": "Amina",
        "last_name": "Rahman",
        "department": "Operations",
        "punch_time": "2025-12-11 08:10:00",
        "punch_state": "0",
        "punch_state_display": "Check In",
        "terminal_sn": "CQUJ220760012",
        "terminal_alias": "Main Gate"
    })
)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub emp_code: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    /// `%Y-%m-%d %H:%M:%S` in the device's local time.
    #[serde(default)]
    pub punch_time: Option<String>,
    #[serde(default)]
    pub punch_state: Option<String>,
    #[serde(default)]
    pub punch_state_display: Option<String>,
    #[serde(default)]
    pub terminal_sn: Option<String>,
    #[serde(default)]
    pub terminal_alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchDirection {
    In,
    Out,
    Other,
}

impl PunchDirection {
    /// Maps BioTime `punch_state` codes. Check-in, break-in and overtime-in
    /// count as in; check-out, break-out and overtime-out count as out.
    pub fn from_state(state: Option<&str>) -> Self {
        match state.map(str::trim) {
            Some("0") | Some("3") | Some("4") => PunchDirection::In,
            Some("1") | Some("2") | Some("5") => PunchDirection::Out,
            _ => PunchDirection::Other,
        }
    }
}

/// A validated punch: known employee, parseable timestamp.
#[derive(Debug, Clone)]
pub struct Punch<'a> {
    pub emp_code: &'a str,
    pub time: NaiveDateTime,
    pub direction: PunchDirection,
    pub source: &'a Transaction,
}

impl Transaction {
    /// Returns `None` when the employee code is blank or the timestamp is malformed.
    pub fn punch(&self) -> Option<Punch<'_>> {
        let emp_code = self
            .emp_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())?;
        let time = parse_punch_time(self.punch_time.as_deref()?)?;
        Some(Punch {
            emp_code,
            time,
            direction: PunchDirection::from_state(self.punch_state.as_deref()),
            source: self,
        })
    }
}

use crate::api::attendance::{
    AbsentResponse, DaySummaryResponse, EarlyLeaveResponse, LateResponse, PeriodSummaryResponse,
    PresentResponse,
};
use crate::api::employee::EmployeeQuery;
use crate::api::report::{MonthlyQuery, ReportResponse};
use crate::api::transaction::{PageQuery, TransactionsQuery};
use crate::model::attendance::{
    AbsentEmployee, EarlyLeaveDetail, EmployeeReport, LateDetail, PunchSummary, RangeSummary,
};
use crate::model::employee::Employee;
use crate::model::page::{EmployeePage, TransactionPage};
use crate::model::transaction::Transaction;
use crate::utils::period::PeriodKind;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BioTime Attendance Reports API",
        version = "0.1.0",
        description = r#"
## Attendance reporting over BioTime

Read-only reporting service in front of a **ZKTeco BioTime** server. Punch
transactions are pulled on demand for the requested window and every
employee-day is classified against the configured thresholds.

### 🔹 Key Features
- **Day view**
  - Who punched today, who is late, who left early, who is absent
- **Reports**
  - Current and previous week, month to date, any full month, previous month
  - Only employees with at least one late arrival or absence are listed
- **Passthrough**
  - Raw employee and transaction pages from BioTime

### ⏱ Rules
- Late: first in-punch after `LATE_AFTER_TIME` (default 08:05:00)
- Early leave: last out-punch before `EARLY_LEAVE_TIME` (default 17:00:00)
- Working days: `WORKING_WEEKDAYS` (default Monday to Saturday)

### 📦 Response Format
- JSON responses; upstream failures answer `502` with `{error, detail}`
"#,
    ),
    paths(
        crate::api::attendance::today,
        crate::api::attendance::today_present,
        crate::api::attendance::today_absent,
        crate::api::attendance::today_late,
        crate::api::attendance::today_early_leave,
        crate::api::attendance::last_7_days,
        crate::api::attendance::month_to_date,

        crate::api::report::weekly,
        crate::api::report::weekly_previous,
        crate::api::report::monthly,
        crate::api::report::monthly_previous,

        crate::api::employee::list_employees,

        crate::api::transaction::list_transactions,
        crate::api::transaction::todays_transactions
    ),
    components(
        schemas(
            DaySummaryResponse,
            PresentResponse,
            AbsentResponse,
            LateResponse,
            EarlyLeaveResponse,
            PeriodSummaryResponse,
            ReportResponse,
            MonthlyQuery,
            EmployeeQuery,
            TransactionsQuery,
            PageQuery,
            EmployeeReport,
            RangeSummary,
            LateDetail,
            EarlyLeaveDetail,
            PunchSummary,
            AbsentEmployee,
            PeriodKind,
            Employee,
            Transaction,
            EmployeePage,
            TransactionPage
        )
    ),
    tags(
        (name = "Attendance", description = "Day and period attendance views"),
        (name = "Report", description = "Late/absent reports"),
        (name = "Employee", description = "BioTime employee passthrough"),
        (name = "Transaction", description = "BioTime transaction passthrough"),
    )
)]
pub struct ApiDoc;

//! Attendance classification and range aggregation.
//!
//! Everything here is pure: callers fetch employees and transactions, pick
//! the date range, and get deterministic summaries back.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::{
    config::AttendanceRules,
    model::{
        attendance::{
            AbsentEmployee, DailyRecord, EarlyLeaveDetail, EmployeeReport, LateDetail, PunchSummary,
            RangeSummary,
        },
        employee::Employee,
        transaction::{Punch, PunchDirection, Transaction},
    },
    utils::{
        period::dates_between,
        punch_time::{format_date, format_duration, format_punch_time},
    },
};

/// emp_code -> date -> punches of that day.
type PunchIndex<'a> = HashMap<&'a str, BTreeMap<NaiveDate, Vec<Punch<'a>>>>;

fn index_punches(transactions: &[Transaction]) -> PunchIndex<'_> {
    let mut index: PunchIndex<'_> = HashMap::new();
    let mut skipped = 0usize;

    for tx in transactions {
        match tx.punch() {
            Some(punch) => index
                .entry(punch.emp_code)
                .or_default()
                .entry(punch.time.date())
                .or_default()
                .push(punch),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, total = transactions.len(), "Dropped malformed transactions");
    }

    index
}

/// Classifies one employee-day.
///
/// The earliest in-punch is the earliest punch not explicitly marked as an
/// out-punch, and the latest out-punch is the latest punch not explicitly
/// marked as an in-punch; when every punch carries the opposite direction the
/// overall earliest/latest punch is used. On a non-working day only
/// `present` can be set.
pub fn classify_day(
    emp_code: &str,
    date: NaiveDate,
    punches: &[Punch<'_>],
    rules: &AttendanceRules,
) -> DailyRecord {
    let working = rules.working_weekdays.is_working(date.weekday());

    let earliest = punches.iter().map(|p| p.time).min();
    let latest = punches.iter().map(|p| p.time).max();

    let first_in = punches
        .iter()
        .filter(|p| p.direction != PunchDirection::Out)
        .map(|p| p.time)
        .min()
        .or(earliest);
    let last_out = punches
        .iter()
        .filter(|p| p.direction != PunchDirection::In)
        .map(|p| p.time)
        .max()
        .or(latest);

    let present = !punches.is_empty();

    DailyRecord {
        emp_code: emp_code.to_string(),
        date,
        first_in,
        last_out,
        present,
        late: working && first_in.is_some_and(|t| t.time() > rules.late_after_time),
        absent: working && !present,
        early_leave: working && last_out.is_some_and(|t| t.time() < rules.early_leave_time),
    }
}

fn accumulate(summary: &mut RangeSummary, record: &DailyRecord, rules: &AttendanceRules) {
    if rules.working_weekdays.is_working(record.date.weekday()) {
        summary.work_days_required += 1;
    }
    if record.present {
        summary.days_present += 1;
    }
    if record.absent {
        summary.days_absent += 1;
        summary.absent_details.push(format_date(&record.date));
    }
    if record.late {
        if let Some(first_in) = record.first_in {
            summary.days_late += 1;
            summary.late_details.push(LateDetail {
                date: format_date(&record.date),
                punch_time: format_punch_time(&first_in),
                late_by: format_duration(first_in - record.date.and_time(rules.late_after_time)),
            });
        }
    }
    if record.early_leave {
        if let Some(last_out) = record.last_out {
            summary.days_early_leave += 1;
            summary.early_leave_details.push(EarlyLeaveDetail {
                date: format_date(&record.date),
                punch_time: format_punch_time(&last_out),
                left_early_by: format_duration(
                    record.date.and_time(rules.early_leave_time) - last_out,
                ),
            });
        }
    }
}

/// Builds one [`RangeSummary`] per roster employee over `[start, end]`.
///
/// Employees without a code are skipped; duplicate codes keep the first
/// occurrence. Transactions outside the range or for unknown employees are
/// ignored, and malformed ones are dropped so their day degrades to absent.
pub fn compute_stats(
    transactions: &[Transaction],
    employees: &[Employee],
    start: NaiveDate,
    end: NaiveDate,
    rules: &AttendanceRules,
) -> BTreeMap<String, RangeSummary> {
    let index = index_punches(transactions);
    let mut stats = BTreeMap::new();

    for code in employees.iter().filter_map(Employee::code) {
        if stats.contains_key(code) {
            continue;
        }

        let days = index.get(code);
        let mut summary = RangeSummary {
            emp_code: code.to_string(),
            ..Default::default()
        };

        for date in dates_between(start, end) {
            let punches = days
                .and_then(|d| d.get(&date))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let record = classify_day(code, date, punches, rules);
            accumulate(&mut summary, &record, rules);
        }

        stats.insert(code.to_string(), summary);
    }

    stats
}

/// Joins roster details onto computed summaries, ordered by emp_code.
pub fn build_reports(
    employees: &[Employee],
    stats: BTreeMap<String, RangeSummary>,
) -> Vec<EmployeeReport> {
    let roster: HashMap<&str, &Employee> = employees
        .iter()
        .rev()
        .filter_map(|e| e.code().map(|c| (c, e)))
        .collect();

    stats
        .into_iter()
        .map(|(code, summary)| {
            let emp = roster.get(code.as_str());
            EmployeeReport {
                first_name: emp.and_then(|e| e.first_name.clone()).unwrap_or_default(),
                last_name: emp.and_then(|e| e.last_name.clone()).unwrap_or_default(),
                department: emp.and_then(|e| e.department_name()),
                emp_code: code,
                stats: summary,
            }
        })
        .collect()
}

/// Keeps employees that were late or absent at least once.
pub fn flagged(reports: Vec<EmployeeReport>) -> Vec<EmployeeReport> {
    reports
        .into_iter()
        .filter(|r| r.stats.is_flagged())
        .collect()
}

/// First and last punch per employee, ordered by emp_code.
pub fn summarize_punches(transactions: &[Transaction]) -> Vec<PunchSummary> {
    let mut by_employee: BTreeMap<&str, Vec<Punch<'_>>> = BTreeMap::new();
    for punch in transactions.iter().filter_map(Transaction::punch) {
        by_employee.entry(punch.emp_code).or_default().push(punch);
    }

    by_employee
        .into_iter()
        .filter_map(|(code, mut punches)| {
            punches.sort_by_key(|p| p.time);
            let first = punches.first()?;
            let last = punches.last()?;
            Some(PunchSummary {
                emp_code: code.to_string(),
                first_name: first.source.first_name.clone(),
                department: first.source.department.clone(),
                first_punch_time: format_punch_time(&first.time),
                first_terminal_alias: first.source.terminal_alias.clone(),
                last_punch_time: format_punch_time(&last.time),
                last_terminal_alias: last.source.terminal_alias.clone(),
                total_punches: punches.len() as u32,
                first_in_time: None,
                last_out_time: None,
                late_by: None,
                left_early_by: None,
            })
        })
        .collect()
}

/// Punch summaries of employees whose `date` matches `keep`, annotated with
/// the in/out punches the classification used.
pub fn summaries_where<F>(
    transactions: &[Transaction],
    date: NaiveDate,
    rules: &AttendanceRules,
    keep: F,
) -> Vec<PunchSummary>
where
    F: Fn(&DailyRecord) -> bool,
{
    let index = index_punches(transactions);

    summarize_punches(transactions)
        .into_iter()
        .filter_map(|mut row| {
            let punches = index
                .get(row.emp_code.as_str())
                .and_then(|d| d.get(&date))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let record = classify_day(&row.emp_code, date, punches, rules);
            if !keep(&record) {
                return None;
            }

            row.first_in_time = record.first_in.as_ref().map(format_punch_time);
            row.last_out_time = record.last_out.as_ref().map(format_punch_time);
            if record.late {
                row.late_by = record
                    .first_in
                    .map(|t| format_duration(t - date.and_time(rules.late_after_time)));
            }
            if record.early_leave {
                row.left_early_by = record
                    .last_out
                    .map(|t| format_duration(date.and_time(rules.early_leave_time) - t));
            }
            Some(row)
        })
        .collect()
}

/// Roster employees counted absent on `date`.
pub fn absent_on(
    transactions: &[Transaction],
    employees: &[Employee],
    date: NaiveDate,
    rules: &AttendanceRules,
) -> Vec<AbsentEmployee> {
    build_reports(employees, compute_stats(transactions, employees, date, date, rules))
        .into_iter()
        .filter(|r| r.stats.days_absent > 0)
        .map(|r| AbsentEmployee {
            first_name: Some(r.first_name).filter(|n| !n.is_empty()),
            last_name: Some(r.last_name).filter(|n| !n.is_empty()),
            department: r.department,
            emp_code: r.emp_code,
        })
        .collect()
}

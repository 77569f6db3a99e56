//! Read-time derived views: employee headcounts per cafe and the days-worked
//! report. Nothing in here mutates persisted state; handlers fetch rows and
//! hand them to these functions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::cafe::Cafe;
use crate::models::employee::Employee;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Serialize, Debug, PartialEq)]
pub struct CafeHeadcount {
    pub name: String,
    pub description: String,
    pub employees: i64,
    pub location: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct TenureEntry {
    pub id: String,
    pub name: String,
    pub email_address: String,
    pub phone_number: String,
    pub days_worked: i64,
    pub cafe: String,
}

/// Whole days elapsed since `start`, floored.
pub fn days_worked(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Tally of employees per referenced cafe id; unassigned employees are
/// skipped.
pub fn count_assignments<'a, I>(refs: I) -> HashMap<String, i64>
where
    I: IntoIterator<Item = &'a Option<String>>,
{
    let mut counts = HashMap::new();
    for cafe_id in refs.into_iter().flatten() {
        *counts.entry(cafe_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Annotates cafes with their live employee counts, sorted descending by
/// count. Ties break on name ascending to keep the ordering deterministic.
pub fn cafe_headcounts(cafes: Vec<Cafe>, counts: &HashMap<String, i64>) -> Vec<CafeHeadcount> {
    let mut rows: Vec<CafeHeadcount> = cafes
        .into_iter()
        .map(|cafe| {
            let employees = counts.get(&cafe.id).copied().unwrap_or(0);
            CafeHeadcount {
                name: cafe.name,
                description: cafe.description,
                employees,
                location: cafe.location,
                id: cafe.id,
                logo: cafe.logo,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.employees.cmp(&a.employees).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Days-worked report, sorted descending by tenure, name ascending on ties.
/// The `cafe` column carries the display name of the assigned cafe, empty
/// when unassigned or unresolved.
pub fn tenure_report(
    employees: Vec<Employee>,
    cafe_names: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Vec<TenureEntry> {
    let mut rows: Vec<TenureEntry> = employees
        .into_iter()
        .map(|employee| {
            let cafe = employee
                .cafe
                .as_deref()
                .and_then(|id| cafe_names.get(id))
                .cloned()
                .unwrap_or_default();
            TenureEntry {
                days_worked: days_worked(employee.start_date, now),
                id: employee.id,
                name: employee.name,
                email_address: employee.email_address,
                phone_number: employee.phone_number,
                cafe,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.days_worked.cmp(&a.days_worked).then_with(|| a.name.cmp(&b.name)));
    rows
}

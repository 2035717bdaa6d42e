//! Column alias resolution
//!
//! Maps heterogeneous/legacy column names onto the canonical schema. For each
//! canonical column the aliases are tried in order and the first key present
//! in the input row wins, even when its value is empty.

use crate::types::{RawRow, StudentRecord, FEATURE_COLUMNS, PROVENANCE_COLUMN};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Canonical column followed by its accepted aliases in priority order
pub const COLUMN_ALIASES: [(&str, &[&str]); 18] = [
    ("id", &["id", "ID", "Id"]),
    ("name", &["name", "Name"]),
    ("class", &["class", "Class", "Section"]),
    ("attendance_pct", &["attendance_pct", "attendance", "Attendance"]),
    ("grades_avg", &["grades_avg", "avg_score", "AverageScore", "Score"]),
    ("num_failed_subjects", &["num_failed_subjects", "failed_subjects"]),
    ("family_income_bracket", &["family_income_bracket", "income_bracket"]),
    ("parent_education_level", &["parent_education_level", "parent_edu"]),
    ("parent_occupation", &["parent_occupation", "parent_job"]),
    ("distance_to_school", &["distance_to_school", "distance"]),
    ("transport_available", &["transport_available", "transport"]),
    (
        "extracurricular_participation",
        &["extracurricular_participation", "extracurricular"],
    ),
    ("disciplinary_records", &["disciplinary_records", "disciplinary"]),
    ("chronic_health_issues", &["chronic_health_issues", "health_issues"]),
    ("nutrition_status", &["nutrition_status", "nutrition"]),
    ("teacher_student_ratio", &["teacher_student_ratio", "ratio"]),
    (
        "parent_meeting_attendance",
        &["parent_meeting_attendance", "meeting_attendance"],
    ),
    (
        "intervention_history",
        &["intervention_history", "behavior_flags", "flags"],
    ),
];

/// Non-fatal notice that some canonical feature columns were not found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub missing_columns: BTreeSet<String>,
}

impl ValidationWarning {
    pub fn is_empty(&self) -> bool {
        self.missing_columns.is_empty()
    }

    /// Fold another warning into this one
    pub fn merge(&mut self, other: ValidationWarning) {
        self.missing_columns.extend(other.missing_columns);
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing_columns.iter().map(String::as_str).collect();
        write!(f, "Missing columns: {}", names.join(", "))
    }
}

/// A normalized row together with the columns it lacked
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: StudentRecord,
    pub warning: ValidationWarning,
}

/// Resolve one row onto the canonical schema. Unknown keys are dropped.
pub fn normalize_row(row: &RawRow) -> Normalized {
    let mut record = StudentRecord::default();
    let mut warning = ValidationWarning::default();

    for (canonical, aliases) in COLUMN_ALIASES.iter() {
        match aliases.iter().find_map(|alias| row.get(*alias)) {
            Some(value) => {
                record.set(canonical, value.clone());
            }
            None if FEATURE_COLUMNS.contains(canonical) => {
                warning.missing_columns.insert(canonical.to_string());
            }
            None => {}
        }
    }

    if let Some(owner) = row.get(PROVENANCE_COLUMN).filter(|v| !v.is_empty()) {
        record.teacher_id = Some(owner.clone());
    }

    Normalized { record, warning }
}

/// Normalize many rows, collecting one combined warning
pub fn normalize_rows<'a, I>(rows: I) -> (Vec<StudentRecord>, ValidationWarning)
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut warning = ValidationWarning::default();
    let records = rows
        .into_iter()
        .map(|row| {
            let normalized = normalize_row(row);
            warning.merge(normalized.warning);
            normalized.record
        })
        .collect();
    (records, warning)
}

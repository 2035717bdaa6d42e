//! Canonical student record and identity types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A row as it arrives from a CSV file or a remote payload: column name to raw text
pub type RawRow = BTreeMap<String, String>;

/// Identity columns, in export order
pub const IDENTITY_COLUMNS: [&str; 3] = ["id", "name", "class"];

/// The 15 canonical feature columns, in the order the remote predictor expects
pub const FEATURE_COLUMNS: [&str; 15] = [
    "attendance_pct",
    "grades_avg",
    "num_failed_subjects",
    "family_income_bracket",
    "parent_education_level",
    "parent_occupation",
    "distance_to_school",
    "transport_available",
    "extracurricular_participation",
    "disciplinary_records",
    "chronic_health_issues",
    "nutrition_status",
    "teacher_student_ratio",
    "parent_meeting_attendance",
    "intervention_history",
];

/// Column used to tag rows with the identity they were loaded for
pub const PROVENANCE_COLUMN: &str = "teacher_id";

/// Canonical per-student row
///
/// Values stay textual; typing happens in feature extraction so that a
/// malformed cell is never silently turned into a number. An empty string
/// means the value is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub attendance_pct: String,
    pub grades_avg: String,
    pub num_failed_subjects: String,
    pub family_income_bracket: String,
    pub parent_education_level: String,
    pub parent_occupation: String,
    pub distance_to_school: String,
    pub transport_available: String,
    pub extracurricular_participation: String,
    pub disciplinary_records: String,
    pub chronic_health_issues: String,
    pub nutrition_status: String,
    pub teacher_student_ratio: String,
    pub parent_meeting_attendance: String,
    pub intervention_history: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

impl StudentRecord {
    /// Read a canonical column by name
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            "id" => &self.id,
            "name" => &self.name,
            "class" => &self.class_name,
            "attendance_pct" => &self.attendance_pct,
            "grades_avg" => &self.grades_avg,
            "num_failed_subjects" => &self.num_failed_subjects,
            "family_income_bracket" => &self.family_income_bracket,
            "parent_education_level" => &self.parent_education_level,
            "parent_occupation" => &self.parent_occupation,
            "distance_to_school" => &self.distance_to_school,
            "transport_available" => &self.transport_available,
            "extracurricular_participation" => &self.extracurricular_participation,
            "disciplinary_records" => &self.disciplinary_records,
            "chronic_health_issues" => &self.chronic_health_issues,
            "nutrition_status" => &self.nutrition_status,
            "teacher_student_ratio" => &self.teacher_student_ratio,
            "parent_meeting_attendance" => &self.parent_meeting_attendance,
            "intervention_history" => &self.intervention_history,
            PROVENANCE_COLUMN => return self.teacher_id.as_deref(),
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Write a canonical column by name. Returns false for unknown columns.
    pub fn set(&mut self, column: &str, value: String) -> bool {
        let slot = match column {
            "id" => &mut self.id,
            "name" => &mut self.name,
            "class" => &mut self.class_name,
            "attendance_pct" => &mut self.attendance_pct,
            "grades_avg" => &mut self.grades_avg,
            "num_failed_subjects" => &mut self.num_failed_subjects,
            "family_income_bracket" => &mut self.family_income_bracket,
            "parent_education_level" => &mut self.parent_education_level,
            "parent_occupation" => &mut self.parent_occupation,
            "distance_to_school" => &mut self.distance_to_school,
            "transport_available" => &mut self.transport_available,
            "extracurricular_participation" => &mut self.extracurricular_participation,
            "disciplinary_records" => &mut self.disciplinary_records,
            "chronic_health_issues" => &mut self.chronic_health_issues,
            "nutrition_status" => &mut self.nutrition_status,
            "teacher_student_ratio" => &mut self.teacher_student_ratio,
            "parent_meeting_attendance" => &mut self.parent_meeting_attendance,
            "intervention_history" => &mut self.intervention_history,
            PROVENANCE_COLUMN => {
                self.teacher_id = Some(value);
                return true;
            }
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Flatten back into a raw row carrying every canonical key
    pub fn to_row(&self) -> RawRow {
        let mut row: RawRow = IDENTITY_COLUMNS
            .iter()
            .chain(FEATURE_COLUMNS.iter())
            .map(|col| (col.to_string(), self.get(col).unwrap_or_default().to_string()))
            .collect();
        if let Some(owner) = &self.teacher_id {
            row.insert(PROVENANCE_COLUMN.to_string(), owner.clone());
        }
        row
    }

    /// Tag the record with the identity it was loaded for
    pub fn with_provenance(mut self, owner: &str) -> Self {
        self.teacher_id = Some(owner.to_string());
        self
    }
}

/// Convert a JSON object from a remote payload into a raw row.
///
/// Strings are kept verbatim, numbers and booleans are rendered as text,
/// `null` becomes an empty cell. Nested values are dropped.
pub fn raw_row_from_json(object: &Map<String, Value>) -> RawRow {
    object
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Whose data is being loaded or saved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// A single data owner, e.g. one teacher
    Owner(String),
    /// Every known owner merged together
    Aggregate,
}

impl Identity {
    pub fn owner(name: impl Into<String>) -> Self {
        Identity::Owner(name.into())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Owner(name) => write!(f, "{}", name),
            Identity::Aggregate => write!(f, "<aggregate>"),
        }
    }
}

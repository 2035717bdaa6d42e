//! Feature extraction from canonical records
//!
//! Never fails: anything that does not parse is reported as missing.

use crate::features::vector::FeatureVector;
use crate::types::StudentRecord;
use regex::Regex;
use std::sync::OnceLock;

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("leading number pattern is valid")
    })
}

/// Parse a numeric cell.
///
/// Every character outside `[0-9.-]` is stripped first (so `"85%"` and
/// `"1,200"` parse), then the leading numeric token is read. Returns `None`
/// for empty or unparsable input.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let token = leading_number().find(&cleaned)?;
    token.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed categorical cell
pub fn parse_categorical(raw: &str) -> String {
    raw.trim().to_string()
}

/// Project a canonical record onto typed features
pub fn extract_features(record: &StudentRecord) -> FeatureVector {
    FeatureVector {
        attendance_pct: parse_numeric(&record.attendance_pct),
        grades_avg: parse_numeric(&record.grades_avg),
        num_failed_subjects: parse_numeric(&record.num_failed_subjects),
        family_income_bracket: parse_categorical(&record.family_income_bracket),
        parent_education_level: parse_categorical(&record.parent_education_level),
        parent_occupation: parse_categorical(&record.parent_occupation),
        distance_to_school: parse_numeric(&record.distance_to_school),
        transport_available: parse_numeric(&record.transport_available),
        extracurricular_participation: parse_numeric(&record.extracurricular_participation),
        disciplinary_records: parse_numeric(&record.disciplinary_records),
        chronic_health_issues: parse_numeric(&record.chronic_health_issues),
        nutrition_status: parse_categorical(&record.nutrition_status),
        teacher_student_ratio: parse_numeric(&record.teacher_student_ratio),
        parent_meeting_attendance: parse_numeric(&record.parent_meeting_attendance),
        intervention_history: parse_categorical(&record.intervention_history),
    }
}

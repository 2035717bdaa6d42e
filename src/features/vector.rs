//! Typed feature vector

use serde::{Deserialize, Serialize};

/// Typed projection of a [`crate::types::StudentRecord`]
///
/// Numeric features are `None` when the source cell was absent or did not
/// contain a number. Categorical features are trimmed text, empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub attendance_pct: Option<f64>,
    pub grades_avg: Option<f64>,
    pub num_failed_subjects: Option<f64>,
    pub family_income_bracket: String,
    pub parent_education_level: String,
    pub parent_occupation: String,
    pub distance_to_school: Option<f64>,
    pub transport_available: Option<f64>,
    pub extracurricular_participation: Option<f64>,
    pub disciplinary_records: Option<f64>,
    pub chronic_health_issues: Option<f64>,
    pub nutrition_status: String,
    pub teacher_student_ratio: Option<f64>,
    pub parent_meeting_attendance: Option<f64>,
    pub intervention_history: String,
}

impl FeatureVector {
    /// Number of numeric features that carry a value
    pub fn numeric_present(&self) -> usize {
        [
            self.attendance_pct,
            self.grades_avg,
            self.num_failed_subjects,
            self.distance_to_school,
            self.transport_available,
            self.extracurricular_participation,
            self.disciplinary_records,
            self.chronic_health_issues,
            self.teacher_student_ratio,
            self.parent_meeting_attendance,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// `true` when the flag is present and exactly equal to `expected`
pub(crate) fn flag_is(value: Option<f64>, expected: f64) -> bool {
    value.map_or(false, |v| v == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_missing() {
        let vector = FeatureVector::default();
        assert_eq!(vector.numeric_present(), 0);
        assert!(vector.nutrition_status.is_empty());
    }

    #[test]
    fn test_flag_is() {
        assert!(flag_is(Some(1.0), 1.0));
        assert!(!flag_is(Some(0.0), 1.0));
        assert!(!flag_is(None, 0.0));
    }
}

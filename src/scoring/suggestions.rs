//! Intervention suggestions
//!
//! Rules are evaluated in order and each one appends at most one message.
//! These thresholds are independent of the scorer's thresholds.

use crate::features::vector::flag_is;
use crate::features::FeatureVector;
use crate::scoring::classifier::RiskTier;
use crate::scoring::patterns;

pub const ATTENDANCE_FOLLOW_UP: &str = "Initiate attendance follow-up with guardians";
pub const REMEDIAL_TUTORING: &str = "Enroll in remedial tutoring program";
pub const RECOVERY_PLAN: &str = "Design subject-specific recovery plan";
pub const JOIN_EXTRACURRICULAR: &str = "Encourage joining one extracurricular activity";
pub const BEHAVIOR_COUNSELING: &str = "Schedule behavior support counseling";
pub const HEALTH_COORDINATION: &str = "Coordinate with health services for accommodations";
pub const FINANCIAL_AID: &str = "Assess need for financial aid or subsidies";
pub const TRANSPORT_ASSISTANCE: &str = "Review transport assistance options";
pub const NUTRITION_SUPPORT: &str = "Refer to nutrition support program";
pub const GUARDIAN_ENGAGEMENT: &str = "Increase frequency of guardian engagement";
pub const MULTI_FACTOR_PLAN: &str = "Create individualized multi-factor intervention plan";
pub const MAINTAIN_MONITORING: &str = "Maintain positive reinforcement and monitor monthly";

type Rule = (fn(&FeatureVector) -> bool, &'static str);

const RULES: [Rule; 10] = [
    (|f: &FeatureVector| f.attendance_pct.map_or(false, |v| v < 80.0), ATTENDANCE_FOLLOW_UP),
    (|f: &FeatureVector| f.grades_avg.map_or(false, |v| v < 55.0), REMEDIAL_TUTORING),
    (|f: &FeatureVector| f.num_failed_subjects.map_or(false, |v| v >= 2.0), RECOVERY_PLAN),
    (|f: &FeatureVector| flag_is(f.extracurricular_participation, 0.0), JOIN_EXTRACURRICULAR),
    (|f: &FeatureVector| f.disciplinary_records.map_or(false, |v| v > 0.0), BEHAVIOR_COUNSELING),
    (|f: &FeatureVector| flag_is(f.chronic_health_issues, 1.0), HEALTH_COORDINATION),
    (|f: &FeatureVector| patterns::low_income().is_match(&f.family_income_bracket), FINANCIAL_AID),
    (
        |f: &FeatureVector| {
            flag_is(f.transport_available, 0.0)
                || patterns::transport_mention().is_match(&f.intervention_history)
        },
        TRANSPORT_ASSISTANCE,
    ),
    (|f: &FeatureVector| patterns::poor_nutrition().is_match(&f.nutrition_status), NUTRITION_SUPPORT),
    (|f: &FeatureVector| f.parent_meeting_attendance.map_or(false, |v| v < 2.0), GUARDIAN_ENGAGEMENT),
];

/// Suggestions for one student, in rule order
pub fn suggest_actions(features: &FeatureVector, tier: RiskTier) -> Vec<String> {
    let mut out: Vec<String> = RULES
        .iter()
        .filter(|(applies, _)| applies(features))
        .map(|(_, message)| message.to_string())
        .collect();

    if tier == RiskTier::High {
        out.push(MULTI_FACTOR_PLAN.to_string());
    }
    if out.is_empty() {
        out.push(MAINTAIN_MONITORING.to_string());
    }
    out
}

//! Weighted heuristic dropout scorer
//!
//! Each term only contributes when its operand is present; a missing
//! feature is skipped, never treated as zero. The raw score is squashed
//! through a logistic curve centred at 0.9.

use crate::features::vector::flag_is;
use crate::features::FeatureVector;
use crate::scoring::patterns;

/// Raw score clamp range
pub const SCORE_MIN: f64 = -0.2;
pub const SCORE_MAX: f64 = 2.5;

/// Probability clamp range
pub const PROBABILITY_MIN: f64 = 0.01;
pub const PROBABILITY_MAX: f64 = 0.99;

/// Logistic centre and steepness
const CURVE_CENTER: f64 = 0.9;
const CURVE_STEEPNESS: f64 = 2.0;

/// Weighted sum of risk terms, before clamping
pub fn raw_score(f: &FeatureVector) -> f64 {
    let mut score = 0.0;

    if let Some(attendance) = f.attendance_pct {
        score += (100.0 - attendance) * 0.01;
    }
    if let Some(grades) = f.grades_avg {
        score += ((60.0 - grades) / 60.0).max(0.0) * 0.8;
    }
    if let Some(failed) = f.num_failed_subjects {
        score += failed.min(3.0) * 0.12;
    }
    if let Some(disciplinary) = f.disciplinary_records {
        score += disciplinary.min(5.0) * 0.08;
    }
    if flag_is(f.chronic_health_issues, 1.0) {
        score += 0.15;
    }

    if patterns::low_income().is_match(&f.family_income_bracket) {
        score += 0.18;
    } else if patterns::middle_income().is_match(&f.family_income_bracket) {
        score += 0.08;
    }

    if patterns::low_parent_education().is_match(&f.parent_education_level) {
        score += 0.12;
    }

    if let Some(distance) = f.distance_to_school {
        score += (distance / 20.0).min(1.0) * 0.1;
    }
    if flag_is(f.transport_available, 0.0) && f.distance_to_school.map_or(false, |d| d > 5.0) {
        score += 0.07;
    }

    if flag_is(f.extracurricular_participation, 1.0) {
        score -= 0.08;
    }
    if patterns::poor_nutrition().is_match(&f.nutrition_status) {
        score += 0.1;
    }
    if let Some(meetings) = f.parent_meeting_attendance {
        score += (3.0 - meetings).max(0.0) * 0.06;
    }
    if let Some(ratio) = f.teacher_student_ratio {
        score += ((ratio - 30.0) / 30.0).max(0.0) * 0.12;
    }
    if patterns::supportive_intervention().is_match(&f.intervention_history) {
        score -= 0.05;
    }

    score
}

/// Round to three decimals
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Clamp into the published probability range and round
pub fn finalize_probability(probability: f64) -> f64 {
    round3(probability.clamp(PROBABILITY_MIN, PROBABILITY_MAX))
}

/// Dropout probability in [0.01, 0.99], rounded to three decimals
pub fn score_probability(f: &FeatureVector) -> f64 {
    let score = raw_score(f).clamp(SCORE_MIN, SCORE_MAX);
    let probability = 1.0 / (1.0 + (-CURVE_STEEPNESS * (score - CURVE_CENTER)).exp());
    finalize_probability(probability)
}

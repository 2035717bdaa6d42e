//! Case-insensitive text patterns over categorical features

use regex::Regex;
use std::sync::OnceLock;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect("static pattern is valid"))
        }
    };
}

pattern!(low_income, r"(?i)low|lower");
pattern!(middle_income, r"(?i)middle");
pattern!(low_parent_education, r"(?i)none|primary");
pattern!(poor_nutrition, r"(?i)under|mal");
pattern!(supportive_intervention, r"(?i)tutoring|counsel|mentor");
pattern!(transport_mention, r"(?i)transport");
pattern!(high_label, r"(?i)high");
pattern!(medium_label, r"(?i)mod|medium");

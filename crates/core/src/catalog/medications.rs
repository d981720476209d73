//! Diagnosis-driven medication choices and dosing vocabularies.

pub const SUPPORTIVE_CARE: [&str; 2] = ["Acetaminophen", "Ibuprofen"];

/// Maximum distinct medications prescribed per encounter.
pub const MAX_PER_ENCOUNTER: usize = 3;

pub const DEFAULT_DOSAGE: &str = "As directed";

pub const FREQUENCIES: [&str; 4] = ["Once daily", "Twice daily", "Three times daily", "As needed"];

pub const ROUTES: [&str; 5] = ["Oral", "IV", "IM", "Topical", "Inhalation"];

/// Medications indicated for a diagnosis code.
pub fn indicated_for(code: &str) -> &'static [&'static str] {
    match code {
        "J45.9" => &["Albuterol", "Fluticasone"],
        "F90.9" => &["Methylphenidate"],
        "E10.9" => &["Insulin"],
        "K21.9" => &["Omeprazole"],
        c if c.starts_with("J06") || c.starts_with("B34") => &SUPPORTIVE_CARE,
        _ => &SUPPORTIVE_CARE,
    }
}

/// Dosage options for a medication; empty when only the default applies.
pub fn dosages(medication: &str) -> &'static [&'static str] {
    match medication {
        "Acetaminophen" => &["10-15 mg/kg/dose", "80 mg", "160 mg", "325 mg"],
        "Ibuprofen" => &["5-10 mg/kg/dose", "50 mg", "100 mg", "200 mg"],
        "Albuterol" => &["2 puffs", "0.083% nebulizer solution"],
        "Methylphenidate" => &["5 mg", "10 mg", "18 mg", "27 mg"],
        "Insulin" => &["Per sliding scale", "Units as directed"],
        "Omeprazole" => &["10 mg", "20 mg", "40 mg"],
        _ => &[],
    }
}

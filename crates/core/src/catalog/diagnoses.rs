//! ICD-10 codes, department candidate lists, chief complaints and assessment/plan
//! templates.

use super::{AgeBand, Department};
use crate::sampling::Weighted;

/// Common pediatric diagnoses: code and description.
pub const DIAGNOSES: [(&str, &str); 21] = [
    ("J45.9", "Asthma, unspecified"),
    ("F90.9", "ADHD, unspecified"),
    ("E66.9", "Obesity, unspecified"),
    ("F84.0", "Autistic disorder"),
    ("E10.9", "Type 1 diabetes mellitus"),
    ("E11.9", "Type 2 diabetes mellitus without complications"),
    ("Q21.0", "Ventricular septal defect"),
    ("H52.13", "Myopia"),
    ("L20.9", "Atopic dermatitis"),
    ("K59.00", "Constipation"),
    ("J06.9", "Upper respiratory infection"),
    ("B34.9", "Viral infection"),
    ("K21.9", "GERD"),
    ("G40.909", "Epilepsy"),
    ("F32.9", "Depression"),
    ("F41.9", "Anxiety disorder"),
    ("M79.3", "Growing pains"),
    ("Z00.129", "Well child exam"),
    ("S72.001A", "Fracture of femur"),
    ("T78.40XA", "Allergy, unspecified"),
    ("H66.90", "Otitis media"),
];

const ED_CODES: [&str; 4] = ["J06.9", "B34.9", "S72.001A", "T78.40XA"];
const CARDIOLOGY_CODES: [&str; 1] = ["Q21.0"];
const PULMONOLOGY_CODES: [&str; 1] = ["J45.9"];
const ENDOCRINOLOGY_CODES: [&str; 2] = ["E10.9", "E66.9"];

/// Number of diagnoses recorded per encounter.
pub const DIAGNOSES_PER_ENCOUNTER: [Weighted<usize>; 3] = [(1, 0.6), (2, 0.3), (3, 0.1)];

pub const DIAGNOSIS_TYPES: [&str; 3] = ["Primary", "Secondary", "Admitting"];

pub fn description(code: &str) -> Option<&'static str> {
    DIAGNOSES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, d)| *d)
}

/// Candidate `(code, description)` pairs for an encounter in `department`.
pub fn candidates_for(department: Department) -> Vec<(&'static str, &'static str)> {
    let codes: &[&str] = match department {
        Department::EmergencyDepartment => &ED_CODES,
        Department::Cardiology => &CARDIOLOGY_CODES,
        Department::Pulmonology => &PULMONOLOGY_CODES,
        Department::Endocrinology => &ENDOCRINOLOGY_CODES,
        _ => return DIAGNOSES.to_vec(),
    };
    codes
        .iter()
        .filter_map(|code| description(code).map(|d| (*code, d)))
        .collect()
}

pub const CHIEF_COMPLAINTS: [AgeBand<&[&str]>; 4] = [
    AgeBand::new(
        0,
        0,
        &[
            "Feeding difficulties",
            "Respiratory distress",
            "Fever",
            "Jaundice",
            "Poor weight gain",
        ],
    ),
    AgeBand::new(
        1,
        2,
        &[
            "Fever",
            "Cough",
            "Vomiting",
            "Diarrhea",
            "Rash",
            "Irritability",
            "Poor feeding",
        ],
    ),
    AgeBand::new(
        3,
        12,
        &[
            "Fever",
            "Cough",
            "Abdominal pain",
            "Headache",
            "Sore throat",
            "Ear pain",
            "Rash",
        ],
    ),
    AgeBand::new(
        13,
        21,
        &[
            "Headache",
            "Abdominal pain",
            "Chest pain",
            "Anxiety",
            "Depression",
            "Sports injury",
            "Acne",
        ],
    ),
];

/// Curated assessment and plan for a diagnosis code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarePlan {
    pub assessment: &'static str,
    pub plan: &'static [&'static str],
}

const CARE_PLANS: [(&str, CarePlan); 4] = [
    (
        "J45.9",
        CarePlan {
            assessment: "Asthma exacerbation",
            plan: &[
                "Continue albuterol inhaler 2 puffs every 4-6 hours as needed",
                "Start/continue inhaled corticosteroid therapy",
                "Follow up with pulmonology in 2-4 weeks",
                "Return to ED if worsening symptoms",
                "Asthma action plan reviewed with family",
            ],
        },
    ),
    (
        "F90.9",
        CarePlan {
            assessment: "Attention deficit hyperactivity disorder",
            plan: &[
                "Continue current medication regimen",
                "Behavioral therapy referral",
                "School accommodations discussed",
                "Follow up in 3 months",
                "Monitor growth and development",
            ],
        },
    ),
    (
        "E10.9",
        CarePlan {
            assessment: "Type 1 diabetes mellitus",
            plan: &[
                "Continue insulin per sliding scale",
                "Blood glucose monitoring 4x daily",
                "Endocrinology follow-up in 3 months",
                "Nutrition counseling",
                "Annual ophthalmology exam",
            ],
        },
    ),
    (
        "J06.9",
        CarePlan {
            assessment: "Viral upper respiratory infection",
            plan: &[
                "Supportive care with rest and fluids",
                "Acetaminophen or ibuprofen for fever",
                "Saline nasal drops for congestion",
                "Return if symptoms worsen or persist >10 days",
                "No antibiotics indicated",
            ],
        },
    ),
];

pub fn care_plan(code: &str) -> Option<&'static CarePlan> {
    CARE_PLANS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, plan)| plan)
}

/// Supportive-care plan used when no curated template exists.
pub const GENERIC_PLAN: [&str; 4] = [
    "Continue current treatment",
    "Monitor symptoms",
    "Follow up as needed",
    "Return if symptoms worsen",
];

pub const GENERIC_FOLLOW_UP: [&str; 2] = [
    "Follow up with primary care provider in 1-2 weeks",
    "Return to ED if symptoms worsen",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::band_for;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = DIAGNOSES.iter().map(|(c, _)| *c).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), DIAGNOSES.len());
    }

    #[test]
    fn test_department_candidates() {
        let ed: Vec<&str> = candidates_for(Department::EmergencyDepartment)
            .iter()
            .map(|(c, _)| *c)
            .collect();
        assert_eq!(ed, ED_CODES);
        assert_eq!(
            candidates_for(Department::Cardiology),
            vec![("Q21.0", "Ventricular septal defect")]
        );
        assert_eq!(candidates_for(Department::Endocrinology).len(), 2);
        assert_eq!(candidates_for(Department::GeneralPediatrics).len(), 21);
    }

    #[test]
    fn test_care_plan_lookup() {
        assert_eq!(care_plan("J45.9").unwrap().assessment, "Asthma exacerbation");
        assert!(care_plan("H66.90").is_none());
    }

    #[test]
    fn test_chief_complaints_cover_all_ages() {
        for age in 0..=21 {
            assert!(band_for(&CHIEF_COMPLAINTS, age).is_some(), "age {age}");
        }
    }
}

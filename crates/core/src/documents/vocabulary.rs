//! Phrase tables for narrative text.

use crate::catalog::Department;

pub const SYMPTOMS: [&str; 25] = [
    "fever",
    "cough",
    "vomiting",
    "diarrhea",
    "abdominal pain",
    "headache",
    "sore throat",
    "ear pain",
    "rash",
    "congestion",
    "wheezing",
    "fatigue",
    "poor feeding",
    "irritability",
    "difficulty breathing",
    "shortness of breath",
    "chest pain",
    "joint pain",
    "muscle aches",
    "nausea",
    "dizziness",
    "anxiety",
    "panic",
    "sleep disturbance",
    "appetite loss",
];

pub const SEVERITY_TERMS: [&str; 7] = [
    "mild",
    "moderate",
    "severe",
    "intermittent",
    "persistent",
    "worsening",
    "improving",
];

/// Physical exam systems in note order, each with its finding phrases.
pub const EXAM_SYSTEMS: [(&str, &[&str]); 9] = [
    (
        "GENERAL",
        &[
            "alert",
            "responsive",
            "well-appearing",
            "ill-appearing",
            "anxious",
            "comfortable",
        ],
    ),
    (
        "VITAL_SIGNS",
        &[
            "stable",
            "normal for age",
            "elevated temperature",
            "tachycardic",
            "tachypneic",
        ],
    ),
    (
        "HEENT",
        &[
            "normocephalic",
            "atraumatic",
            "pupils equal and reactive",
            "TMs clear",
            "throat erythematous",
        ],
    ),
    (
        "CARDIOVASCULAR",
        &[
            "regular rate and rhythm",
            "no murmurs",
            "good perfusion",
            "normal S1 S2",
        ],
    ),
    (
        "RESPIRATORY",
        &[
            "clear to auscultation",
            "good air movement",
            "no wheezes",
            "no rales",
            "symmetric expansion",
        ],
    ),
    (
        "ABDOMEN",
        &[
            "soft",
            "non-tender",
            "non-distended",
            "normal bowel sounds",
            "no organomegaly",
        ],
    ),
    (
        "EXTREMITIES",
        &[
            "no edema",
            "full range of motion",
            "no deformity",
            "good strength",
        ],
    ),
    (
        "NEUROLOGIC",
        &[
            "alert and oriented",
            "no focal deficits",
            "cranial nerves intact",
            "reflexes normal",
        ],
    ),
    (
        "SKIN",
        &["warm and dry", "no rash", "good turgor", "no lesions"],
    ),
];

pub const VITAL_SIGNS_SYSTEM: &str = "VITAL_SIGNS";

/// Half of the vital-signs exam lines are drawn from this narrower list.
pub const FOCUSED_VITAL_FINDINGS: [&str; 4] = [
    "elevated temperature",
    "tachycardic",
    "tachypneic",
    "normal for age",
];

/// `{pain}` is replaced with a 1-8 pain score when rendered.
pub const NURSING_OBSERVATIONS: [&str; 15] = [
    "Patient tolerated procedure well",
    "Vital signs stable throughout shift",
    "Intermittent tachycardia noted while ambulating",
    "Low-grade fever responded to acetaminophen",
    "O2 saturation 92-95% on room air; encouraged deep breathing exercises",
    "Mild wheezing heard; albuterol nebulizer administered with good effect",
    "Patient appears anxious; reassurance provided and parent at bedside",
    "Crying/irritable at times; comfort measures provided",
    "Pain reported as {pain}/10; PRN analgesic given with relief",
    "Family at bedside and supportive",
    "Patient interactive and playful",
    "Appetite fair; taking PO with encouragement",
    "No nausea or vomiting",
    "Voiding normally",
    "Following commands appropriately",
];

pub const PAIN_PLACEHOLDER: &str = "{pain}";

/// Assessment and plan when the encounter has no diagnoses.
pub const ROUTINE_ASSESSMENT: &str = "Routine pediatric care";
pub const ROUTINE_PLAN: [&str; 2] = ["Continue routine care", "Next appointment as scheduled"];

/// Discharge wording when the encounter has no diagnoses.
pub const ROUTINE_ADMISSION: &str = "evaluation and treatment";
pub const ROUTINE_FOLLOW_UP: [&str; 1] = ["Routine follow-up as previously scheduled"];

pub const INFANT_COURSE: &str =
    "was monitored closely with supportive care. Parents were educated on care needs.";
pub const OLDER_COURSE: &str =
    "responded well to treatment and remained stable throughout the admission.";

pub fn specialty_recommendations(department: Department) -> &'static [&'static str] {
    match department {
        Department::Cardiology => &[
            "Echo recommended to evaluate cardiac function",
            "Continue current cardiac medications",
            "Follow up in cardiology clinic in 3-6 months",
        ],
        Department::Neurology => &[
            "EEG recommended if seizure activity suspected",
            "Continue current neurologic medications",
            "Developmental assessment recommended",
        ],
        Department::Pulmonology => &[
            "Pulmonary function tests when age appropriate",
            "Continue bronchodilator therapy",
            "Asthma action plan reviewed",
        ],
        _ => &[
            "Continue current management",
            "Follow up as clinically indicated",
            "Primary team to continue care",
        ],
    }
}

//! Imaging study catalog and radiology vocabularies.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudyType {
    ChestXray,
    AbdominalXray,
    BrainMri,
    BrainCt,
    UltrasoundAbdomen,
    Echo,
}

pub const STUDY_TYPES: [StudyType; 6] = [
    StudyType::ChestXray,
    StudyType::AbdominalXray,
    StudyType::BrainMri,
    StudyType::BrainCt,
    StudyType::UltrasoundAbdomen,
    StudyType::Echo,
];

impl StudyType {
    /// Machine code written to the `study_type` column.
    pub fn code(self) -> &'static str {
        match self {
            StudyType::ChestXray => "chest_xray",
            StudyType::AbdominalXray => "abdominal_xray",
            StudyType::BrainMri => "brain_mri",
            StudyType::BrainCt => "brain_ct",
            StudyType::UltrasoundAbdomen => "ultrasound_abdomen",
            StudyType::Echo => "echo",
        }
    }

    pub fn study_name(self) -> &'static str {
        match self {
            StudyType::ChestXray => "Chest X-ray",
            StudyType::AbdominalXray => "Abdominal X-ray",
            StudyType::BrainMri => "Brain MRI",
            StudyType::BrainCt => "Brain CT",
            StudyType::UltrasoundAbdomen => "Abdominal Ultrasound",
            StudyType::Echo => "Echocardiogram",
        }
    }

    pub fn modality(self) -> &'static str {
        match self {
            StudyType::ChestXray | StudyType::AbdominalXray => "XR",
            StudyType::BrainMri => "MR",
            StudyType::BrainCt => "CT",
            StudyType::UltrasoundAbdomen | StudyType::Echo => "US",
        }
    }

    pub fn body_part(self) -> &'static str {
        match self {
            StudyType::ChestXray => "Chest",
            StudyType::AbdominalXray | StudyType::UltrasoundAbdomen => "Abdomen",
            StudyType::BrainMri | StudyType::BrainCt => "Brain",
            StudyType::Echo => "Heart",
        }
    }

    pub fn technique(self) -> &'static str {
        match self {
            StudyType::ChestXray => "Two-view chest radiograph (PA and lateral)",
            StudyType::AbdominalXray => "Single-view abdominal radiograph (supine)",
            StudyType::BrainMri => "Brain MRI with and without contrast",
            StudyType::BrainCt => "Non-contrast CT of the head",
            StudyType::UltrasoundAbdomen => "Complete abdominal ultrasound, grayscale and color Doppler",
            StudyType::Echo => "Transthoracic echocardiogram with color and spectral Doppler",
        }
    }

    /// Normal-study findings phrases for the report body.
    pub fn findings(self) -> &'static [&'static str] {
        match self {
            StudyType::ChestXray => &[
                "lungs are clear bilaterally",
                "no acute cardiopulmonary process",
                "heart size normal for age",
                "no pneumonia or pneumothorax",
                "costophrenic angles are sharp",
            ],
            StudyType::AbdominalXray => &[
                "normal bowel gas pattern",
                "no obstruction or perforation",
                "no abnormal calcifications",
                "normal organ contours",
                "no free air",
            ],
            StudyType::BrainMri => &[
                "no acute intracranial abnormality",
                "normal brain parenchyma",
                "no mass effect or midline shift",
                "normal ventricular system",
                "no abnormal enhancement",
            ],
            StudyType::BrainCt => &[
                "no acute intracranial hemorrhage",
                "gray-white matter differentiation is preserved",
                "no mass effect or midline shift",
                "ventricles are normal in size",
                "no calvarial fracture",
            ],
            StudyType::UltrasoundAbdomen => &[
                "liver is normal in size and echotexture",
                "gallbladder is unremarkable",
                "kidneys are normal in size without hydronephrosis",
                "spleen is normal in size",
                "no free fluid",
            ],
            StudyType::Echo => &[
                "normal biventricular size and systolic function",
                "no pericardial effusion",
                "intact atrial and ventricular septa",
                "normal valve morphology and function",
                "normal aortic arch",
            ],
        }
    }
}

impl std::fmt::Display for StudyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl serde::Serialize for StudyType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

pub const STUDY_STATUSES: [&str; 3] = ["Completed", "Preliminary", "Final"];

/// Statuses for which a signed radiology report exists.
pub fn is_reportable(status: &str) -> bool {
    matches!(status, "Completed" | "Final")
}

pub const NORMAL_IMPRESSION: &str = "No acute abnormalities.";
pub const CLINICAL_IMPRESSION: &str = "Findings consistent with clinical presentation.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_study_has_findings_to_sample() {
        for study in STUDY_TYPES {
            assert!(study.findings().len() >= 4, "{study}");
        }
    }

    #[test]
    fn test_study_attributes() {
        assert_eq!(StudyType::Echo.modality(), "US");
        assert_eq!(StudyType::Echo.body_part(), "Heart");
        assert_eq!(StudyType::BrainCt.code(), "brain_ct");
        assert!(is_reportable("Final"));
        assert!(!is_reportable("Preliminary"));
    }
}

//! Typed records, one per output table.
//!
//! Records are created once per run, in dependency order, and never mutated after
//! they are handed to the writers. Catalog values are borrowed as `&'static str`;
//! only identifiers and composed text are owned.

use crate::catalog::{Department, LabTest, StudyType};
use crate::formats;
use chrono::{NaiveDate, NaiveDateTime};
use pedsynth_types::NonEmptyText;
use serde::Serialize;

/// A record written as one CSV row. `COLUMNS` is the header row and must match the
/// serialized field order.
pub trait TabularRecord: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// A child record owned by one encounter.
pub trait EncounterScoped {
    fn record_id(&self) -> &str;
    fn encounter_id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn noun(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EncounterType {
    Outpatient,
    Inpatient,
    Emergency,
}

impl EncounterType {
    pub fn name(self) -> &'static str {
        match self {
            EncounterType::Outpatient => "Outpatient",
            EncounterType::Inpatient => "Inpatient",
            EncounterType::Emergency => "Emergency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub patient_id: String,
    pub mrn: String,
    pub first_name: &'static str,
    pub last_name: &'static str,
    #[serde(with = "formats::date")]
    pub date_of_birth: NaiveDate,
    pub age: u32,
    pub gender: Sex,
    pub race: &'static str,
    pub ethnicity: &'static str,
    pub zip_code: &'static str,
    pub insurance_type: &'static str,
    pub language: &'static str,
    #[serde(with = "formats::timestamp")]
    pub created_date: NaiveDateTime,
}

impl TabularRecord for Patient {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "mrn",
        "first_name",
        "last_name",
        "date_of_birth",
        "age",
        "gender",
        "race",
        "ethnicity",
        "zip_code",
        "insurance_type",
        "language",
        "created_date",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encounter {
    pub encounter_id: String,
    pub patient_id: String,
    #[serde(with = "formats::timestamp")]
    pub encounter_date: NaiveDateTime,
    pub encounter_type: EncounterType,
    pub department: Department,
    pub attending_physician: String,
    #[serde(with = "formats::timestamp")]
    pub admission_date: NaiveDateTime,
    #[serde(with = "formats::timestamp")]
    pub discharge_date: NaiveDateTime,
    /// Whole days between admission and discharge.
    pub length_of_stay: i64,
    pub chief_complaint: &'static str,
    pub status: &'static str,
}

impl TabularRecord for Encounter {
    const COLUMNS: &'static [&'static str] = &[
        "encounter_id",
        "patient_id",
        "encounter_date",
        "encounter_type",
        "department",
        "attending_physician",
        "admission_date",
        "discharge_date",
        "length_of_stay",
        "chief_complaint",
        "status",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub diagnosis_id: String,
    pub encounter_id: String,
    pub patient_id: String,
    pub diagnosis_code: &'static str,
    pub diagnosis_description: &'static str,
    pub diagnosis_type: &'static str,
    #[serde(with = "formats::timestamp")]
    pub diagnosis_date: NaiveDateTime,
}

impl TabularRecord for Diagnosis {
    const COLUMNS: &'static [&'static str] = &[
        "diagnosis_id",
        "encounter_id",
        "patient_id",
        "diagnosis_code",
        "diagnosis_description",
        "diagnosis_type",
        "diagnosis_date",
    ];
}

impl EncounterScoped for Diagnosis {
    fn record_id(&self) -> &str {
        &self.diagnosis_id
    }

    fn encounter_id(&self) -> &str {
        &self.encounter_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabResult {
    pub lab_result_id: String,
    pub encounter_id: String,
    pub patient_id: String,
    pub test_name: LabTest,
    pub test_value: String,
    pub reference_range: &'static str,
    /// `""`, `"L"` or `"H"`.
    pub abnormal_flag: &'static str,
    #[serde(with = "formats::timestamp")]
    pub result_date: NaiveDateTime,
    pub ordering_provider: String,
}

impl TabularRecord for LabResult {
    const COLUMNS: &'static [&'static str] = &[
        "lab_result_id",
        "encounter_id",
        "patient_id",
        "test_name",
        "test_value",
        "reference_range",
        "abnormal_flag",
        "result_date",
        "ordering_provider",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub medication_id: String,
    pub encounter_id: String,
    pub patient_id: String,
    pub medication_name: &'static str,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub route: &'static str,
    #[serde(with = "formats::timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(with = "formats::timestamp")]
    pub end_date: NaiveDateTime,
    pub prescribing_provider: String,
}

impl TabularRecord for Medication {
    const COLUMNS: &'static [&'static str] = &[
        "medication_id",
        "encounter_id",
        "patient_id",
        "medication_name",
        "dosage",
        "frequency",
        "route",
        "start_date",
        "end_date",
        "prescribing_provider",
    ];
}

impl EncounterScoped for Medication {
    fn record_id(&self) -> &str {
        &self.medication_id
    }

    fn encounter_id(&self) -> &str {
        &self.encounter_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalSign {
    pub vital_sign_id: String,
    pub encounter_id: String,
    pub patient_id: String,
    pub temperature: f64,
    pub heart_rate: i64,
    pub respiratory_rate: i64,
    pub blood_pressure_systolic: i64,
    pub blood_pressure_diastolic: i64,
    pub oxygen_saturation: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(with = "formats::timestamp")]
    pub recorded_date: NaiveDateTime,
    pub recorded_by: String,
}

impl TabularRecord for VitalSign {
    const COLUMNS: &'static [&'static str] = &[
        "vital_sign_id",
        "encounter_id",
        "patient_id",
        "temperature",
        "heart_rate",
        "respiratory_rate",
        "blood_pressure_systolic",
        "blood_pressure_diastolic",
        "oxygen_saturation",
        "weight_kg",
        "height_cm",
        "recorded_date",
        "recorded_by",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagingStudy {
    pub imaging_study_id: String,
    pub encounter_id: String,
    pub patient_id: String,
    pub study_type: StudyType,
    pub study_name: &'static str,
    pub modality: &'static str,
    pub body_part: &'static str,
    pub study_status: &'static str,
    #[serde(with = "formats::timestamp")]
    pub study_date: NaiveDateTime,
    pub ordering_provider: String,
    pub performing_department: Department,
}

impl TabularRecord for ImagingStudy {
    const COLUMNS: &'static [&'static str] = &[
        "imaging_study_id",
        "encounter_id",
        "patient_id",
        "study_type",
        "study_name",
        "modality",
        "body_part",
        "study_status",
        "study_date",
        "ordering_provider",
        "performing_department",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provider {
    pub provider_id: String,
    pub npi: String,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub specialty: &'static str,
    pub department: &'static str,
    pub credentials: &'static str,
    pub status: &'static str,
    #[serde(with = "formats::date")]
    pub hire_date: NaiveDate,
}

impl TabularRecord for Provider {
    const COLUMNS: &'static [&'static str] = &[
        "provider_id",
        "npi",
        "first_name",
        "last_name",
        "specialty",
        "department",
        "credentials",
        "status",
        "hire_date",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentRecord {
    pub department_id: String,
    pub department_name: &'static str,
    pub department_code: &'static str,
    pub service_line: &'static str,
    pub location: &'static str,
    pub status: &'static str,
}

impl TabularRecord for DepartmentRecord {
    const COLUMNS: &'static [&'static str] = &[
        "department_id",
        "department_name",
        "department_code",
        "service_line",
        "location",
        "status",
    ];
}

/// Metadata row for a generated note or radiology report. The body is also written
/// to its own text file named by `file_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalDocument {
    pub note_id: String,
    pub patient_id: String,
    pub encounter_id: String,
    pub note_type: String,
    pub author: String,
    pub department: String,
    #[serde(with = "formats::timestamp")]
    pub note_date: NaiveDateTime,
    /// Semicolon-separated codes the body refers to.
    pub diagnosis_codes: String,
    pub imaging_study_id: Option<String>,
    pub study_type: Option<StudyType>,
    pub file_name: String,
    pub note_content: NonEmptyText,
}

impl TabularRecord for ClinicalDocument {
    const COLUMNS: &'static [&'static str] = &[
        "note_id",
        "patient_id",
        "encounter_id",
        "note_type",
        "author",
        "department",
        "note_date",
        "diagnosis_codes",
        "imaging_study_id",
        "study_type",
        "file_name",
        "note_content",
    ];
}

//! Hospital departments and provider specialties.

use crate::sampling::Weighted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Department {
    EmergencyDepartment,
    PediatricIcu,
    Nicu,
    Cardiology,
    Neurology,
    Oncology,
    Orthopedics,
    Pulmonology,
    Gastroenterology,
    Endocrinology,
    Nephrology,
    Rheumatology,
    Dermatology,
    Ophthalmology,
    Ent,
    Psychiatry,
    GeneralPediatrics,
    AdolescentMedicine,
    NewbornNursery,
    AmbulatorySurgery,
    Radiology,
    Laboratory,
    Pharmacy,
}

impl Department {
    pub fn name(self) -> &'static str {
        match self {
            Department::EmergencyDepartment => "Emergency Department",
            Department::PediatricIcu => "Pediatric ICU",
            Department::Nicu => "NICU",
            Department::Cardiology => "Cardiology",
            Department::Neurology => "Neurology",
            Department::Oncology => "Oncology",
            Department::Orthopedics => "Orthopedics",
            Department::Pulmonology => "Pulmonology",
            Department::Gastroenterology => "Gastroenterology",
            Department::Endocrinology => "Endocrinology",
            Department::Nephrology => "Nephrology",
            Department::Rheumatology => "Rheumatology",
            Department::Dermatology => "Dermatology",
            Department::Ophthalmology => "Ophthalmology",
            Department::Ent => "ENT",
            Department::Psychiatry => "Psychiatry",
            Department::GeneralPediatrics => "General Pediatrics",
            Department::AdolescentMedicine => "Adolescent Medicine",
            Department::NewbornNursery => "Newborn Nursery",
            Department::AmbulatorySurgery => "Ambulatory Surgery",
            Department::Radiology => "Radiology",
            Department::Laboratory => "Laboratory",
            Department::Pharmacy => "Pharmacy",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Department::EmergencyDepartment => "ED",
            Department::PediatricIcu => "PICU",
            Department::Nicu => "NICU",
            Department::Cardiology => "CARDS",
            Department::Neurology => "NEURO",
            Department::Oncology => "ONCO",
            Department::Orthopedics => "ORTHO",
            Department::Pulmonology => "PULM",
            Department::Gastroenterology => "GI",
            Department::Endocrinology => "ENDO",
            Department::Nephrology => "NEPHRO",
            Department::Rheumatology => "RHEUM",
            Department::Dermatology => "DERM",
            Department::Ophthalmology => "OPHTH",
            Department::Ent => "ENT",
            Department::Psychiatry => "PSYCH",
            Department::GeneralPediatrics => "PEDS",
            Department::AdolescentMedicine => "ADOL",
            Department::NewbornNursery => "NBN",
            Department::AmbulatorySurgery => "ASC",
            Department::Radiology => "RAD",
            Department::Laboratory => "LAB",
            Department::Pharmacy => "PHARM",
        }
    }

    pub fn service_line(self) -> &'static str {
        match self {
            Department::EmergencyDepartment => "Emergency Medicine",
            Department::PediatricIcu => "Critical Care",
            Department::Nicu | Department::NewbornNursery => "Neonatology",
            Department::GeneralPediatrics | Department::AdolescentMedicine => "Ambulatory",
            Department::Psychiatry => "Behavioral Health",
            Department::AmbulatorySurgery => "Surgical",
            Department::Radiology | Department::Laboratory | Department::Pharmacy => "Ancillary",
            _ => "Specialty",
        }
    }

    /// Departments whose encounters get a specialty consultation note and a raised
    /// imaging rate.
    pub fn is_consulting_specialty(self) -> bool {
        matches!(
            self,
            Department::Cardiology | Department::Neurology | Department::Pulmonology
        )
    }

    pub fn is_intensive_care(self) -> bool {
        matches!(self, Department::PediatricIcu | Department::Nicu)
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl serde::Serialize for Department {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Department catalog order; department ids are assigned by position.
pub const CATALOG: [Department; 23] = [
    Department::EmergencyDepartment,
    Department::PediatricIcu,
    Department::Nicu,
    Department::GeneralPediatrics,
    Department::Cardiology,
    Department::Neurology,
    Department::Oncology,
    Department::Orthopedics,
    Department::Pulmonology,
    Department::Gastroenterology,
    Department::Endocrinology,
    Department::Nephrology,
    Department::Radiology,
    Department::Laboratory,
    Department::Pharmacy,
    Department::Rheumatology,
    Department::Dermatology,
    Department::Ophthalmology,
    Department::Ent,
    Department::Psychiatry,
    Department::AdolescentMedicine,
    Department::NewbornNursery,
    Department::AmbulatorySurgery,
];

pub const LOCATIONS: [&str; 3] = ["Main Campus", "West Campus", "The Woodlands"];

pub const NEWBORN_DEPARTMENTS: [Weighted<Department>; 4] = [
    (Department::Nicu, 0.15),
    (Department::NewbornNursery, 0.70),
    (Department::PediatricIcu, 0.05),
    (Department::EmergencyDepartment, 0.10),
];

pub const TODDLER_DEPARTMENTS: [Weighted<Department>; 3] = [
    (Department::GeneralPediatrics, 0.80),
    (Department::EmergencyDepartment, 0.15),
    (Department::PediatricIcu, 0.05),
];

pub const OLDER_CHILD_DEPARTMENTS: [Weighted<Department>; 23] = [
    (Department::EmergencyDepartment, 0.12),
    (Department::PediatricIcu, 0.03),
    (Department::Nicu, 0.01),
    (Department::Cardiology, 0.08),
    (Department::Neurology, 0.06),
    (Department::Oncology, 0.02),
    (Department::Orthopedics, 0.05),
    (Department::Pulmonology, 0.04),
    (Department::Gastroenterology, 0.04),
    (Department::Endocrinology, 0.03),
    (Department::Nephrology, 0.02),
    (Department::Rheumatology, 0.02),
    (Department::Dermatology, 0.03),
    (Department::Ophthalmology, 0.02),
    (Department::Ent, 0.02),
    (Department::Psychiatry, 0.03),
    (Department::GeneralPediatrics, 0.35),
    (Department::AdolescentMedicine, 0.04),
    (Department::NewbornNursery, 0.01),
    (Department::AmbulatorySurgery, 0.02),
    (Department::Radiology, 0.01),
    (Department::Laboratory, 0.01),
    (Department::Pharmacy, 0.01),
];

/// Department weights for a patient of the given age.
pub fn departments_for_age(age: u32) -> &'static [Weighted<Department>] {
    match age {
        0 => &NEWBORN_DEPARTMENTS,
        1..=2 => &TODDLER_DEPARTMENTS,
        _ => &OLDER_CHILD_DEPARTMENTS,
    }
}

pub const PROVIDER_SPECIALTIES: [&str; 21] = [
    "General Pediatrics",
    "Emergency Medicine",
    "Pediatric Critical Care",
    "Neonatology",
    "Cardiology",
    "Neurology",
    "Oncology",
    "Orthopedics",
    "Pulmonology",
    "Gastroenterology",
    "Endocrinology",
    "Nephrology",
    "Rheumatology",
    "Dermatology",
    "Ophthalmology",
    "ENT",
    "Psychiatry",
    "Adolescent Medicine",
    "Radiology",
    "Pathology",
    "Anesthesiology",
];

pub const PROVIDER_CREDENTIALS: [&str; 3] = ["MD", "DO", "MD, PhD"];

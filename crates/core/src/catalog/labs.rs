//! Laboratory tests, panels and age-specific reference ranges.

use super::{AgeBand, Department};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabTest {
    Hemoglobin,
    HemoglobinA1c,
    WhiteBloodCells,
    PlateletCount,
    Glucose,
    Creatinine,
    ThyroidFunction,
}

impl LabTest {
    pub fn name(self) -> &'static str {
        match self {
            LabTest::Hemoglobin => "Hemoglobin",
            LabTest::HemoglobinA1c => "Hemoglobin A1c",
            LabTest::WhiteBloodCells => "White Blood Cells",
            LabTest::PlateletCount => "Platelet Count",
            LabTest::Glucose => "Glucose",
            LabTest::Creatinine => "Creatinine",
            LabTest::ThyroidFunction => "Thyroid Function",
        }
    }

    /// Cell counts are reported as whole numbers; everything else to one decimal.
    pub fn reports_whole_numbers(self) -> bool {
        matches!(self, LabTest::WhiteBloodCells | LabTest::PlateletCount)
    }

    /// Age-banded reference ranges, or an empty slice when the test has none.
    pub fn reference_bands(self) -> &'static [AgeBand<ReferenceRange>] {
        match self {
            LabTest::Hemoglobin => &HEMOGLOBIN,
            LabTest::WhiteBloodCells => &WHITE_BLOOD_CELLS,
            LabTest::PlateletCount => &PLATELET_COUNT,
            LabTest::Glucose => &GLUCOSE,
            LabTest::Creatinine => &CREATININE,
            LabTest::HemoglobinA1c | LabTest::ThyroidFunction => &[],
        }
    }
}

impl std::fmt::Display for LabTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl serde::Serialize for LabTest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Inclusive normal range together with its printed form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
    pub label: &'static str,
}

impl ReferenceRange {
    pub const fn new(low: f64, high: f64, label: &'static str) -> Self {
        Self { low, high, label }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

const HEMOGLOBIN: [AgeBand<ReferenceRange>; 6] = [
    AgeBand::new(0, 1, ReferenceRange::new(14.0, 20.0, "14.0-20.0")),
    AgeBand::new(2, 3, ReferenceRange::new(9.5, 13.0, "9.5-13.0")),
    AgeBand::new(4, 6, ReferenceRange::new(10.5, 13.5, "10.5-13.5")),
    AgeBand::new(7, 12, ReferenceRange::new(11.0, 14.0, "11.0-14.0")),
    AgeBand::new(13, 15, ReferenceRange::new(12.0, 15.2, "12.0-15.2")),
    AgeBand::new(16, 21, ReferenceRange::new(12.6, 16.6, "12.6-16.6")),
];

const WHITE_BLOOD_CELLS: [AgeBand<ReferenceRange>; 5] = [
    AgeBand::new(0, 1, ReferenceRange::new(9000.0, 30000.0, "9000-30000")),
    AgeBand::new(2, 3, ReferenceRange::new(6000.0, 17500.0, "6000-17500")),
    AgeBand::new(4, 6, ReferenceRange::new(5500.0, 15500.0, "5500-15500")),
    AgeBand::new(7, 12, ReferenceRange::new(4500.0, 13500.0, "4500-13500")),
    AgeBand::new(13, 21, ReferenceRange::new(4500.0, 11000.0, "4500-11000")),
];

const PLATELET_COUNT: [AgeBand<ReferenceRange>; 1] = [AgeBand::new(
    0,
    21,
    ReferenceRange::new(150000.0, 450000.0, "150000-450000"),
)];

const GLUCOSE: [AgeBand<ReferenceRange>; 1] =
    [AgeBand::new(0, 21, ReferenceRange::new(70.0, 100.0, "70-100"))];

const CREATININE: [AgeBand<ReferenceRange>; 5] = [
    AgeBand::new(0, 1, ReferenceRange::new(0.2, 0.4, "0.2-0.4")),
    AgeBand::new(2, 3, ReferenceRange::new(0.3, 0.5, "0.3-0.5")),
    AgeBand::new(4, 6, ReferenceRange::new(0.4, 0.6, "0.4-0.6")),
    AgeBand::new(7, 12, ReferenceRange::new(0.5, 0.8, "0.5-0.8")),
    AgeBand::new(13, 21, ReferenceRange::new(0.6, 1.2, "0.6-1.2")),
];

/// Printed reference range for HbA1c results.
pub const HBA1C_REFERENCE: ReferenceRange = ReferenceRange::new(4.5, 5.7, "4.5-5.7");

/// HbA1c result tier: cumulative probability bound, value range and flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct A1cTier {
    pub upper_roll: f64,
    pub low: f64,
    pub high: f64,
    pub flag: &'static str,
}

pub const HBA1C_TIERS: [A1cTier; 3] = [
    A1cTier {
        upper_roll: 0.75,
        low: 4.8,
        high: 6.0,
        flag: "",
    },
    A1cTier {
        upper_roll: 0.90,
        low: 6.5,
        high: 8.9,
        flag: "H",
    },
    A1cTier {
        upper_roll: 1.0,
        low: 9.0,
        high: 13.5,
        flag: "H",
    },
];

pub const NO_REFERENCE_VALUE: &str = "Normal";
pub const NO_REFERENCE_RANGE: &str = "Reference range not defined";

const ENDOCRINE_PANEL: [LabTest; 3] = [
    LabTest::HemoglobinA1c,
    LabTest::Glucose,
    LabTest::ThyroidFunction,
];

const ACUTE_CARE_PANEL: [LabTest; 5] = [
    LabTest::Hemoglobin,
    LabTest::WhiteBloodCells,
    LabTest::PlateletCount,
    LabTest::Glucose,
    LabTest::Creatinine,
];

const BASIC_PANEL: [LabTest; 3] = [
    LabTest::Hemoglobin,
    LabTest::WhiteBloodCells,
    LabTest::PlateletCount,
];

/// Tests orderable for an encounter in `department`, in panel order.
pub fn panel_for(department: Department) -> &'static [LabTest] {
    match department {
        Department::Endocrinology => &ENDOCRINE_PANEL,
        Department::EmergencyDepartment | Department::PediatricIcu => &ACUTE_CARE_PANEL,
        _ => &BASIC_PANEL,
    }
}

/// Tests that are always ordered when they appear in a panel.
pub fn is_forced(test: LabTest) -> bool {
    test == LabTest::HemoglobinA1c
}

//! Physiologic vital sign ranges by age bucket.

use super::AgeBand;

/// Ranges for one age bucket. Integer ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalRanges {
    pub temperature_c: (f64, f64),
    pub heart_rate: (i64, i64),
    pub respiratory_rate: (i64, i64),
    pub systolic: (i64, i64),
    pub diastolic: (i64, i64),
    pub oxygen_saturation: (i64, i64),
    pub weight_kg: (f64, f64),
    pub height_cm: (f64, f64),
}

/// Newborn (0), infant (1), child (2-12) and adolescent (13-21).
pub const VITAL_RANGES: [AgeBand<VitalRanges>; 4] = [
    AgeBand::new(
        0,
        0,
        VitalRanges {
            temperature_c: (36.5, 37.2),
            heart_rate: (120, 160),
            respiratory_rate: (30, 60),
            systolic: (65, 95),
            diastolic: (30, 60),
            oxygen_saturation: (95, 100),
            weight_kg: (2.5, 4.5),
            height_cm: (45.0, 55.0),
        },
    ),
    AgeBand::new(
        1,
        1,
        VitalRanges {
            temperature_c: (36.5, 37.2),
            heart_rate: (100, 150),
            respiratory_rate: (25, 50),
            systolic: (70, 100),
            diastolic: (35, 65),
            oxygen_saturation: (95, 100),
            weight_kg: (4.0, 12.0),
            height_cm: (50.0, 80.0),
        },
    ),
    AgeBand::new(
        2,
        12,
        VitalRanges {
            temperature_c: (36.5, 37.2),
            heart_rate: (80, 120),
            respiratory_rate: (15, 25),
            systolic: (90, 110),
            diastolic: (55, 70),
            oxygen_saturation: (95, 100),
            weight_kg: (12.0, 50.0),
            height_cm: (75.0, 150.0),
        },
    ),
    AgeBand::new(
        13,
        21,
        VitalRanges {
            temperature_c: (36.5, 37.2),
            heart_rate: (60, 100),
            respiratory_rate: (12, 20),
            systolic: (100, 120),
            diastolic: (60, 80),
            oxygen_saturation: (95, 100),
            weight_kg: (40.0, 80.0),
            height_cm: (140.0, 180.0),
        },
    ),
];

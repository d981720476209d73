//! Lab results.
//!
//! Two value policies: the generic banded policy for tests with an age-specific
//! reference range, and a dedicated HbA1c policy with a heavier abnormal tail.
//! Tests without a range report a qualitative result.

use super::PatientIndex;
use crate::catalog::labs::{
    is_forced, panel_for, ReferenceRange, HBA1C_REFERENCE, HBA1C_TIERS, NO_REFERENCE_RANGE,
    NO_REFERENCE_VALUE,
};
use crate::catalog::{band_for, LabTest};
use crate::config::GenerationConfig;
use crate::formats::round_to;
use crate::records::{Encounter, EncounterType, LabResult};
use crate::sampling::SamplingContext;
use crate::SynthResult;
use chrono::TimeDelta;
use pedsynth_types::IdSequence;

const STREAM: &str = "labs";

pub const LAB_ID_PREFIX: &str = "LAB";
pub const LAB_ID_WIDTH: usize = 8;

/// Share of eligible encounters with lab work.
const LAB_ORDER_RATE: f64 = 0.4;
/// Share of banded results inside the reference range.
const IN_RANGE_RATE: f64 = 0.9;

/// A formatted result with its printed range and flag.
#[derive(Debug, Clone, PartialEq)]
pub struct LabValue {
    pub value: String,
    pub reference_range: &'static str,
    pub abnormal_flag: &'static str,
}

pub fn generate_lab_results(
    cfg: &GenerationConfig,
    patients: &PatientIndex<'_>,
    encounters: &[Encounter],
    ids: &mut IdSequence,
) -> SynthResult<Vec<LabResult>> {
    let mut results = Vec::new();
    for encounter in encounters {
        let patient = patients.owner_of(encounter)?;
        if !orders_labs(encounter.encounter_type) {
            continue;
        }
        let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &encounter.encounter_id);
        if !ctx.chance(LAB_ORDER_RATE) {
            continue;
        }
        for test in select_tests(&mut ctx, panel_for(encounter.department)) {
            let LabValue {
                value,
                reference_range,
                abnormal_flag,
            } = lab_value(&mut ctx, test, patient.age);
            let result_date = encounter.encounter_date + TimeDelta::hours(ctx.int_in(1..=24));
            results.push(LabResult {
                lab_result_id: ids.next_id(),
                encounter_id: encounter.encounter_id.clone(),
                patient_id: encounter.patient_id.clone(),
                test_name: test,
                test_value: value,
                reference_range,
                abnormal_flag,
                result_date,
                ordering_provider: encounter.attending_physician.clone(),
            });
        }
    }
    tracing::debug!(count = results.len(), "generated lab results");
    Ok(results)
}

fn orders_labs(encounter_type: EncounterType) -> bool {
    matches!(
        encounter_type,
        EncounterType::Outpatient | EncounterType::Inpatient | EncounterType::Emergency
    )
}

/// Random non-empty subset of `panel`, forced tests always included, in panel order.
fn select_tests(ctx: &mut SamplingContext, panel: &[LabTest]) -> Vec<LabTest> {
    let count = ctx.usize_in(1..=panel.len());
    let chosen = ctx.sample(panel, count);
    panel
        .iter()
        .copied()
        .filter(|test| chosen.contains(test) || is_forced(*test))
        .collect()
}

/// Result for `test` in a patient of `age`.
pub fn lab_value(ctx: &mut SamplingContext, test: LabTest, age: u32) -> LabValue {
    if test == LabTest::HemoglobinA1c {
        return a1c_value(ctx);
    }
    match band_for(test.reference_bands(), age) {
        Some(range) => banded_value(ctx, range, test.reports_whole_numbers()),
        None => LabValue {
            value: NO_REFERENCE_VALUE.to_string(),
            reference_range: NO_REFERENCE_RANGE,
            abnormal_flag: "",
        },
    }
}

/// Generic policy: 90% within range, otherwise split evenly between a low value in
/// `[0.7 * low, low)` and a high value in `(high, 1.3 * high]`. The printed value
/// always agrees with its flag.
pub fn banded_value(ctx: &mut SamplingContext, range: &ReferenceRange, whole: bool) -> LabValue {
    let step = if whole { 1.0 } else { 0.1 };
    let shown = |v: f64| if whole { v.trunc() } else { round_to(v, 1) };

    let (value, flag) = if ctx.chance(IN_RANGE_RATE) {
        let v = shown(ctx.float_in(range.low, range.high));
        (v.clamp(range.low, range.high), "")
    } else if ctx.chance(0.5) {
        let v = shown(ctx.float_in(range.low * 0.7, range.low));
        let v = if v >= range.low {
            round_to(range.low - step, 1)
        } else {
            v
        };
        (v, "L")
    } else {
        let v = shown(ctx.float_in(range.high, range.high * 1.3));
        let v = if v <= range.high {
            round_to(range.high + step, 1)
        } else {
            v
        };
        (v, "H")
    };

    LabValue {
        value: format_value(value, whole),
        reference_range: range.label,
        abnormal_flag: flag,
    }
}

/// HbA1c policy: 75% 4.8-6.0 unflagged, 15% 6.5-8.9 and 10% 9.0-13.5 flagged high.
pub fn a1c_value(ctx: &mut SamplingContext) -> LabValue {
    let roll = ctx.uniform();
    let tier = HBA1C_TIERS
        .iter()
        .find(|t| roll < t.upper_roll)
        .unwrap_or(&HBA1C_TIERS[HBA1C_TIERS.len() - 1]);
    let value = round_to(ctx.float_in(tier.low, tier.high), 1);
    LabValue {
        value: format_value(value, false),
        reference_range: HBA1C_REFERENCE.label,
        abnormal_flag: tier.flag,
    }
}

fn format_value(value: f64, whole: bool) -> String {
    if whole {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Department;
    use crate::generators::fixtures::{config, encounter, patient};
    use crate::SynthError;

    #[test]
    fn test_banded_values_agree_with_flags() {
        let mut ctx = SamplingContext::from_seed(77);
        for test in [
            LabTest::Hemoglobin,
            LabTest::WhiteBloodCells,
            LabTest::PlateletCount,
            LabTest::Glucose,
            LabTest::Creatinine,
        ] {
            for age in 0..=21 {
                let range = band_for(test.reference_bands(), age).unwrap();
                for _ in 0..300 {
                    let v = lab_value(&mut ctx, test, age);
                    let x: f64 = v.value.parse().unwrap();
                    assert_eq!(v.reference_range, range.label);
                    match v.abnormal_flag {
                        "" => assert!(range.contains(x), "{test} {x} not in {}", range.label),
                        "L" => assert!(x < range.low, "{test} {x} flagged L"),
                        "H" => assert!(x > range.high, "{test} {x} flagged H"),
                        other => panic!("unexpected flag {other}"),
                    }
                    if test.reports_whole_numbers() {
                        assert!(!v.value.contains('.'));
                    } else {
                        assert_eq!(v.value.split('.').nth(1).map(str::len), Some(1));
                    }
                }
            }
        }
    }

    #[test]
    fn test_banded_abnormal_rate_near_ten_percent() {
        let mut ctx = SamplingContext::from_seed(3);
        let range = band_for(LabTest::Glucose.reference_bands(), 8).unwrap();
        let n = 20_000;
        let abnormal = (0..n)
            .filter(|_| !banded_value(&mut ctx, range, false).abnormal_flag.is_empty())
            .count();
        let rate = abnormal as f64 / n as f64;
        assert!((rate - 0.10).abs() < 0.01, "rate {rate}");
    }

    #[test]
    fn test_a1c_abnormal_rate_near_quarter() {
        let mut ctx = SamplingContext::from_seed(42);
        let n = 20_000;
        let mut high = 0;
        for _ in 0..n {
            let v = a1c_value(&mut ctx);
            assert_eq!(v.reference_range, "4.5-5.7");
            let x: f64 = v.value.parse().unwrap();
            if v.abnormal_flag == "H" {
                high += 1;
                assert!(x >= 6.5 && x <= 13.5);
            } else {
                assert_eq!(v.abnormal_flag, "");
                assert!(x >= 4.8 && x <= 6.0);
            }
        }
        let rate = high as f64 / n as f64;
        assert!((rate - 0.25).abs() < 0.015, "rate {rate}");
    }

    #[test]
    fn test_unranged_test_is_qualitative() {
        let mut ctx = SamplingContext::from_seed(1);
        let v = lab_value(&mut ctx, LabTest::ThyroidFunction, 10);
        assert_eq!(v.value, "Normal");
        assert_eq!(v.reference_range, "Reference range not defined");
        assert_eq!(v.abnormal_flag, "");
    }

    #[test]
    fn test_subsets_follow_panel_order_and_force_a1c() {
        let mut ctx = SamplingContext::from_seed(12);
        let endocrine = panel_for(Department::Endocrinology);
        let acute = panel_for(Department::EmergencyDepartment);
        for _ in 0..200 {
            let picked = select_tests(&mut ctx, endocrine);
            assert_eq!(picked[0], LabTest::HemoglobinA1c);

            let picked = select_tests(&mut ctx, acute);
            assert!(!picked.is_empty());
            let positions: Vec<usize> = picked
                .iter()
                .map(|t| acute.iter().position(|p| p == t).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_results_link_to_encounters() {
        let cfg = config(42);
        let patients = vec![patient("TCH-000001", 12)];
        let index = PatientIndex::new(&patients);
        let encounters: Vec<Encounter> = (1..=60)
            .map(|i| {
                encounter(
                    &format!("ENC-{i:08}"),
                    "TCH-000001",
                    Department::EmergencyDepartment,
                    EncounterType::Emergency,
                )
            })
            .collect();
        let mut ids = IdSequence::new(LAB_ID_PREFIX, LAB_ID_WIDTH);
        let results = generate_lab_results(&cfg, &index, &encounters, &mut ids).unwrap();
        assert!(!results.is_empty());
        for r in &results {
            let e = encounters
                .iter()
                .find(|e| e.encounter_id == r.encounter_id)
                .unwrap();
            let hours = (r.result_date - e.encounter_date).num_hours();
            assert!((1..=24).contains(&hours));
            assert_eq!(r.ordering_provider, e.attending_physician);
        }
    }

    #[test]
    fn test_unknown_patient_aborts() {
        let cfg = config(42);
        let patients = vec![patient("TCH-000001", 12)];
        let index = PatientIndex::new(&patients);
        let orphan = vec![encounter(
            "ENC-00000001",
            "TCH-000404",
            Department::Cardiology,
            EncounterType::Outpatient,
        )];
        let mut ids = IdSequence::new(LAB_ID_PREFIX, LAB_ID_WIDTH);
        assert!(matches!(
            generate_lab_results(&cfg, &index, &orphan, &mut ids),
            Err(SynthError::UnknownPatient { .. })
        ));
    }
}

//! Encounters: count, timing, department and stay length per patient.

use super::{between, staff_name, years_before};
use crate::catalog::departments::departments_for_age;
use crate::catalog::diagnoses::CHIEF_COMPLAINTS;
use crate::catalog::{band_for, Department};
use crate::config::GenerationConfig;
use crate::records::{Encounter, EncounterType, Patient};
use crate::sampling::{SamplingContext, Weighted};
use chrono::{NaiveDateTime, TimeDelta};
use pedsynth_types::IdSequence;

const STREAM: &str = "encounters";

pub const ENCOUNTER_ID_PREFIX: &str = "ENC";
pub const ENCOUNTER_ID_WIDTH: usize = 8;

/// Encounters fall within this many years before the reference time.
const LOOKBACK_YEARS: u32 = 3;

const STATUSES: [&str; 3] = ["Completed", "In Progress", "Scheduled"];

const INPATIENT_STAY_DAYS: [Weighted<i64>; 13] = [
    (1, 0.20),
    (2, 0.20),
    (3, 0.15),
    (4, 0.12),
    (5, 0.10),
    (6, 0.08),
    (7, 0.05),
    (8, 0.03),
    (9, 0.02),
    (10, 0.02),
    (15, 0.01),
    (20, 0.01),
    (30, 0.01),
];

const CLINIC_ENCOUNTER_TYPES: [Weighted<EncounterType>; 2] = [
    (EncounterType::Outpatient, 0.85),
    (EncounterType::Inpatient, 0.15),
];

/// Generate every patient's encounters, in patient order.
pub fn generate_encounters(
    cfg: &GenerationConfig,
    patients: &[Patient],
    ids: &mut IdSequence,
) -> Vec<Encounter> {
    let mut encounters = Vec::new();
    for patient in patients {
        let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &patient.patient_id);
        let count = encounter_count(&mut ctx, patient.age, cfg.encounters_per_patient());
        for _ in 0..count {
            encounters.push(generate_encounter(cfg, &mut ctx, patient, ids.next_id()));
        }
    }
    tracing::debug!(count = encounters.len(), "generated encounters");
    encounters
}

/// Encounter count drawn around `base`, higher for the youngest patients.
fn encounter_count(ctx: &mut SamplingContext, age: u32, base: u32) -> i64 {
    let k = i64::from(base);
    match age {
        0 => ctx.int_in(k + 3..=k + 8),
        1..=2 => ctx.int_in(k + 1..=k + 4),
        3..=5 => ctx.int_in(k..=k + 3),
        _ => ctx.int_in((k - 2).max(1)..=k + 2),
    }
}

fn generate_encounter(
    cfg: &GenerationConfig,
    ctx: &mut SamplingContext,
    patient: &Patient,
    encounter_id: String,
) -> Encounter {
    let as_of = cfg.as_of();
    let window_start = years_before(as_of, LOOKBACK_YEARS).max(patient.created_date);
    let encounter_date = between(ctx, window_start, as_of);

    let department = *ctx.weighted(departments_for_age(patient.age));
    let encounter_type = encounter_type_for(ctx, department);
    let (first, last) = staff_name(ctx);
    let attending_physician = format!("Dr. {first} {last}, MD");
    let discharge_date = discharge_for(ctx, encounter_date, encounter_type);
    let length_of_stay = (discharge_date - encounter_date).num_days();
    let complaints = band_for(&CHIEF_COMPLAINTS, patient.age)
        .copied()
        .unwrap_or(CHIEF_COMPLAINTS[CHIEF_COMPLAINTS.len() - 1].value);
    let chief_complaint = *ctx.choose(complaints);
    let status = *ctx.choose(&STATUSES);

    Encounter {
        encounter_id,
        patient_id: patient.patient_id.clone(),
        encounter_date,
        encounter_type,
        department,
        attending_physician,
        admission_date: encounter_date,
        discharge_date,
        length_of_stay,
        chief_complaint,
        status,
    }
}

fn encounter_type_for(ctx: &mut SamplingContext, department: Department) -> EncounterType {
    match department {
        Department::EmergencyDepartment => EncounterType::Emergency,
        Department::PediatricIcu | Department::Nicu => EncounterType::Inpatient,
        Department::AmbulatorySurgery | Department::Radiology => EncounterType::Outpatient,
        _ => *ctx.weighted(&CLINIC_ENCOUNTER_TYPES),
    }
}

fn discharge_for(
    ctx: &mut SamplingContext,
    admitted: NaiveDateTime,
    encounter_type: EncounterType,
) -> NaiveDateTime {
    let days = match encounter_type {
        EncounterType::Outpatient => 0,
        EncounterType::Emergency => {
            if ctx.chance(0.8) {
                0
            } else {
                ctx.int_in(1..=3)
            }
        }
        EncounterType::Inpatient => *ctx.weighted(&INPATIENT_STAY_DAYS),
    };
    admitted + TimeDelta::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::demographics::generate_patients;
    use crate::generators::fixtures::config;

    fn generate(seed: u64, patients: usize) -> (Vec<Patient>, Vec<Encounter>) {
        let cfg = config(seed);
        let patients = generate_patients(&cfg, 0..patients);
        let mut ids = IdSequence::new(ENCOUNTER_ID_PREFIX, ENCOUNTER_ID_WIDTH);
        let encounters = generate_encounters(&cfg, &patients, &mut ids);
        (patients, encounters)
    }

    #[test]
    fn test_encounter_timing_invariants() {
        let cfg = config(42);
        let (patients, encounters) = generate(42, 300);
        let lookback = years_before(cfg.as_of(), LOOKBACK_YEARS);
        for e in &encounters {
            let patient = patients.iter().find(|p| p.patient_id == e.patient_id).unwrap();
            assert!(e.encounter_date >= patient.created_date);
            assert!(e.encounter_date >= lookback);
            assert!(e.encounter_date <= cfg.as_of());
            assert_eq!(e.admission_date, e.encounter_date);
            assert!(e.discharge_date >= e.admission_date);
            assert_eq!(
                e.length_of_stay,
                (e.discharge_date - e.admission_date).num_days()
            );
            assert!(e.length_of_stay >= 0);
            if e.encounter_type == EncounterType::Outpatient {
                assert_eq!(e.length_of_stay, 0);
            }
            if e.encounter_type == EncounterType::Emergency {
                assert!(e.length_of_stay <= 3);
            }
            assert!(e.attending_physician.starts_with("Dr. "));
            assert!(e.attending_physician.ends_with(", MD"));
        }
    }

    #[test]
    fn test_ids_are_sequential_in_patient_order() {
        let (patients, encounters) = generate(3, 20);
        for (i, e) in encounters.iter().enumerate() {
            assert_eq!(e.encounter_id, IdSequence::format("ENC", 8, i as u64 + 1));
        }
        let order: Vec<&str> = encounters.iter().map(|e| e.patient_id.as_str()).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert!(patients
            .iter()
            .all(|p| encounters.iter().any(|e| e.patient_id == p.patient_id)));
    }

    #[test]
    fn test_department_respects_age() {
        let (patients, encounters) = generate(11, 400);
        for e in &encounters {
            let patient = patients.iter().find(|p| p.patient_id == e.patient_id).unwrap();
            match patient.age {
                0 => assert!(matches!(
                    e.department,
                    Department::Nicu
                        | Department::NewbornNursery
                        | Department::PediatricIcu
                        | Department::EmergencyDepartment
                )),
                1..=2 => assert!(matches!(
                    e.department,
                    Department::GeneralPediatrics
                        | Department::EmergencyDepartment
                        | Department::PediatricIcu
                )),
                _ => {}
            }
        }
    }

    #[test]
    fn test_encounter_count_bands() {
        let mut ctx = SamplingContext::from_seed(1);
        for _ in 0..200 {
            assert!((8..=13).contains(&encounter_count(&mut ctx, 0, 5)));
            assert!((6..=9).contains(&encounter_count(&mut ctx, 2, 5)));
            assert!((5..=8).contains(&encounter_count(&mut ctx, 5, 5)));
            assert!((1..=3).contains(&encounter_count(&mut ctx, 15, 1)));
        }
    }

    #[test]
    fn test_type_follows_department() {
        let mut ctx = SamplingContext::from_seed(5);
        assert_eq!(
            encounter_type_for(&mut ctx, Department::EmergencyDepartment),
            EncounterType::Emergency
        );
        assert_eq!(
            encounter_type_for(&mut ctx, Department::Nicu),
            EncounterType::Inpatient
        );
        assert_eq!(
            encounter_type_for(&mut ctx, Department::Radiology),
            EncounterType::Outpatient
        );
        for _ in 0..100 {
            assert_ne!(
                encounter_type_for(&mut ctx, Department::Cardiology),
                EncounterType::Emergency
            );
        }
    }
}

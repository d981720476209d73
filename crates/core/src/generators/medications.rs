//! Medications prescribed for an encounter's diagnoses.

use super::by_encounter;
use crate::catalog::medications::{
    dosages, indicated_for, DEFAULT_DOSAGE, FREQUENCIES, MAX_PER_ENCOUNTER, ROUTES,
};
use crate::config::GenerationConfig;
use crate::records::{Diagnosis, Encounter, Medication};
use crate::sampling::SamplingContext;
use crate::SynthResult;
use chrono::TimeDelta;
use pedsynth_types::IdSequence;

const STREAM: &str = "medications";

pub const MEDICATION_ID_PREFIX: &str = "MED";
pub const MEDICATION_ID_WIDTH: usize = 8;

pub fn generate_medications(
    cfg: &GenerationConfig,
    encounters: &[Encounter],
    diagnoses: &[Diagnosis],
    ids: &mut IdSequence,
) -> SynthResult<Vec<Medication>> {
    let grouped = by_encounter(encounters, diagnoses)?;
    let mut medications = Vec::new();
    for encounter in encounters {
        let Some(encounter_dx) = grouped.get(encounter.encounter_id.as_str()) else {
            continue;
        };
        if encounter_dx.is_empty() {
            continue;
        }
        let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &encounter.encounter_id);
        for name in select_medications(&mut ctx, encounter_dx) {
            let options = dosages(name);
            let dosage = if options.is_empty() {
                DEFAULT_DOSAGE
            } else {
                *ctx.choose(options)
            };
            let start_date = encounter.encounter_date;
            medications.push(Medication {
                medication_id: ids.next_id(),
                encounter_id: encounter.encounter_id.clone(),
                patient_id: encounter.patient_id.clone(),
                medication_name: name,
                dosage,
                frequency: *ctx.choose(&FREQUENCIES),
                route: *ctx.choose(&ROUTES),
                start_date,
                end_date: start_date + TimeDelta::days(ctx.int_in(1..=30)),
                prescribing_provider: encounter.attending_physician.clone(),
            });
        }
    }
    tracing::debug!(count = medications.len(), "generated medications");
    Ok(medications)
}

/// Indicated medications, deduplicated in first-seen order and capped by sampling.
fn select_medications(ctx: &mut SamplingContext, diagnoses: &[&Diagnosis]) -> Vec<&'static str> {
    let mut unique: Vec<&'static str> = Vec::new();
    for dx in diagnoses {
        for &name in indicated_for(dx.diagnosis_code) {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
    }
    if unique.len() > MAX_PER_ENCOUNTER {
        ctx.sample(&unique, MAX_PER_ENCOUNTER)
    } else {
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Department;
    use crate::generators::fixtures::{config, encounter, ts};
    use crate::records::EncounterType;
    use crate::SynthError;

    fn dx(id: &str, encounter_id: &str, code: &'static str) -> Diagnosis {
        Diagnosis {
            diagnosis_id: id.into(),
            encounter_id: encounter_id.into(),
            patient_id: "TCH-000001".into(),
            diagnosis_code: code,
            diagnosis_description: "",
            diagnosis_type: "Primary",
            diagnosis_date: ts("2024-03-04 10:00:00"),
        }
    }

    fn ids() -> IdSequence {
        IdSequence::new(MEDICATION_ID_PREFIX, MEDICATION_ID_WIDTH)
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let a = dx("DX-1", "ENC-1", "J45.9");
        let b = dx("DX-2", "ENC-1", "J06.9");
        let mut ctx = SamplingContext::from_seed(1);
        let picked = select_medications(&mut ctx, &[&a, &b]);
        assert_eq!(picked.len(), 3);
        let c = dx("DX-3", "ENC-1", "B34.9");
        let d = dx("DX-4", "ENC-1", "H66.90");
        assert_eq!(
            select_medications(&mut ctx, &[&c, &d]),
            vec!["Acetaminophen", "Ibuprofen"]
        );
    }

    #[test]
    fn test_cap_at_three() {
        let list = [
            dx("DX-1", "ENC-1", "J45.9"),
            dx("DX-2", "ENC-1", "F90.9"),
            dx("DX-3", "ENC-1", "E10.9"),
        ];
        let refs: Vec<&Diagnosis> = list.iter().collect();
        let mut ctx = SamplingContext::from_seed(2);
        for _ in 0..50 {
            let picked = select_medications(&mut ctx, &refs);
            assert_eq!(picked.len(), 3);
            let mut sorted = picked.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 3);
        }
    }

    #[test]
    fn test_medication_dates_and_links() {
        let cfg = config(42);
        let encounters = vec![
            encounter(
                "ENC-00000001",
                "TCH-000001",
                Department::Pulmonology,
                EncounterType::Outpatient,
            ),
            encounter(
                "ENC-00000002",
                "TCH-000001",
                Department::Dermatology,
                EncounterType::Outpatient,
            ),
        ];
        let diagnoses = vec![
            dx("DX-00000001", "ENC-00000001", "J45.9"),
            dx("DX-00000002", "ENC-00000001", "K21.9"),
        ];
        let meds = generate_medications(&cfg, &encounters, &diagnoses, &mut ids()).unwrap();
        let names: Vec<&str> = meds.iter().map(|m| m.medication_name).collect();
        assert_eq!(names, ["Albuterol", "Fluticasone", "Omeprazole"]);
        for m in &meds {
            assert_eq!(m.encounter_id, "ENC-00000001");
            assert_eq!(m.start_date, encounters[0].encounter_date);
            let days = (m.end_date - m.start_date).num_days();
            assert!((1..=30).contains(&days));
            assert_eq!(m.prescribing_provider, encounters[0].attending_physician);
            if m.medication_name == "Fluticasone" {
                assert_eq!(m.dosage, "As directed");
            }
        }
    }

    #[test]
    fn test_diagnosis_for_unknown_encounter_aborts() {
        let cfg = config(42);
        let encounters = vec![encounter(
            "ENC-00000001",
            "TCH-000001",
            Department::Pulmonology,
            EncounterType::Outpatient,
        )];
        let diagnoses = vec![dx("DX-00000001", "ENC-00000099", "J45.9")];
        assert!(matches!(
            generate_medications(&cfg, &encounters, &diagnoses, &mut ids()),
            Err(SynthError::UnknownEncounter { .. })
        ));
    }
}

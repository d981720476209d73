//! Diagnoses, one to three per encounter.

use crate::catalog::diagnoses::{candidates_for, DIAGNOSES_PER_ENCOUNTER, DIAGNOSIS_TYPES};
use crate::config::GenerationConfig;
use crate::records::{Diagnosis, Encounter};
use crate::sampling::SamplingContext;
use pedsynth_types::IdSequence;

const STREAM: &str = "diagnoses";

pub const DIAGNOSIS_ID_PREFIX: &str = "DX";
pub const DIAGNOSIS_ID_WIDTH: usize = 8;

pub fn generate_diagnoses(
    cfg: &GenerationConfig,
    encounters: &[Encounter],
    ids: &mut IdSequence,
) -> Vec<Diagnosis> {
    let mut diagnoses = Vec::new();
    for encounter in encounters {
        let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &encounter.encounter_id);
        let count = *ctx.weighted(&DIAGNOSES_PER_ENCOUNTER);
        let candidates = candidates_for(encounter.department);
        for _ in 0..count {
            let (code, description) = *ctx.choose(&candidates);
            diagnoses.push(Diagnosis {
                diagnosis_id: ids.next_id(),
                encounter_id: encounter.encounter_id.clone(),
                patient_id: encounter.patient_id.clone(),
                diagnosis_code: code,
                diagnosis_description: description,
                diagnosis_type: *ctx.choose(&DIAGNOSIS_TYPES),
                diagnosis_date: encounter.encounter_date,
            });
        }
    }
    tracing::debug!(count = diagnoses.len(), "generated diagnoses");
    diagnoses
}

//! Imaging studies.

use crate::catalog::imaging::{STUDY_STATUSES, STUDY_TYPES};
use crate::catalog::Department;
use crate::config::GenerationConfig;
use crate::records::{Encounter, EncounterType, ImagingStudy};
use crate::sampling::SamplingContext;
use chrono::TimeDelta;
use pedsynth_types::IdSequence;

const STREAM: &str = "imaging";

pub const IMAGING_ID_PREFIX: &str = "IMG";
pub const IMAGING_ID_WIDTH: usize = 8;

/// Chance that an encounter includes an imaging study.
pub fn imaging_probability(encounter: &Encounter) -> f64 {
    if encounter.encounter_type == EncounterType::Emergency {
        0.25
    } else if encounter.department.is_intensive_care() {
        0.40
    } else if encounter.department.is_consulting_specialty() {
        0.30
    } else {
        0.10
    }
}

pub fn generate_imaging_studies(
    cfg: &GenerationConfig,
    encounters: &[Encounter],
    ids: &mut IdSequence,
) -> Vec<ImagingStudy> {
    let mut studies = Vec::new();
    for encounter in encounters {
        let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &encounter.encounter_id);
        if !ctx.chance(imaging_probability(encounter)) {
            continue;
        }
        let study = *ctx.choose(&STUDY_TYPES);
        studies.push(ImagingStudy {
            imaging_study_id: ids.next_id(),
            encounter_id: encounter.encounter_id.clone(),
            patient_id: encounter.patient_id.clone(),
            study_type: study,
            study_name: study.study_name(),
            modality: study.modality(),
            body_part: study.body_part(),
            study_status: *ctx.choose(&STUDY_STATUSES),
            study_date: encounter.encounter_date + TimeDelta::hours(ctx.int_in(1..=24)),
            ordering_provider: encounter.attending_physician.clone(),
            performing_department: Department::Radiology,
        });
    }
    tracing::debug!(count = studies.len(), "generated imaging studies");
    studies
}

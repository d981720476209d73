//! Vital signs from the age-bucket range table.

use super::PatientIndex;
use crate::catalog::demographics::LAST_NAMES;
use crate::catalog::vitals::{VitalRanges, VITAL_RANGES};
use crate::catalog::band_for;
use crate::config::GenerationConfig;
use crate::formats::round_to;
use crate::records::{Encounter, VitalSign};
use crate::sampling::SamplingContext;
use crate::SynthResult;
use chrono::TimeDelta;
use pedsynth_types::IdSequence;

const STREAM: &str = "vitals";

pub const VITAL_ID_PREFIX: &str = "VS";
pub const VITAL_ID_WIDTH: usize = 8;

/// Share of encounters with a recorded set of vitals.
const RECORDING_RATE: f64 = 0.8;

pub fn generate_vital_signs(
    cfg: &GenerationConfig,
    patients: &PatientIndex<'_>,
    encounters: &[Encounter],
    ids: &mut IdSequence,
) -> SynthResult<Vec<VitalSign>> {
    let mut vitals = Vec::new();
    for encounter in encounters {
        let patient = patients.owner_of(encounter)?;
        let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &encounter.encounter_id);
        if !ctx.chance(RECORDING_RATE) {
            continue;
        }
        let ranges = band_for(&VITAL_RANGES, patient.age)
            .unwrap_or(&VITAL_RANGES[VITAL_RANGES.len() - 1].value);
        vitals.push(sample_vitals(
            &mut ctx,
            ranges,
            encounter,
            ids.next_id(),
        ));
    }
    tracing::debug!(count = vitals.len(), "generated vital signs");
    Ok(vitals)
}

fn sample_vitals(
    ctx: &mut SamplingContext,
    ranges: &VitalRanges,
    encounter: &Encounter,
    vital_sign_id: String,
) -> VitalSign {
    let (t_lo, t_hi) = ranges.temperature_c;
    let (w_lo, w_hi) = ranges.weight_kg;
    let (h_lo, h_hi) = ranges.height_cm;
    VitalSign {
        vital_sign_id,
        encounter_id: encounter.encounter_id.clone(),
        patient_id: encounter.patient_id.clone(),
        temperature: round_to(ctx.float_in(t_lo, t_hi), 1),
        heart_rate: ctx.int_in(ranges.heart_rate.0..=ranges.heart_rate.1),
        respiratory_rate: ctx.int_in(ranges.respiratory_rate.0..=ranges.respiratory_rate.1),
        blood_pressure_systolic: ctx.int_in(ranges.systolic.0..=ranges.systolic.1),
        blood_pressure_diastolic: ctx.int_in(ranges.diastolic.0..=ranges.diastolic.1),
        oxygen_saturation: ctx.int_in(ranges.oxygen_saturation.0..=ranges.oxygen_saturation.1),
        weight_kg: round_to(ctx.float_in(w_lo, w_hi), 2),
        height_cm: round_to(ctx.float_in(h_lo, h_hi), 1),
        recorded_date: encounter.encounter_date + TimeDelta::minutes(ctx.int_in(15..=120)),
        recorded_by: format!("Nurse {}", ctx.choose(&LAST_NAMES)),
    }
}

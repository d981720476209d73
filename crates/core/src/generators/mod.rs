//! Record generators.
//!
//! Each generator consumes already-generated parent records and emits child records
//! in parent order. Randomness comes from a per-record [`SamplingContext`] keyed by
//! the parent's id, and ids come from the caller's [`IdSequence`]s, so the output for
//! a patient is the same whichever batch it lands in.
//!
//! [`IdSequence`]: pedsynth_types::IdSequence

pub mod demographics;
pub mod diagnoses;
pub mod encounters;
pub mod imaging;
pub mod labs;
pub mod medications;
pub mod reference;
pub mod vitals;

use crate::catalog::demographics::{FEMALE_FIRST_NAMES, LAST_NAMES, MALE_FIRST_NAMES};
use crate::records::{Encounter, EncounterScoped, Patient};
use crate::sampling::SamplingContext;
use crate::{SynthError, SynthResult};
use chrono::{Months, NaiveDateTime, TimeDelta};
use std::collections::HashMap;

/// Uniform timestamp in `[start, end]`, to the second. Returns `start` when the
/// interval is empty.
pub(crate) fn between(
    ctx: &mut SamplingContext,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + TimeDelta::seconds(ctx.int_in(0..=span))
}

/// `at` moved back by whole calendar years.
pub(crate) fn years_before(at: NaiveDateTime, years: u32) -> NaiveDateTime {
    at.checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Random staff name from the shared name tables.
pub(crate) fn staff_name(ctx: &mut SamplingContext) -> (&'static str, &'static str) {
    let first = if ctx.chance(0.5) {
        *ctx.choose(&MALE_FIRST_NAMES)
    } else {
        *ctx.choose(&FEMALE_FIRST_NAMES)
    };
    (first, *ctx.choose(&LAST_NAMES))
}

/// Patients of the current batch, by id.
#[derive(Debug)]
pub struct PatientIndex<'a> {
    by_id: HashMap<&'a str, &'a Patient>,
}

impl<'a> PatientIndex<'a> {
    pub fn new(patients: &'a [Patient]) -> Self {
        Self {
            by_id: patients.iter().map(|p| (p.patient_id.as_str(), p)).collect(),
        }
    }

    /// The patient an encounter belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::UnknownPatient`] if the encounter references a patient
    /// that was not generated.
    pub fn owner_of(&self, encounter: &Encounter) -> SynthResult<&'a Patient> {
        self.by_id
            .get(encounter.patient_id.as_str())
            .copied()
            .ok_or_else(|| SynthError::UnknownPatient {
                encounter_id: encounter.encounter_id.clone(),
                patient_id: encounter.patient_id.clone(),
            })
    }
}

/// Group child records by owning encounter. Every encounter gets an entry, possibly
/// empty, and records keep their input order.
///
/// # Errors
///
/// Returns [`SynthError::UnknownEncounter`] for a record whose encounter is not in
/// `encounters`.
pub fn by_encounter<'e, 'r, T: EncounterScoped>(
    encounters: &'e [Encounter],
    records: &'r [T],
) -> SynthResult<HashMap<&'e str, Vec<&'r T>>> {
    let mut grouped: HashMap<&str, Vec<&T>> = encounters
        .iter()
        .map(|e| (e.encounter_id.as_str(), Vec::new()))
        .collect();
    for record in records {
        grouped
            .get_mut(record.encounter_id())
            .ok_or_else(|| SynthError::UnknownEncounter {
                record: record.record_id().to_string(),
                encounter_id: record.encounter_id().to_string(),
            })?
            .push(record);
    }
    Ok(grouped)
}

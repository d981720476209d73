//! Patient population.

use super::{between, years_before};
use crate::catalog::demographics::{
    ADULT_INSURANCE_AGE, AGE_WEIGHTS, ETHNICITIES, FEMALE_FIRST_NAMES, HISPANIC_LANGUAGES,
    HISPANIC_OR_LATINO, LAST_NAMES, MALE_FIRST_NAMES, OTHER_LANGUAGES, PEDIATRIC_INSURANCE,
    RACES, YOUNG_ADULT_INSURANCE, ZIP_CODES,
};
use crate::config::GenerationConfig;
use crate::records::{Patient, Sex};
use crate::sampling::SamplingContext;
use chrono::{Months, NaiveDate, TimeDelta};
use pedsynth_types::IdSequence;
use std::ops::Range;

const STREAM: &str = "demographics";

pub const PATIENT_ID_PREFIX: &str = "TCH";
pub const PATIENT_ID_WIDTH: usize = 6;

/// Oldest registration date relative to the reference time.
const REGISTRATION_WINDOW_YEARS: u32 = 5;

/// Generate the patients at 0-based positions `indices`.
///
/// Ids are positional (`TCH-` + 1-based position), so a patient's record does not
/// depend on how the population is split into batches.
pub fn generate_patients(cfg: &GenerationConfig, indices: Range<usize>) -> Vec<Patient> {
    let patients: Vec<Patient> = indices
        .map(|index| {
            let id = IdSequence::format(PATIENT_ID_PREFIX, PATIENT_ID_WIDTH, index as u64 + 1);
            generate_patient(cfg, id)
        })
        .collect();
    tracing::debug!(count = patients.len(), "generated patients");
    patients
}

fn generate_patient(cfg: &GenerationConfig, patient_id: String) -> Patient {
    let mut ctx = SamplingContext::for_record(cfg.seed(), STREAM, &patient_id);
    let as_of = cfg.as_of();

    let age = *ctx.weighted(&AGE_WEIGHTS);
    let date_of_birth = birth_date(as_of.date(), age, ctx.int_in(0..=364));
    let gender = if ctx.chance(0.5) {
        Sex::Male
    } else {
        Sex::Female
    };
    let race = *ctx.weighted(&RACES);
    let ethnicity = *ctx.weighted(&ETHNICITIES);
    let zip_code = *ctx.choose(&ZIP_CODES);
    let insurance_type = if age < ADULT_INSURANCE_AGE {
        *ctx.weighted(&PEDIATRIC_INSURANCE)
    } else {
        *ctx.weighted(&YOUNG_ADULT_INSURANCE)
    };
    let language = if ethnicity == HISPANIC_OR_LATINO {
        *ctx.weighted(&HISPANIC_LANGUAGES)
    } else {
        *ctx.weighted(&OTHER_LANGUAGES)
    };
    let mrn = format!("MRN{}", ctx.digits(8));
    let first_name = match gender {
        Sex::Male => *ctx.choose(&MALE_FIRST_NAMES),
        Sex::Female => *ctx.choose(&FEMALE_FIRST_NAMES),
    };
    let last_name = *ctx.choose(&LAST_NAMES);

    // Registration cannot precede birth.
    let born_at = date_of_birth.and_time(chrono::NaiveTime::MIN);
    let window_start = years_before(as_of, REGISTRATION_WINDOW_YEARS).max(born_at);
    let created_date = between(&mut ctx, window_start, as_of);

    Patient {
        patient_id,
        mrn,
        first_name,
        last_name,
        date_of_birth,
        age,
        gender,
        race,
        ethnicity,
        zip_code,
        insurance_type,
        language,
        created_date,
    }
}

/// `as_of` less `age` calendar years and `extra_days` (< 365) days, so the patient is
/// exactly `age` on `as_of`.
fn birth_date(as_of: NaiveDate, age: u32, extra_days: i64) -> NaiveDate {
    let anniversary = as_of
        .checked_sub_months(Months::new(age * 12))
        .unwrap_or(NaiveDate::MIN);
    anniversary
        .checked_sub_signed(TimeDelta::days(extra_days))
        .unwrap_or(anniversary)
}

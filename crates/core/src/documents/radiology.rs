//! Radiology reports for imaging studies.

use super::notes::short_age_phrase;
use super::{body, DocumentDraft, ProviderRoster, SkipReason};
use crate::catalog::imaging::{CLINICAL_IMPRESSION, NORMAL_IMPRESSION};
use crate::catalog::Department;
use crate::records::{Encounter, ImagingStudy, Patient};
use crate::sampling::SamplingContext;

const SIGNED_AT: &str = "%m/%d/%Y %H:%M";
const NORMAL_IMPRESSION_RATE: f64 = 0.9;

/// The study being reported plus its owning encounter and patient.
#[derive(Debug, Clone, Copy)]
pub struct StudyFacts<'a> {
    pub patient: &'a Patient,
    pub encounter: &'a Encounter,
    pub study: &'a ImagingStudy,
}

/// Join finding phrases into sentences: "Lungs are clear. No free air."
fn findings_text(findings: &[&str]) -> String {
    findings
        .iter()
        .map(|phrase| {
            let mut chars = phrase.chars();
            match chars.next() {
                Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .filter(|sentence| !sentence.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Report for a completed or final study. The synthesizer filters out the rest.
pub fn render_report(
    ctx: &mut SamplingContext,
    facts: &StudyFacts<'_>,
    roster: &ProviderRoster<'_>,
) -> Result<DocumentDraft, SkipReason> {
    let study = facts.study;
    let patient = facts.patient;
    let study_type = study.study_type;

    let count = ctx.usize_in(2..=4);
    let findings = ctx.sample(study_type.findings(), count);
    let impression = if ctx.chance(NORMAL_IMPRESSION_RATE) {
        NORMAL_IMPRESSION
    } else {
        CLINICAL_IMPRESSION
    };
    let radiology = Department::Radiology.name();
    let radiologist = roster.signature(ctx, radiology);

    let text = format!(
        "PATIENT: {last}, {first}\n\
         MRN: {mrn}\n\
         AGE: {age} {gender}\n\n\
         STUDY: {study_name}\n\
         INDICATION: {indication}\n\n\
         TECHNIQUE: {technique}\n\n\
         FINDINGS: {findings}\n\n\
         IMPRESSION: {impression}\n\n\
         Electronically signed by:\n\
         {radiologist}\n\
         Department of Radiology\n\
         {signed}",
        last = patient.last_name,
        first = patient.first_name,
        mrn = patient.mrn,
        age = short_age_phrase(patient.age),
        gender = patient.gender.noun(),
        study_name = study.study_name,
        indication = facts.encounter.chief_complaint,
        technique = study_type.technique(),
        findings = findings_text(&findings),
        signed = study.study_date.format(SIGNED_AT),
    );

    Ok(DocumentDraft {
        patient_id: patient.patient_id.clone(),
        encounter_id: study.encounter_id.clone(),
        note_type: format!("{} Report", study.study_name),
        author: radiologist,
        department: radiology.to_string(),
        note_date: study.study_date,
        diagnosis_codes: String::new(),
        imaging_study_id: Some(study.imaging_study_id.clone()),
        study_type: Some(study_type),
        body: body(text)?,
    })
}

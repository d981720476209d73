//! Progress, nursing, discharge and consultation notes.

use super::vocabulary::{
    specialty_recommendations, EXAM_SYSTEMS, FOCUSED_VITAL_FINDINGS, INFANT_COURSE,
    NURSING_OBSERVATIONS, OLDER_COURSE, PAIN_PLACEHOLDER, ROUTINE_ADMISSION, ROUTINE_ASSESSMENT,
    ROUTINE_FOLLOW_UP, ROUTINE_PLAN, SEVERITY_TERMS, SYMPTOMS, VITAL_SIGNS_SYSTEM,
};
use super::{body, DocumentDraft, DocumentKind, EncounterFacts, ProviderRoster, SkipReason};
use crate::catalog::diagnoses::{care_plan, GENERIC_FOLLOW_UP, GENERIC_PLAN};
use crate::generators::staff_name;
use crate::records::Diagnosis;
use crate::sampling::SamplingContext;
use chrono::{NaiveDateTime, TimeDelta};

const US_DATE: &str = "%m/%d/%Y";
const MAX_LISTED_MEDICATIONS: usize = 5;
const MAX_HISTORY_DIAGNOSES: usize = 3;

pub fn render_note(
    ctx: &mut SamplingContext,
    kind: DocumentKind,
    facts: &EncounterFacts<'_>,
    roster: &ProviderRoster<'_>,
) -> Result<DocumentDraft, SkipReason> {
    match kind {
        DocumentKind::Progress => progress_note(ctx, facts),
        DocumentKind::Nursing => nursing_note(ctx, facts),
        DocumentKind::Discharge => discharge_summary(facts),
        DocumentKind::Consultation => consultation_note(ctx, facts, roster),
    }
}

/// Standard header shared by every clinical note.
pub fn medical_header(facts: &EncounterFacts<'_>) -> String {
    let p = facts.patient;
    let e = facts.encounter;
    format!(
        "PATIENT: {} {}\nMRN: {}\nDOB: {}\nENCOUNTER DATE: {}\nATTENDING: {}\nDEPARTMENT: {}\n\n",
        p.first_name,
        p.last_name,
        p.mrn,
        p.date_of_birth.format(US_DATE),
        e.encounter_date.format(US_DATE),
        e.attending_physician,
        e.department.name(),
    )
}

/// "newborn", "2-year-old", "7-year-old child", "15-year-old adolescent".
fn age_phrase(age: u32) -> String {
    match age {
        0 => "newborn".to_string(),
        1..=2 => format!("{age}-year-old"),
        3..=12 => format!("{age}-year-old child"),
        _ => format!("{age}-year-old adolescent"),
    }
}

pub(crate) fn short_age_phrase(age: u32) -> String {
    if age == 0 {
        "newborn".to_string()
    } else {
        format!("{age}-year-old")
    }
}

/// "a", "a and b", "a, b and c".
fn join_phrases(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain (40%), negated (20%) or severity-qualified (40%) mention.
fn describe_symptom(ctx: &mut SamplingContext, symptom: &str) -> String {
    let roll = ctx.uniform();
    if roll < 0.2 {
        format!("denies {symptom}")
    } else if roll < 0.6 {
        format!("{} {symptom}", ctx.choose(&SEVERITY_TERMS))
    } else {
        symptom.to_string()
    }
}

fn diagnosis_codes(diagnoses: &[&Diagnosis]) -> String {
    diagnoses
        .iter()
        .map(|d| d.diagnosis_code)
        .collect::<Vec<_>>()
        .join(";")
}

/// Assessment line and plan items for the primary diagnosis.
fn assessment_and_plan(diagnoses: &[&Diagnosis]) -> (&'static str, &'static [&'static str]) {
    match diagnoses.first() {
        Some(primary) => match care_plan(primary.diagnosis_code) {
            Some(template) => (template.assessment, template.plan),
            None => (primary.diagnosis_description, &GENERIC_PLAN[..]),
        },
        None => (ROUTINE_ASSESSMENT, &ROUTINE_PLAN[..]),
    }
}

fn follow_up(primary: Option<&Diagnosis>) -> &'static [&'static str] {
    match primary {
        Some(primary) => care_plan(primary.diagnosis_code)
            .map(|template| template.plan)
            .unwrap_or(&GENERIC_FOLLOW_UP[..]),
        None => &ROUTINE_FOLLOW_UP[..],
    }
}

fn draft(
    facts: &EncounterFacts<'_>,
    note_type: String,
    author: String,
    note_date: NaiveDateTime,
    diagnosis_codes: String,
    text: String,
) -> Result<DocumentDraft, SkipReason> {
    Ok(DocumentDraft {
        patient_id: facts.patient.patient_id.clone(),
        encounter_id: facts.encounter.encounter_id.clone(),
        note_type,
        author,
        department: facts.encounter.department.name().to_string(),
        note_date,
        diagnosis_codes,
        imaging_study_id: None,
        study_type: None,
        body: body(text)?,
    })
}

fn progress_note(
    ctx: &mut SamplingContext,
    facts: &EncounterFacts<'_>,
) -> Result<DocumentDraft, SkipReason> {
    let patient = facts.patient;
    let encounter = facts.encounter;
    let complaint = encounter.chief_complaint;

    let count = ctx.usize_in(2..=4);
    let symptoms: Vec<String> = ctx
        .sample(&SYMPTOMS, count)
        .into_iter()
        .map(|symptom| describe_symptom(ctx, symptom))
        .collect();
    let days = ctx.int_in(1..=10);
    let reporter = if patient.age <= 2 {
        "Parents report"
    } else {
        "Patient reports"
    };
    let mut hpi = format!(
        "This {} {} presents with {}. {reporter} {} for the past {days} {}.",
        age_phrase(patient.age),
        patient.gender.noun(),
        complaint.to_lowercase(),
        join_phrases(&symptoms),
        if days == 1 { "day" } else { "days" },
    );
    if !facts.diagnoses.is_empty() && ctx.chance(0.6) {
        let history: Vec<String> = facts
            .diagnoses
            .iter()
            .take(MAX_HISTORY_DIAGNOSES)
            .map(|d| d.diagnosis_description.to_lowercase())
            .collect();
        hpi.push_str(&format!(" History notable for {}.", history.join(", ")));
    }

    let mut exam = Vec::new();
    for (system, findings) in EXAM_SYSTEMS {
        if ctx.chance(0.8) {
            let finding = if system == VITAL_SIGNS_SYSTEM && ctx.chance(0.5) {
                *ctx.choose(&FOCUSED_VITAL_FINDINGS)
            } else {
                *ctx.choose(findings)
            };
            exam.push(format!("{system}: {finding}"));
        }
    }

    let (assessment, plan) = assessment_and_plan(facts.diagnoses);
    let text = format!(
        "{header}CHIEF COMPLAINT: {complaint}\n\n\
         HISTORY OF PRESENT ILLNESS:\n{hpi}\n\n\
         PHYSICAL EXAMINATION:\n{exam}\n\n\
         ASSESSMENT: {assessment}\n\n\
         PLAN:\n{plan}",
        header = medical_header(facts),
        exam = exam.join("\n"),
        plan = bullet_list(plan),
    );
    draft(
        facts,
        "Progress Note".to_string(),
        encounter.attending_physician.clone(),
        encounter.encounter_date,
        diagnosis_codes(facts.diagnoses),
        text,
    )
}

fn nursing_note(
    ctx: &mut SamplingContext,
    facts: &EncounterFacts<'_>,
) -> Result<DocumentDraft, SkipReason> {
    let count = ctx.usize_in(3..=6);
    let observations: Vec<String> = ctx
        .sample(&NURSING_OBSERVATIONS, count)
        .into_iter()
        .map(|observation| {
            if observation.contains(PAIN_PLACEHOLDER) {
                observation.replace(PAIN_PLACEHOLDER, &ctx.int_in(1..=8).to_string())
            } else {
                observation.to_string()
            }
        })
        .collect();
    let (first, last) = staff_name(ctx);
    let nurse = format!("{first} {last}, RN");
    let note_date = facts.encounter.encounter_date + TimeDelta::hours(ctx.int_in(2..=12));

    let text = format!(
        "{header}NURSING ASSESSMENT:\n\n{observations}\n\n\
         Patient continues to be monitored per protocol. Family updated on plan of care.\n\n\
         {nurse}",
        header = medical_header(facts),
        observations = bullet_list(&observations),
    );
    draft(
        facts,
        "Nursing Note".to_string(),
        nurse,
        note_date,
        String::new(),
        text,
    )
}

fn discharge_summary(facts: &EncounterFacts<'_>) -> Result<DocumentDraft, SkipReason> {
    let primary = facts.diagnoses.first().copied();
    let patient = facts.patient;
    let encounter = facts.encounter;

    let final_diagnoses: Vec<String> = facts
        .diagnoses
        .iter()
        .map(|d| format!("{} ({})", d.diagnosis_description, d.diagnosis_code))
        .collect();

    let stay_days = encounter.length_of_stay.max(1);
    let course = format!(
        "This {} {} was admitted for {}. During the {stay_days}-day hospital stay, the patient {}",
        short_age_phrase(patient.age),
        patient.gender.noun(),
        primary
            .map(|d| d.diagnosis_description.to_lowercase())
            .unwrap_or_else(|| ROUTINE_ADMISSION.to_string()),
        if patient.age <= 2 {
            INFANT_COURSE
        } else {
            OLDER_COURSE
        },
    );

    let medications = if facts.medications.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = facts
            .medications
            .iter()
            .take(MAX_LISTED_MEDICATIONS)
            .map(|m| format!("{} {} {}", m.medication_name, m.dosage, m.frequency))
            .collect();
        format!("DISCHARGE MEDICATIONS:\n{}\n\n", bullet_list(&lines))
    };

    let text = format!(
        "{header}DISCHARGE SUMMARY\n\n\
         ADMISSION DATE: {admitted}\n\
         DISCHARGE DATE: {discharged}\n\n\
         FINAL DIAGNOSES:\n{final_diagnoses}\n\n\
         HOSPITAL COURSE:\n{course}\n\n\
         {medications}\
         FOLLOW-UP INSTRUCTIONS:\n{follow_up}\n\n\
         DISCHARGE CONDITION: Stable and improved",
        header = medical_header(facts),
        admitted = encounter.admission_date.format(US_DATE),
        discharged = encounter.discharge_date.format(US_DATE),
        final_diagnoses = bullet_list(&final_diagnoses),
        follow_up = bullet_list(follow_up(primary)),
    );
    draft(
        facts,
        "Discharge Summary".to_string(),
        encounter.attending_physician.clone(),
        encounter.discharge_date,
        diagnosis_codes(facts.diagnoses),
        text,
    )
}

fn consultation_note(
    ctx: &mut SamplingContext,
    facts: &EncounterFacts<'_>,
    roster: &ProviderRoster<'_>,
) -> Result<DocumentDraft, SkipReason> {
    let department = facts.encounter.department;
    let specialty = department.name();
    let patient = facts.patient;

    let reason = match facts.diagnoses.first() {
        Some(primary) => format!(
            "Consultation requested for {}",
            primary.diagnosis_description.to_lowercase()
        ),
        None => "Consultation requested for evaluation".to_string(),
    };
    let consultant = roster.signature(ctx, specialty);
    let note_date = facts.encounter.encounter_date + TimeDelta::days(ctx.int_in(0..=2));

    let text = format!(
        "{header}CONSULTATION NOTE - {upper}\n\n\
         PATIENT: {age} {gender}\n\n\
         REASON FOR CONSULTATION: {reason}\n\n\
         ASSESSMENT:\n\
         Thank you for this {lower} consultation. I have reviewed the patient's history, \
         examined the patient, and reviewed available studies.\n\n\
         RECOMMENDATIONS:\n{recommendations}\n\n\
         I will continue to follow along with the primary team as needed.\n\n\
         {consultant}\n{specialty}",
        header = medical_header(facts),
        upper = specialty.to_uppercase(),
        lower = specialty.to_lowercase(),
        age = short_age_phrase(patient.age),
        gender = patient.gender.noun(),
        recommendations = bullet_list(specialty_recommendations(department)),
    );
    draft(
        facts,
        format!("{specialty} Consultation"),
        consultant,
        note_date,
        diagnosis_codes(facts.diagnoses),
        text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Department;
    use crate::generators::fixtures::{encounter, patient, ts};
    use crate::records::{EncounterType, Medication, Patient};

    fn dx(id: &str, code: &'static str, description: &'static str) -> Diagnosis {
        Diagnosis {
            diagnosis_id: id.into(),
            encounter_id: "ENC-00000001".into(),
            patient_id: "TCH-000001".into(),
            diagnosis_code: code,
            diagnosis_description: description,
            diagnosis_type: "Primary",
            diagnosis_date: ts("2024-03-04 10:00:00"),
        }
    }

    fn med(id: &str, name: &'static str) -> Medication {
        Medication {
            medication_id: id.into(),
            encounter_id: "ENC-00000001".into(),
            patient_id: "TCH-000001".into(),
            medication_name: name,
            dosage: "As directed",
            frequency: "Twice daily",
            route: "Oral",
            start_date: ts("2024-03-04 10:00:00"),
            end_date: ts("2024-03-10 10:00:00"),
            prescribing_provider: "Dr. Grace Kim, MD".into(),
        }
    }

    fn render(
        seed: u64,
        kind: DocumentKind,
        patient: &Patient,
        dept: Department,
        encounter_type: EncounterType,
        diagnoses: &[&Diagnosis],
        medications: &[&Medication],
    ) -> Result<DocumentDraft, SkipReason> {
        let enc = encounter("ENC-00000001", &patient.patient_id, dept, encounter_type);
        let facts = EncounterFacts {
            patient,
            encounter: &enc,
            diagnoses,
            medications,
        };
        let roster = ProviderRoster::default();
        let mut ctx = SamplingContext::from_seed(seed);
        render_note(&mut ctx, kind, &facts, &roster)
    }

    #[test]
    fn test_join_phrases() {
        let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(join_phrases(&s(&["a"])), "a");
        assert_eq!(join_phrases(&s(&["a", "b"])), "a and b");
        assert_eq!(join_phrases(&s(&["a", "b", "c"])), "a, b and c");
    }

    #[test]
    fn test_age_phrases() {
        assert_eq!(age_phrase(0), "newborn");
        assert_eq!(age_phrase(2), "2-year-old");
        assert_eq!(age_phrase(7), "7-year-old child");
        assert_eq!(age_phrase(15), "15-year-old adolescent");
        assert_eq!(short_age_phrase(15), "15-year-old");
    }

    #[test]
    fn test_symptom_phrasing_mix() {
        let mut ctx = SamplingContext::from_seed(11);
        let n = 10_000;
        let (mut negated, mut plain) = (0, 0);
        for _ in 0..n {
            let s = describe_symptom(&mut ctx, "cough");
            if s.starts_with("denies ") {
                negated += 1;
            } else if s == "cough" {
                plain += 1;
            } else {
                let qualifier = s.strip_suffix(" cough").unwrap();
                assert!(SEVERITY_TERMS.contains(&qualifier));
            }
        }
        let negated = negated as f64 / n as f64;
        let plain = plain as f64 / n as f64;
        assert!((negated - 0.2).abs() < 0.02, "negated {negated}");
        assert!((plain - 0.4).abs() < 0.02, "plain {plain}");
    }

    #[test]
    fn test_progress_note_uses_curated_plan() {
        let p = patient("TCH-000001", 9);
        let asthma = dx("DX-1", "J45.9", "Asthma, unspecified");
        let note = render(
            1,
            DocumentKind::Progress,
            &p,
            Department::Pulmonology,
            EncounterType::Outpatient,
            &[&asthma],
            &[],
        )
        .unwrap();
        let text = note.body.as_str();
        assert!(text.starts_with("PATIENT: Mia Nguyen\nMRN: MRN10000000\n"));
        assert!(text.contains("DOB: 05/01/2015"));
        assert!(text.contains("ENCOUNTER DATE: 03/04/2024"));
        assert!(text.contains("CHIEF COMPLAINT: Fever"));
        assert!(text.contains("This 9-year-old child female presents with fever."));
        assert!(text.contains("Patient reports "));
        assert!(text.contains("ASSESSMENT: Asthma exacerbation"));
        assert!(text.contains("- Asthma action plan reviewed with family"));
        assert_eq!(note.note_type, "Progress Note");
        assert_eq!(note.diagnosis_codes, "J45.9");
        assert_eq!(note.author, "Dr. Grace Kim, MD");
        assert_eq!(note.department, "Pulmonology");
    }

    #[test]
    fn test_progress_note_generic_and_routine_plans() {
        let p = patient("TCH-000001", 1);
        let otitis = dx("DX-1", "H66.90", "Otitis media, unspecified");
        let note = render(
            2,
            DocumentKind::Progress,
            &p,
            Department::GeneralPediatrics,
            EncounterType::Outpatient,
            &[&otitis],
            &[],
        )
        .unwrap();
        let text = note.body.as_str();
        assert!(text.contains("ASSESSMENT: Otitis media, unspecified"));
        assert!(text.contains("- Continue current treatment"));
        assert!(text.contains("Parents report "));

        let note = render(
            2,
            DocumentKind::Progress,
            &p,
            Department::GeneralPediatrics,
            EncounterType::Outpatient,
            &[],
            &[],
        )
        .unwrap();
        assert!(note.body.as_str().contains("ASSESSMENT: Routine pediatric care"));
        assert_eq!(note.diagnosis_codes, "");
    }

    #[test]
    fn test_history_mentions_only_encounter_diagnoses() {
        let p = patient("TCH-000001", 14);
        let a = dx("DX-1", "F90.9", "ADHD, unspecified type");
        let b = dx("DX-2", "F41.9", "Anxiety disorder, unspecified");
        for seed in 0..40 {
            let note = render(
                seed,
                DocumentKind::Progress,
                &p,
                Department::Psychiatry,
                EncounterType::Outpatient,
                &[&a, &b],
                &[],
            )
            .unwrap();
            let text = note.body.as_str();
            if let Some(start) = text.find("History notable for ") {
                let rest = &text[start + "History notable for ".len()..];
                let listed = &rest[..rest.find(".\n").unwrap()];
                assert_eq!(
                    listed,
                    "adhd, unspecified type, anxiety disorder, unspecified"
                );
            }
        }
    }

    #[test]
    fn test_discharge_lists_only_encounter_diagnoses() {
        let p = patient("TCH-000001", 6);
        let a = dx("DX-1", "J18.9", "Pneumonia, unspecified organism");
        let b = dx("DX-2", "J06.9", "Acute upper respiratory infection, unspecified");
        let meds: Vec<Medication> = (1..=7).map(|i| med(&format!("MED-{i}"), "Amoxicillin")).collect();
        let med_refs: Vec<&Medication> = meds.iter().collect();
        let note = render(
            3,
            DocumentKind::Discharge,
            &p,
            Department::GeneralPediatrics,
            EncounterType::Inpatient,
            &[&a, &b],
            &med_refs,
        )
        .unwrap();
        let text = note.body.as_str();

        let section = text
            .split("FINAL DIAGNOSES:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        let codes: Vec<&str> = section
            .lines()
            .map(|line| line.rsplit('(').next().unwrap().trim_end_matches(')'))
            .collect();
        assert_eq!(codes, ["J18.9", "J06.9"]);
        assert_eq!(note.diagnosis_codes, "J18.9;J06.9");

        assert!(text.contains("ADMISSION DATE: 03/04/2024"));
        assert!(text.contains("DISCHARGE DATE: 03/07/2024"));
        assert!(text.contains("During the 3-day hospital stay"));
        assert_eq!(text.matches("- Amoxicillin As directed Twice daily").count(), 5);
        assert!(text.contains("- Follow up with primary care provider in 1-2 weeks"));
        assert_eq!(note.note_date, ts("2024-03-07 10:00:00"));
    }

    #[test]
    fn test_discharge_without_diagnoses_uses_routine_text() {
        let p = patient("TCH-000001", 6);
        let note = render(
            3,
            DocumentKind::Discharge,
            &p,
            Department::GeneralPediatrics,
            EncounterType::Inpatient,
            &[],
            &[],
        )
        .unwrap();
        let text = note.body.as_str();
        assert!(text.contains("was admitted for evaluation and treatment."));
        assert!(text.contains(
            "FOLLOW-UP INSTRUCTIONS:\n- Routine follow-up as previously scheduled"
        ));
        assert!(!text.contains("DISCHARGE MEDICATIONS"));
        assert_eq!(note.diagnosis_codes, "");
    }

    #[test]
    fn test_vital_signs_exam_line_favours_focused_findings() {
        let p = patient("TCH-000001", 3);
        let general = EXAM_SYSTEMS
            .iter()
            .find(|(system, _)| *system == VITAL_SIGNS_SYSTEM)
            .map(|(_, findings)| *findings)
            .unwrap();
        let (mut lines, mut stable) = (0, 0);
        for seed in 0..1000 {
            let note = render(
                seed,
                DocumentKind::Progress,
                &p,
                Department::GeneralPediatrics,
                EncounterType::Outpatient,
                &[],
                &[],
            )
            .unwrap();
            let finding = note
                .body
                .as_str()
                .lines()
                .find_map(|l| l.strip_prefix("VITAL_SIGNS: "))
                .map(str::to_string);
            if let Some(finding) = finding {
                assert!(general.contains(&finding.as_str()), "{finding}");
                lines += 1;
                if finding == "stable" {
                    stable += 1;
                }
            }
        }
        // "stable" is only reachable from the general list: 0.5 * 1/5.
        let rate = f64::from(stable) / f64::from(lines);
        assert!((0.05..0.15).contains(&rate), "{rate}");
    }

    #[test]
    fn test_nursing_note_observation_count() {
        let p = patient("TCH-000001", 4);
        for seed in 0..30 {
            let note = render(
                seed,
                DocumentKind::Nursing,
                &p,
                Department::EmergencyDepartment,
                EncounterType::Emergency,
                &[],
                &[],
            )
            .unwrap();
            let text = note.body.as_str();
            let bullets = text.lines().filter(|l| l.starts_with("- ")).count();
            assert!((3..=6).contains(&bullets));
            assert!(!text.contains(PAIN_PLACEHOLDER));
            assert!(note.author.ends_with(", RN"));
            let hours = (note.note_date - ts("2024-03-04 10:00:00")).num_hours();
            assert!((2..=12).contains(&hours));
        }
    }

    #[test]
    fn test_cardiology_consultation_note() {
        let p = patient("TCH-000001", 12);
        let vsd = dx("DX-1", "Q21.0", "Ventricular septal defect");
        let note = render(
            4,
            DocumentKind::Consultation,
            &p,
            Department::Cardiology,
            EncounterType::Outpatient,
            &[&vsd],
            &[],
        )
        .unwrap();
        let text = note.body.as_str();
        assert_eq!(note.note_type, "Cardiology Consultation");
        assert!(text.contains("CONSULTATION NOTE - CARDIOLOGY"));
        assert!(text.contains("Consultation requested for ventricular septal defect"));
        assert!(text.contains("- Echo recommended to evaluate cardiac function"));
    }
}

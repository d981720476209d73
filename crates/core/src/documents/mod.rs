//! Narrative documents built from already-generated structured records.
//!
//! A renderer only sees the records of one patient and encounter (plus the study,
//! for radiology reports), so everything a document states can be traced back to a
//! row in the structured tables. Rendering a single document never fails the run:
//! missing inputs produce a [`DocumentOutcome::Skipped`] with a [`SkipReason`], which
//! the [`DocumentSynthesizer`] logs and counts.
//!
//! Referential problems (an encounter without a patient, a diagnosis for an unknown
//! encounter) are not skips. They abort the run like in every other generator.

pub mod notes;
pub mod radiology;
pub mod vocabulary;

use crate::catalog::imaging::is_reportable;
use crate::catalog::StudyType;
use crate::config::GenerationConfig;
use crate::constants::COMPRESSION_SUFFIX;
use crate::generators::{by_encounter, staff_name, PatientIndex};
use crate::records::{
    ClinicalDocument, Diagnosis, Encounter, EncounterType, ImagingStudy, Medication, Patient,
    Provider,
};
use crate::sampling::SamplingContext;
use crate::{SynthError, SynthResult};
use chrono::NaiveDateTime;
use pedsynth_types::{IdSequence, NonEmptyText};
use serde::Serialize;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt;

pub const NOTE_ID_PREFIX: &str = "NOTE";
pub const REPORT_ID_PREFIX: &str = "RAD";
pub const DOCUMENT_ID_WIDTH: usize = 8;

const NOTE_STREAM: &str = "documents";
const REPORT_STREAM: &str = "radiology";
const NOTE_SAMPLE_STREAM: &str = "document-sample";
const REPORT_SAMPLE_STREAM: &str = "report-sample";

/// Clinical note types produced per encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Progress,
    Nursing,
    Discharge,
    Consultation,
}

impl DocumentKind {
    /// Notes written for an encounter, in rendering order. Every encounter gets a
    /// progress note; inpatient stays add nursing and discharge, emergency visits add
    /// nursing, and consulting specialties add a consultation.
    pub fn for_encounter(encounter: &Encounter) -> Vec<DocumentKind> {
        let mut kinds = vec![DocumentKind::Progress];
        match encounter.encounter_type {
            EncounterType::Inpatient => {
                kinds.push(DocumentKind::Nursing);
                kinds.push(DocumentKind::Discharge);
            }
            EncounterType::Emergency => kinds.push(DocumentKind::Nursing),
            EncounterType::Outpatient => {}
        }
        if encounter.department.is_consulting_specialty() {
            kinds.push(DocumentKind::Consultation);
        }
        kinds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The rendered text was blank.
    EmptyBody,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::EmptyBody => "empty_body",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Rendered(ClinicalDocument),
    Skipped(SkipReason),
}

/// Skipped documents by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipCounts(BTreeMap<SkipReason, u64>);

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        *self.0.entry(reason).or_insert(0) += 1;
    }

    pub fn get(&self, reason: SkipReason) -> u64 {
        self.0.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, u64)> + '_ {
        self.0.iter().map(|(reason, count)| (*reason, *count))
    }
}

/// Everything a clinical note may draw on for one encounter.
#[derive(Debug, Clone, Copy)]
pub struct EncounterFacts<'a> {
    pub patient: &'a Patient,
    pub encounter: &'a Encounter,
    /// In generation order; the first entry is the primary diagnosis.
    pub diagnoses: &'a [&'a Diagnosis],
    pub medications: &'a [&'a Medication],
}

/// A rendered document before it is given an id and file name.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDraft {
    pub patient_id: String,
    pub encounter_id: String,
    pub note_type: String,
    pub author: String,
    pub department: String,
    pub note_date: NaiveDateTime,
    pub diagnosis_codes: String,
    pub imaging_study_id: Option<String>,
    pub study_type: Option<StudyType>,
    pub body: NonEmptyText,
}

/// Validate a composed body.
pub(crate) fn body(text: String) -> Result<NonEmptyText, SkipReason> {
    NonEmptyText::new(text).map_err(|_| SkipReason::EmptyBody)
}

/// Active providers by specialty, used to sign documents.
#[derive(Debug, Default)]
pub struct ProviderRoster<'a> {
    by_specialty: HashMap<&'a str, Vec<&'a Provider>>,
}

impl<'a> ProviderRoster<'a> {
    pub fn new(providers: &'a [Provider]) -> Self {
        let mut by_specialty: HashMap<&str, Vec<&Provider>> = HashMap::new();
        for provider in providers.iter().filter(|p| p.status == "Active") {
            by_specialty
                .entry(provider.specialty)
                .or_default()
                .push(provider);
        }
        Self { by_specialty }
    }

    /// Signature of a random active provider in `specialty`. Falls back to a generated
    /// name when the roster has nobody for it.
    pub fn signature(&self, ctx: &mut SamplingContext, specialty: &str) -> String {
        match self.by_specialty.get(specialty) {
            Some(providers) if !providers.is_empty() => {
                let p = ctx.choose(providers);
                format!("Dr. {} {}, {}", p.first_name, p.last_name, p.credentials)
            }
            _ => {
                let (first, last) = staff_name(ctx);
                format!("Dr. {first} {last}, MD")
            }
        }
    }
}

/// Admission rule over a record's own draw.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cutoff {
    Below(f64),
    AtMost(f64),
}

/// Deterministic document sample. A record is admitted when its own draw is below
/// `rate` and, if more records than `cap` qualify, is among the `cap` lowest draws of
/// the run. The decision depends only on the record id, never on batch boundaries or
/// the order records are seen in.
#[derive(Debug, Clone)]
pub struct DocumentSampler {
    seed: u64,
    stream: &'static str,
    cutoff: Cutoff,
    admitted: usize,
}

impl DocumentSampler {
    /// Sampler with no cap.
    pub fn new(seed: u64, stream: &'static str, rate: f64) -> Self {
        Self {
            seed,
            stream,
            cutoff: Cutoff::Below(rate),
            admitted: 0,
        }
    }

    fn draw(seed: u64, stream: &str, record_id: &str) -> f64 {
        SamplingContext::for_record(seed, stream, record_id).uniform()
    }

    pub fn admit(&mut self, record_id: &str) -> bool {
        let draw = Self::draw(self.seed, self.stream, record_id);
        let admitted = match self.cutoff {
            Cutoff::Below(limit) => draw < limit,
            Cutoff::AtMost(limit) => draw <= limit,
        };
        if admitted {
            self.admitted += 1;
        }
        admitted
    }

    pub fn admitted(&self) -> usize {
        self.admitted
    }
}

/// Builds a capped [`DocumentSampler`] from every record id of a run.
#[derive(Debug)]
pub struct SamplePlanner {
    seed: u64,
    stream: &'static str,
    rate: f64,
    cap: usize,
    /// Bit patterns of the lowest qualifying draws. Non-negative floats order the
    /// same as their bits.
    lowest: BinaryHeap<u64>,
    qualified: usize,
}

impl SamplePlanner {
    pub fn new(seed: u64, stream: &'static str, rate: f64, cap: usize) -> Self {
        Self {
            seed,
            stream,
            rate,
            cap,
            lowest: BinaryHeap::new(),
            qualified: 0,
        }
    }

    pub fn observe(&mut self, record_id: &str) {
        let draw = DocumentSampler::draw(self.seed, self.stream, record_id);
        if draw >= self.rate {
            return;
        }
        self.qualified += 1;
        self.lowest.push(draw.to_bits());
        if self.lowest.len() > self.cap {
            self.lowest.pop();
        }
    }

    pub fn finish(self) -> DocumentSampler {
        let cutoff = if self.cap == 0 {
            Cutoff::Below(0.0)
        } else if self.qualified > self.cap {
            match self.lowest.peek() {
                Some(bits) => Cutoff::AtMost(f64::from_bits(*bits)),
                None => Cutoff::Below(0.0),
            }
        } else {
            Cutoff::Below(self.rate)
        };
        tracing::debug!(
            stream = self.stream,
            qualified = self.qualified,
            cap = self.cap,
            "planned document sample"
        );
        DocumentSampler {
            seed: self.seed,
            stream: self.stream,
            cutoff,
            admitted: 0,
        }
    }
}

/// Note sample over encounter ids and report sample over reportable study ids.
#[derive(Debug, Clone)]
pub struct DocumentSamples {
    pub notes: DocumentSampler,
    pub reports: DocumentSampler,
}

/// Collects every encounter and study of a run before any document is written.
#[derive(Debug)]
pub struct SamplePlan {
    notes: SamplePlanner,
    reports: SamplePlanner,
}

impl SamplePlan {
    pub fn new(cfg: &GenerationConfig) -> Self {
        let rate = cfg.document_sample_rate();
        let cap = cfg.max_document_encounters();
        Self {
            notes: SamplePlanner::new(cfg.seed(), NOTE_SAMPLE_STREAM, rate, cap),
            reports: SamplePlanner::new(cfg.seed(), REPORT_SAMPLE_STREAM, rate, cap),
        }
    }

    pub fn observe(&mut self, encounters: &[Encounter], studies: &[ImagingStudy]) {
        for encounter in encounters {
            self.notes.observe(&encounter.encounter_id);
        }
        for study in studies.iter().filter(|s| is_reportable(s.study_status)) {
            self.reports.observe(&study.imaging_study_id);
        }
    }

    pub fn finish(self) -> DocumentSamples {
        DocumentSamples {
            notes: self.notes.finish(),
            reports: self.reports.finish(),
        }
    }
}

/// Stateful document stage. Owns the document id counters, the samplers and the
/// skip tally for the whole run.
#[derive(Debug)]
pub struct DocumentSynthesizer<'a> {
    seed: u64,
    compress: bool,
    roster: ProviderRoster<'a>,
    note_ids: IdSequence,
    report_ids: IdSequence,
    samples: DocumentSamples,
    skips: SkipCounts,
}

impl<'a> DocumentSynthesizer<'a> {
    pub fn new(
        cfg: &GenerationConfig,
        providers: &'a [Provider],
        samples: DocumentSamples,
    ) -> Self {
        Self {
            seed: cfg.seed(),
            compress: cfg.compress(),
            roster: ProviderRoster::new(providers),
            note_ids: IdSequence::new(NOTE_ID_PREFIX, DOCUMENT_ID_WIDTH),
            report_ids: IdSequence::new(REPORT_ID_PREFIX, DOCUMENT_ID_WIDTH),
            samples,
            skips: SkipCounts::default(),
        }
    }

    pub fn skips(&self) -> &SkipCounts {
        &self.skips
    }

    /// Encounters admitted to the note sample so far.
    pub fn sampled_encounters(&self) -> usize {
        self.samples.notes.admitted()
    }

    /// Clinical notes for the sampled encounters of one batch.
    ///
    /// # Errors
    ///
    /// Returns a referential error if an encounter, diagnosis or medication points at
    /// a record outside the batch.
    pub fn clinical_notes(
        &mut self,
        patients: &PatientIndex<'_>,
        encounters: &[Encounter],
        diagnoses: &[Diagnosis],
        medications: &[Medication],
    ) -> SynthResult<Vec<ClinicalDocument>> {
        let dx_by_encounter = by_encounter(encounters, diagnoses)?;
        let meds_by_encounter = by_encounter(encounters, medications)?;

        let mut documents = Vec::new();
        for encounter in encounters {
            let patient = patients.owner_of(encounter)?;
            if !self.samples.notes.admit(&encounter.encounter_id) {
                continue;
            }
            let key = encounter.encounter_id.as_str();
            let facts = EncounterFacts {
                patient,
                encounter,
                diagnoses: dx_by_encounter.get(key).map(Vec::as_slice).unwrap_or(&[]),
                medications: meds_by_encounter.get(key).map(Vec::as_slice).unwrap_or(&[]),
            };
            let mut ctx = SamplingContext::for_record(self.seed, NOTE_STREAM, key);
            for kind in DocumentKind::for_encounter(encounter) {
                match self.note(&mut ctx, kind, &facts) {
                    DocumentOutcome::Rendered(document) => documents.push(document),
                    DocumentOutcome::Skipped(reason) => {
                        self.record_skip(reason, &patient.patient_id, &encounter.encounter_id)
                    }
                }
            }
        }
        tracing::debug!(count = documents.len(), "generated clinical notes");
        Ok(documents)
    }

    /// Render one note for an encounter.
    pub fn note(
        &mut self,
        ctx: &mut SamplingContext,
        kind: DocumentKind,
        facts: &EncounterFacts<'_>,
    ) -> DocumentOutcome {
        match notes::render_note(ctx, kind, facts, &self.roster) {
            Ok(draft) => DocumentOutcome::Rendered(self.finish(draft, DocumentFamily::Note)),
            Err(reason) => DocumentOutcome::Skipped(reason),
        }
    }

    /// Radiology reports for the reportable, sampled studies of one batch.
    ///
    /// # Errors
    ///
    /// Returns a referential error if a study's encounter or patient is not in the
    /// batch.
    pub fn radiology_reports(
        &mut self,
        patients: &PatientIndex<'_>,
        encounters: &[Encounter],
        studies: &[ImagingStudy],
    ) -> SynthResult<Vec<ClinicalDocument>> {
        let encounter_by_id: HashMap<&str, &Encounter> = encounters
            .iter()
            .map(|e| (e.encounter_id.as_str(), e))
            .collect();

        let mut reports = Vec::new();
        for study in studies {
            let encounter = encounter_by_id
                .get(study.encounter_id.as_str())
                .copied()
                .ok_or_else(|| SynthError::UnknownEncounter {
                    record: study.imaging_study_id.clone(),
                    encounter_id: study.encounter_id.clone(),
                })?;
            let patient = patients.owner_of(encounter)?;
            if !is_reportable(study.study_status)
                || !self.samples.reports.admit(&study.imaging_study_id)
            {
                continue;
            }
            let mut ctx =
                SamplingContext::for_record(self.seed, REPORT_STREAM, &study.imaging_study_id);
            let facts = radiology::StudyFacts {
                patient,
                encounter,
                study,
            };
            match self.report(&mut ctx, &facts) {
                DocumentOutcome::Rendered(document) => reports.push(document),
                DocumentOutcome::Skipped(reason) => {
                    self.record_skip(reason, &patient.patient_id, &encounter.encounter_id)
                }
            }
        }
        tracing::debug!(count = reports.len(), "generated radiology reports");
        Ok(reports)
    }

    /// Render one radiology report.
    pub fn report(
        &mut self,
        ctx: &mut SamplingContext,
        facts: &radiology::StudyFacts<'_>,
    ) -> DocumentOutcome {
        match radiology::render_report(ctx, facts, &self.roster) {
            Ok(draft) => DocumentOutcome::Rendered(self.finish(draft, DocumentFamily::Report)),
            Err(reason) => DocumentOutcome::Skipped(reason),
        }
    }

    fn finish(&mut self, draft: DocumentDraft, family: DocumentFamily) -> ClinicalDocument {
        let (note_id, file_stem) = match family {
            DocumentFamily::Note => (self.note_ids.next_id(), "note"),
            DocumentFamily::Report => (self.report_ids.next_id(), "radiology"),
        };
        let mut file_name = format!("{file_stem}_{note_id}.txt");
        if self.compress {
            file_name.push_str(COMPRESSION_SUFFIX);
        }
        let DocumentDraft {
            patient_id,
            encounter_id,
            note_type,
            author,
            department,
            note_date,
            diagnosis_codes,
            imaging_study_id,
            study_type,
            body,
        } = draft;
        ClinicalDocument {
            note_id,
            patient_id,
            encounter_id,
            note_type,
            author,
            department,
            note_date,
            diagnosis_codes,
            imaging_study_id,
            study_type,
            file_name,
            note_content: body,
        }
    }

    fn record_skip(&mut self, reason: SkipReason, patient_id: &str, encounter_id: &str) {
        tracing::warn!(patient_id, encounter_id, %reason, "skipped document");
        self.skips.record(reason);
    }
}

#[derive(Debug, Clone, Copy)]
enum DocumentFamily {
    Note,
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Department;
    use crate::config::GenerationSettings;
    use crate::generators::fixtures::{config, encounter, patient, ts};

    fn sampled_config(rate: f64, cap: usize, compress: bool) -> GenerationConfig {
        GenerationConfig::new(GenerationSettings {
            patient_count: 10,
            encounters_per_patient: 2,
            document_sample_rate: rate,
            max_document_encounters: cap,
            compress,
            ..GenerationSettings::default()
        })
        .unwrap()
    }

    fn synthesizer(
        cfg: &GenerationConfig,
        encounters: &[Encounter],
        studies: &[ImagingStudy],
    ) -> DocumentSynthesizer<'static> {
        let mut plan = SamplePlan::new(cfg);
        plan.observe(encounters, studies);
        DocumentSynthesizer::new(cfg, &[], plan.finish())
    }

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}-{i:08}")).collect()
    }

    fn diagnosis(id: &str, encounter_id: &str) -> Diagnosis {
        Diagnosis {
            diagnosis_id: id.into(),
            encounter_id: encounter_id.into(),
            patient_id: "TCH-000001".into(),
            diagnosis_code: "J18.9",
            diagnosis_description: "Pneumonia, unspecified organism",
            diagnosis_type: "Primary",
            diagnosis_date: ts("2024-03-04 10:00:00"),
        }
    }

    #[test]
    fn test_kinds_per_encounter() {
        let kinds = |dept, kind| DocumentKind::for_encounter(&encounter("E", "P", dept, kind));
        assert_eq!(
            kinds(Department::GeneralPediatrics, EncounterType::Outpatient),
            [DocumentKind::Progress]
        );
        assert_eq!(
            kinds(Department::GeneralPediatrics, EncounterType::Inpatient),
            [
                DocumentKind::Progress,
                DocumentKind::Nursing,
                DocumentKind::Discharge
            ]
        );
        assert_eq!(
            kinds(Department::EmergencyDepartment, EncounterType::Emergency),
            [DocumentKind::Progress, DocumentKind::Nursing]
        );
        assert_eq!(
            kinds(Department::Neurology, EncounterType::Outpatient),
            [DocumentKind::Progress, DocumentKind::Consultation]
        );
    }

    #[test]
    fn test_sampler_respects_rate_and_cap() {
        let encounters = ids("ENC", 20);
        let mut planner = SamplePlanner::new(42, "document-sample", 1.0, 5);
        encounters.iter().for_each(|id| planner.observe(id));
        let mut capped = planner.finish();
        let admitted = encounters.iter().filter(|id| capped.admit(id)).count();
        assert_eq!(admitted, 5);
        assert_eq!(capped.admitted(), 5);

        let mut none = DocumentSampler::new(42, "document-sample", 0.0);
        assert!(encounters.iter().all(|id| !none.admit(id)));

        let mut planner = SamplePlanner::new(42, "document-sample", 1.0, 0);
        encounters.iter().for_each(|id| planner.observe(id));
        let mut zero = planner.finish();
        assert!(encounters.iter().all(|id| !zero.admit(id)));

        let mut half = DocumentSampler::new(42, "document-sample", 0.5);
        let admitted = ids("ENC", 4000).iter().filter(|id| half.admit(id)).count();
        assert!((1800..=2200).contains(&admitted), "{admitted}");
    }

    #[test]
    fn test_capped_sample_is_spread_over_the_run() {
        let encounters = ids("ENC", 1000);
        let mut planner = SamplePlanner::new(42, "document-sample", 1.0, 100);
        encounters.iter().for_each(|id| planner.observe(id));
        let mut sampler = planner.finish();
        let admitted: Vec<usize> = (0..encounters.len())
            .filter(|&i| sampler.admit(&encounters[i]))
            .collect();
        assert_eq!(admitted.len(), 100);
        // Not just the first hundred ids: a uniform sample reaches the last tenth.
        assert!(admitted.iter().any(|&i| i >= 900), "{admitted:?}");
        let late = admitted.iter().filter(|&&i| i >= 500).count();
        assert!((30..=70).contains(&late), "{late}");
    }

    #[test]
    fn test_sampler_decision_depends_only_on_record() {
        let encounters = ids("ENC", 200);
        let plan = |order: &[String]| {
            let mut planner = SamplePlanner::new(7, "document-sample", 0.5, 40);
            order.iter().for_each(|id| planner.observe(id));
            planner.finish()
        };
        let reversed: Vec<String> = encounters.iter().rev().cloned().collect();
        let (mut a, mut b) = (plan(&encounters), plan(&reversed));
        let first: Vec<bool> = encounters.iter().map(|id| a.admit(id)).collect();
        let second: Vec<bool> = reversed.iter().map(|id| b.admit(id)).collect();
        let second: Vec<bool> = second.into_iter().rev().collect();
        assert_eq!(first, second);
        assert_eq!(a.admitted(), 40);
    }

    #[test]
    fn test_skip_counts() {
        let mut counts = SkipCounts::default();
        assert_eq!(counts.get(SkipReason::EmptyBody), 0);
        counts.record(SkipReason::EmptyBody);
        counts.record(SkipReason::EmptyBody);
        assert_eq!(counts.get(SkipReason::EmptyBody), 2);
        assert_eq!(counts.total(), 2);
        assert_eq!(
            serde_json::to_value(&counts).unwrap(),
            serde_json::json!({"empty_body": 2})
        );
    }

    #[test]
    fn test_roster_signs_with_active_specialist() {
        let providers = crate::generators::reference::generate_providers(&config(42));
        let roster = ProviderRoster::new(&providers);
        let mut ctx = SamplingContext::from_seed(3);
        for _ in 0..50 {
            let signature = roster.signature(&mut ctx, "Radiology");
            assert!(providers.iter().any(|p| p.specialty == "Radiology"
                && p.status == "Active"
                && signature
                    == format!("Dr. {} {}, {}", p.first_name, p.last_name, p.credentials)));
        }
        assert!(roster
            .signature(&mut ctx, "Veterinary Medicine")
            .ends_with(", MD"));
    }

    #[test]
    fn test_notes_link_to_encounters_in_order() {
        let cfg = sampled_config(1.0, 100, false);
        let patients = vec![patient("TCH-000001", 7)];
        let index = PatientIndex::new(&patients);
        let encounters = vec![
            encounter(
                "ENC-00000001",
                "TCH-000001",
                Department::Cardiology,
                EncounterType::Inpatient,
            ),
            encounter(
                "ENC-00000002",
                "TCH-000001",
                Department::GeneralPediatrics,
                EncounterType::Inpatient,
            ),
        ];
        let diagnoses = vec![diagnosis("DX-00000001", "ENC-00000001")];

        let mut synth = synthesizer(&cfg, &encounters, &[]);
        let notes = synth
            .clinical_notes(&index, &encounters, &diagnoses, &[])
            .unwrap();

        let types: Vec<(&str, &str)> = notes
            .iter()
            .map(|n| (n.encounter_id.as_str(), n.note_type.as_str()))
            .collect();
        assert_eq!(
            types,
            [
                ("ENC-00000001", "Progress Note"),
                ("ENC-00000001", "Nursing Note"),
                ("ENC-00000001", "Discharge Summary"),
                ("ENC-00000001", "Cardiology Consultation"),
                ("ENC-00000002", "Progress Note"),
                ("ENC-00000002", "Nursing Note"),
                ("ENC-00000002", "Discharge Summary"),
            ]
        );
        assert_eq!(synth.skips().total(), 0);
        assert_eq!(synth.sampled_encounters(), 2);

        assert_eq!(notes[0].note_id, "NOTE-00000001");
        assert_eq!(notes[0].file_name, "note_NOTE-00000001.txt");
        assert_eq!(notes[6].note_id, "NOTE-00000007");
        assert!(notes.iter().all(|n| n.patient_id == "TCH-000001"));
    }

    #[test]
    fn test_note_ids_continue_across_batches() {
        let cfg = sampled_config(1.0, 100, true);
        let patients = vec![patient("TCH-000001", 7)];
        let index = PatientIndex::new(&patients);
        let first = vec![encounter(
            "ENC-00000001",
            "TCH-000001",
            Department::Dermatology,
            EncounterType::Outpatient,
        )];
        let second = vec![encounter(
            "ENC-00000002",
            "TCH-000001",
            Department::Dermatology,
            EncounterType::Outpatient,
        )];
        let all: Vec<Encounter> = first.iter().chain(&second).cloned().collect();
        let mut synth = synthesizer(&cfg, &all, &[]);
        let a = synth.clinical_notes(&index, &first, &[], &[]).unwrap();
        let b = synth.clinical_notes(&index, &second, &[], &[]).unwrap();
        assert_eq!(a[0].note_id, "NOTE-00000001");
        assert_eq!(b[0].note_id, "NOTE-00000002");
        assert_eq!(b[0].file_name, "note_NOTE-00000002.txt.gz");
    }

    #[test]
    fn test_reports_only_for_reportable_studies() {
        let cfg = sampled_config(1.0, 100, false);
        let patients = vec![patient("TCH-000001", 3)];
        let index = PatientIndex::new(&patients);
        let encounters = vec![encounter(
            "ENC-00000001",
            "TCH-000001",
            Department::EmergencyDepartment,
            EncounterType::Emergency,
        )];
        let study = |id: &str, status: &'static str| ImagingStudy {
            imaging_study_id: id.into(),
            encounter_id: "ENC-00000001".into(),
            patient_id: "TCH-000001".into(),
            study_type: StudyType::AbdominalXray,
            study_name: StudyType::AbdominalXray.study_name(),
            modality: "XR",
            body_part: "Abdomen",
            study_status: status,
            study_date: ts("2024-03-04 12:00:00"),
            ordering_provider: "Dr. Grace Kim, MD".into(),
            performing_department: Department::Radiology,
        };
        let studies = vec![
            study("IMG-00000001", "Completed"),
            study("IMG-00000002", "Preliminary"),
            study("IMG-00000003", "Final"),
        ];
        let mut synth = synthesizer(&cfg, &encounters, &studies);
        let reports = synth.radiology_reports(&index, &encounters, &studies).unwrap();
        let linked: Vec<Option<&str>> = reports
            .iter()
            .map(|r| r.imaging_study_id.as_deref())
            .collect();
        assert_eq!(linked, [Some("IMG-00000001"), Some("IMG-00000003")]);
        assert_eq!(reports[1].note_id, "RAD-00000002");
        assert_eq!(reports[1].file_name, "radiology_RAD-00000002.txt");
        assert_eq!(synth.skips().total(), 0);

        let orphan = vec![ImagingStudy {
            encounter_id: "ENC-00000404".into(),
            ..study("IMG-00000004", "Final")
        }];
        assert!(matches!(
            synth.radiology_reports(&index, &encounters, &orphan),
            Err(SynthError::UnknownEncounter { .. })
        ));
    }
}

//! Run orchestration.
//!
//! A run clears previous output, writes the reference tables, then walks the
//! patient population in batches. Each batch runs every per-patient stage in
//! dependency order and streams its rows to the table writers before the next
//! batch starts, so memory stays bounded by the batch size.

use crate::config::GenerationConfig;
use crate::documents::{DocumentSamples, DocumentSynthesizer, SamplePlan, SkipCounts};
use crate::generators::demographics::generate_patients;
use crate::generators::diagnoses::{generate_diagnoses, DIAGNOSIS_ID_PREFIX, DIAGNOSIS_ID_WIDTH};
use crate::generators::encounters::{
    generate_encounters, ENCOUNTER_ID_PREFIX, ENCOUNTER_ID_WIDTH,
};
use crate::generators::imaging::{generate_imaging_studies, IMAGING_ID_PREFIX, IMAGING_ID_WIDTH};
use crate::generators::labs::{generate_lab_results, LAB_ID_PREFIX, LAB_ID_WIDTH};
use crate::generators::medications::{
    generate_medications, MEDICATION_ID_PREFIX, MEDICATION_ID_WIDTH,
};
use crate::generators::reference::{generate_departments, generate_providers};
use crate::generators::vitals::{generate_vital_signs, VITAL_ID_PREFIX, VITAL_ID_WIDTH};
use crate::generators::PatientIndex;
use crate::output::{write_documents, EntityTable, OutputLayout, RunMetadata, TableWriter};
use crate::records::{
    ClinicalDocument, DepartmentRecord, Diagnosis, Encounter, ImagingStudy, LabResult,
    Medication, Patient, Provider, VitalSign,
};
use crate::{SynthError, SynthResult};
use pedsynth_types::IdSequence;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Generation stages. Reference stages run once per run; the others once per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Providers,
    Departments,
    Demographics,
    Encounters,
    Diagnoses,
    Vitals,
    Labs,
    Imaging,
    Medications,
    Documents,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Providers => "providers",
            Stage::Departments => "departments",
            Stage::Demographics => "demographics",
            Stage::Encounters => "encounters",
            Stage::Diagnoses => "diagnoses",
            Stage::Vitals => "vitals",
            Stage::Labs => "labs",
            Stage::Imaging => "imaging",
            Stage::Medications => "medications",
            Stage::Documents => "documents",
        }
    }

    /// Stages that must complete before this one starts.
    pub fn dependencies(self) -> &'static [Stage] {
        match self {
            Stage::Providers | Stage::Departments | Stage::Demographics => &[],
            Stage::Encounters => &[Stage::Demographics],
            Stage::Diagnoses | Stage::Vitals | Stage::Labs | Stage::Imaging => {
                &[Stage::Encounters]
            }
            Stage::Medications => &[Stage::Diagnoses],
            Stage::Documents => &[
                Stage::Demographics,
                Stage::Encounters,
                Stage::Diagnoses,
                Stage::Medications,
                Stage::Imaging,
                Stage::Providers,
            ],
        }
    }

    pub fn is_per_batch(self) -> bool {
        !matches!(self, Stage::Providers | Stage::Departments)
    }
}

/// Completed stages for the current batch plus the run-level reference stages.
#[derive(Debug, Default)]
pub struct StageTracker {
    completed: BTreeSet<Stage>,
}

impl StageTracker {
    /// Check that every dependency of `stage` has completed.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::StageOrder`] naming the first missing dependency.
    pub fn begin(&self, stage: Stage) -> SynthResult<()> {
        match stage
            .dependencies()
            .iter()
            .find(|dep| !self.completed.contains(dep))
        {
            Some(missing) => Err(SynthError::StageOrder {
                stage: stage.name(),
                missing: missing.name(),
            }),
            None => Ok(()),
        }
    }

    pub fn complete(&mut self, stage: Stage) {
        self.completed.insert(stage);
    }

    pub fn is_complete(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    /// Forget per-batch stages so the next batch starts from demographics.
    pub fn start_batch(&mut self) {
        self.completed.retain(|stage| !stage.is_per_batch());
    }

    /// Run `body` as `stage`, marking it complete on success.
    fn run<T>(&mut self, stage: Stage, body: impl FnOnce() -> SynthResult<T>) -> SynthResult<T> {
        self.begin(stage)?;
        let out = body()?;
        self.complete(stage);
        Ok(out)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub counts: BTreeMap<EntityTable, u64>,
    pub skipped_documents: SkipCounts,
    pub sampled_encounters: usize,
    pub batches: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn count(&self, table: EntityTable) -> u64 {
        self.counts.get(&table).copied().unwrap_or(0)
    }

    /// Rows across every table.
    pub fn total_records(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// One open writer per table.
struct TableWriters {
    patients: TableWriter<Patient>,
    encounters: TableWriter<Encounter>,
    diagnoses: TableWriter<Diagnosis>,
    lab_results: TableWriter<LabResult>,
    medications: TableWriter<Medication>,
    vital_signs: TableWriter<VitalSign>,
    imaging_studies: TableWriter<ImagingStudy>,
    providers: TableWriter<Provider>,
    departments: TableWriter<DepartmentRecord>,
    clinical_notes: TableWriter<ClinicalDocument>,
    radiology_reports: TableWriter<ClinicalDocument>,
}

impl TableWriters {
    fn create(layout: &OutputLayout) -> SynthResult<Self> {
        let compress = layout.compress();
        let path = |table| layout.table_path(table);
        Ok(Self {
            patients: TableWriter::create(path(EntityTable::Patients), compress)?,
            encounters: TableWriter::create(path(EntityTable::Encounters), compress)?,
            diagnoses: TableWriter::create(path(EntityTable::Diagnoses), compress)?,
            lab_results: TableWriter::create(path(EntityTable::LabResults), compress)?,
            medications: TableWriter::create(path(EntityTable::Medications), compress)?,
            vital_signs: TableWriter::create(path(EntityTable::VitalSigns), compress)?,
            imaging_studies: TableWriter::create(path(EntityTable::ImagingStudies), compress)?,
            providers: TableWriter::create(path(EntityTable::Providers), compress)?,
            departments: TableWriter::create(path(EntityTable::Departments), compress)?,
            clinical_notes: TableWriter::create(path(EntityTable::ClinicalNotes), compress)?,
            radiology_reports: TableWriter::create(
                path(EntityTable::RadiologyReports),
                compress,
            )?,
        })
    }

    fn finish(self) -> SynthResult<BTreeMap<EntityTable, u64>> {
        Ok(BTreeMap::from([
            (EntityTable::Patients, self.patients.finish()?),
            (EntityTable::Encounters, self.encounters.finish()?),
            (EntityTable::Diagnoses, self.diagnoses.finish()?),
            (EntityTable::LabResults, self.lab_results.finish()?),
            (EntityTable::Medications, self.medications.finish()?),
            (EntityTable::VitalSigns, self.vital_signs.finish()?),
            (EntityTable::ImagingStudies, self.imaging_studies.finish()?),
            (EntityTable::Providers, self.providers.finish()?),
            (EntityTable::Departments, self.departments.finish()?),
            (EntityTable::ClinicalNotes, self.clinical_notes.finish()?),
            (EntityTable::RadiologyReports, self.radiology_reports.finish()?),
        ]))
    }
}

/// Id counters that carry across batches.
struct IdSequences {
    encounters: IdSequence,
    diagnoses: IdSequence,
    labs: IdSequence,
    medications: IdSequence,
    vitals: IdSequence,
    imaging: IdSequence,
}

impl IdSequences {
    fn new() -> Self {
        Self {
            encounters: IdSequence::new(ENCOUNTER_ID_PREFIX, ENCOUNTER_ID_WIDTH),
            diagnoses: IdSequence::new(DIAGNOSIS_ID_PREFIX, DIAGNOSIS_ID_WIDTH),
            labs: IdSequence::new(LAB_ID_PREFIX, LAB_ID_WIDTH),
            medications: IdSequence::new(MEDICATION_ID_PREFIX, MEDICATION_ID_WIDTH),
            vitals: IdSequence::new(VITAL_ID_PREFIX, VITAL_ID_WIDTH),
            imaging: IdSequence::new(IMAGING_ID_PREFIX, IMAGING_ID_WIDTH),
        }
    }
}

/// Replay the demographics, encounter and imaging generators over every batch so the
/// document sample is drawn from the whole run.
fn plan_document_samples(cfg: &GenerationConfig) -> DocumentSamples {
    let mut plan = SamplePlan::new(cfg);
    let mut encounter_ids = IdSequence::new(ENCOUNTER_ID_PREFIX, ENCOUNTER_ID_WIDTH);
    let mut imaging_ids = IdSequence::new(IMAGING_ID_PREFIX, IMAGING_ID_WIDTH);
    let total = cfg.patient_count();
    for start in (0..total).step_by(cfg.batch_size()) {
        let end = (start + cfg.batch_size()).min(total);
        let patients = generate_patients(cfg, start..end);
        let encounters = generate_encounters(cfg, &patients, &mut encounter_ids);
        let studies = generate_imaging_studies(cfg, &encounters, &mut imaging_ids);
        plan.observe(&encounters, &studies);
    }
    plan.finish()
}

/// Everything a batch writes into.
struct RunState<'a> {
    layout: OutputLayout,
    tracker: StageTracker,
    ids: IdSequences,
    documents: DocumentSynthesizer<'a>,
    writers: TableWriters,
}

/// Generate the full dataset described by `cfg`.
///
/// Output from a previous run in the same directory is removed first. Identical
/// configurations produce identical files apart from the metadata timestamp.
///
/// # Errors
///
/// Referential and I/O errors abort the run. Documents that cannot be rendered are
/// skipped and counted instead.
pub fn run(cfg: &GenerationConfig) -> SynthResult<RunSummary> {
    let started = Instant::now();
    let layout = OutputLayout::from_config(cfg);
    tracing::info!(
        output_dir = %layout.root().display(),
        patients = cfg.patient_count(),
        seed = cfg.seed(),
        "starting generation"
    );
    layout.clean()?;
    layout.prepare()?;

    let mut tracker = StageTracker::default();
    let mut writers = TableWriters::create(&layout)?;

    let providers = tracker.run(Stage::Providers, || Ok(generate_providers(cfg)))?;
    writers.providers.write_all(&providers)?;
    tracing::info!(count = providers.len(), "generated providers");

    let departments = tracker.run(Stage::Departments, || Ok(generate_departments(cfg)))?;
    writers.departments.write_all(&departments)?;
    tracing::info!(count = departments.len(), "generated departments");

    let samples = plan_document_samples(cfg);
    let mut state = RunState {
        layout,
        tracker,
        ids: IdSequences::new(),
        documents: DocumentSynthesizer::new(cfg, &providers, samples),
        writers,
    };

    let total = cfg.patient_count();
    let mut batches = 0;
    for start in (0..total).step_by(cfg.batch_size()) {
        let end = (start + cfg.batch_size()).min(total);
        run_batch(cfg, start..end, &mut state)?;
        batches += 1;
        tracing::info!(batch = batches, completed = end, total, "batch complete");
    }

    let RunState {
        layout,
        documents,
        writers,
        ..
    } = state;
    let counts = writers.finish()?;
    let skipped_documents = documents.skips().clone();
    let sampled_encounters = documents.sampled_encounters();

    let generated_at = chrono::Local::now().naive_local();
    RunMetadata::new(cfg, &layout, &counts, skipped_documents.clone(), generated_at)
        .write(&layout.metadata_path())?;

    if skipped_documents.total() > 0 {
        tracing::warn!(
            skipped = skipped_documents.total(),
            "some documents were skipped"
        );
    }
    let summary = RunSummary {
        output_dir: layout.root().to_path_buf(),
        counts,
        skipped_documents,
        sampled_encounters,
        batches,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        records = summary.total_records(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "generation complete"
    );
    Ok(summary)
}

fn run_batch(
    cfg: &GenerationConfig,
    indices: Range<usize>,
    state: &mut RunState<'_>,
) -> SynthResult<()> {
    let RunState {
        layout,
        tracker,
        ids,
        documents,
        writers,
    } = state;
    tracker.start_batch();
    tracing::debug!(first = indices.start, last = indices.end, "starting batch");

    let patients = tracker.run(Stage::Demographics, || Ok(generate_patients(cfg, indices)))?;
    let index = PatientIndex::new(&patients);

    let encounters = tracker.run(Stage::Encounters, || {
        Ok(generate_encounters(cfg, &patients, &mut ids.encounters))
    })?;
    let diagnoses = tracker.run(Stage::Diagnoses, || {
        Ok(generate_diagnoses(cfg, &encounters, &mut ids.diagnoses))
    })?;
    let vitals = tracker.run(Stage::Vitals, || {
        generate_vital_signs(cfg, &index, &encounters, &mut ids.vitals)
    })?;
    let labs = tracker.run(Stage::Labs, || {
        generate_lab_results(cfg, &index, &encounters, &mut ids.labs)
    })?;
    let studies = tracker.run(Stage::Imaging, || {
        Ok(generate_imaging_studies(cfg, &encounters, &mut ids.imaging))
    })?;
    let medications = tracker.run(Stage::Medications, || {
        generate_medications(cfg, &encounters, &diagnoses, &mut ids.medications)
    })?;
    let (notes, reports) = tracker.run(Stage::Documents, || {
        let notes = documents.clinical_notes(&index, &encounters, &diagnoses, &medications)?;
        let reports = documents.radiology_reports(&index, &encounters, &studies)?;
        Ok((notes, reports))
    })?;

    writers.patients.write_all(&patients)?;
    writers.encounters.write_all(&encounters)?;
    writers.diagnoses.write_all(&diagnoses)?;
    writers.vital_signs.write_all(&vitals)?;
    writers.lab_results.write_all(&labs)?;
    writers.imaging_studies.write_all(&studies)?;
    writers.medications.write_all(&medications)?;
    writers.clinical_notes.write_all(&notes)?;
    writers.radiology_reports.write_all(&reports)?;
    write_documents(&layout.clinical_notes_dir(), &notes, layout.compress())?;
    write_documents(&layout.radiology_reports_dir(), &reports, layout.compress())?;

    tracing::debug!(
        patients = patients.len(),
        encounters = encounters.len(),
        notes = notes.len(),
        reports = reports.len(),
        "batch written"
    );
    Ok(())
}

//! On-disk layout and writers.
//!
//! ```text
//! <output_dir>/
//!   structured/<table>.csv[.gz]
//!   unstructured/clinical_notes/note_<NOTE-id>.txt[.gz]
//!   unstructured/radiology_reports/radiology_<RAD-id>.txt[.gz]
//!   dataset_metadata.json
//! ```
//!
//! Every table file is created with its header row before any record is written,
//! so a table that ends up empty still has a header.

use crate::config::{GenerationConfig, GenerationSettings};
use crate::constants::{
    CLINICAL_NOTES_DIR_NAME, COMPRESSION_SUFFIX, GENERATOR_VERSION, METADATA_FILENAME,
    RADIOLOGY_REPORTS_DIR_NAME, STRUCTURED_DIR_NAME, TIMESTAMP_FORMAT, UNSTRUCTURED_DIR_NAME,
};
use crate::documents::SkipCounts;
use crate::records::{ClinicalDocument, TabularRecord};
use crate::{SynthError, SynthResult};
use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Tabular outputs, in the order they are listed in the run metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTable {
    Patients,
    Encounters,
    Diagnoses,
    LabResults,
    Medications,
    VitalSigns,
    ImagingStudies,
    Providers,
    Departments,
    ClinicalNotes,
    RadiologyReports,
}

impl EntityTable {
    pub const ALL: [EntityTable; 11] = [
        EntityTable::Patients,
        EntityTable::Encounters,
        EntityTable::Diagnoses,
        EntityTable::LabResults,
        EntityTable::Medications,
        EntityTable::VitalSigns,
        EntityTable::ImagingStudies,
        EntityTable::Providers,
        EntityTable::Departments,
        EntityTable::ClinicalNotes,
        EntityTable::RadiologyReports,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            EntityTable::Patients => "patients",
            EntityTable::Encounters => "encounters",
            EntityTable::Diagnoses => "diagnoses",
            EntityTable::LabResults => "lab_results",
            EntityTable::Medications => "medications",
            EntityTable::VitalSigns => "vital_signs",
            EntityTable::ImagingStudies => "imaging_studies",
            EntityTable::Providers => "providers",
            EntityTable::Departments => "departments",
            EntityTable::ClinicalNotes => "clinical_notes",
            EntityTable::RadiologyReports => "radiology_reports",
        }
    }

    pub fn file_name(self, compress: bool) -> String {
        let mut name = format!("{}.csv", self.stem());
        if compress {
            name.push_str(COMPRESSION_SUFFIX);
        }
        name
    }
}

/// Paths under the configured output directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    compress: bool,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            root: root.into(),
            compress,
        }
    }

    pub fn from_config(cfg: &GenerationConfig) -> Self {
        Self::new(cfg.output_dir(), cfg.compress())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn structured_dir(&self) -> PathBuf {
        self.root.join(STRUCTURED_DIR_NAME)
    }

    pub fn unstructured_dir(&self) -> PathBuf {
        self.root.join(UNSTRUCTURED_DIR_NAME)
    }

    pub fn clinical_notes_dir(&self) -> PathBuf {
        self.unstructured_dir().join(CLINICAL_NOTES_DIR_NAME)
    }

    pub fn radiology_reports_dir(&self) -> PathBuf {
        self.unstructured_dir().join(RADIOLOGY_REPORTS_DIR_NAME)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILENAME)
    }

    pub fn table_path(&self, table: EntityTable) -> PathBuf {
        self.structured_dir().join(table.file_name(self.compress))
    }

    /// Remove output from a previous run. Anything else in the output directory is
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Cleanup`] with the path that could not be removed.
    pub fn clean(&self) -> SynthResult<()> {
        for dir in [self.structured_dir(), self.unstructured_dir()] {
            if dir.exists() {
                tracing::info!(path = %dir.display(), "removing previous output");
                fs::remove_dir_all(&dir).map_err(|source| SynthError::Cleanup {
                    path: dir.clone(),
                    source,
                })?;
            }
        }
        let metadata = self.metadata_path();
        if metadata.exists() {
            fs::remove_file(&metadata).map_err(|source| SynthError::Cleanup {
                path: metadata.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Create the directory tree.
    pub fn prepare(&self) -> SynthResult<()> {
        for dir in [
            self.structured_dir(),
            self.clinical_notes_dir(),
            self.radiology_reports_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|source| SynthError::OutputDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Plain or gzip file sink.
enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn create(path: &Path, compress: bool) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(if compress {
            // Fixed header mtime so compressed output is byte-for-byte reproducible.
            Sink::Gzip(GzBuilder::new().mtime(0).write(file, Compression::default()))
        } else {
            Sink::Plain(file)
        })
    }

    fn finish(self) -> io::Result<()> {
        match self {
            Sink::Plain(mut file) => file.flush(),
            Sink::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}

/// Streaming CSV writer for one table. Rows are appended batch by batch.
pub struct TableWriter<R: TabularRecord> {
    path: PathBuf,
    writer: csv::Writer<Sink>,
    rows: u64,
    _record: PhantomData<fn(&R)>,
}

impl<R: TabularRecord> TableWriter<R> {
    /// Create the file and write the header row.
    pub fn create(path: PathBuf, compress: bool) -> SynthResult<Self> {
        let sink = Sink::create(&path, compress).map_err(|source| SynthError::FileWrite {
            path: path.clone(),
            source,
        })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::NonNumeric)
            .from_writer(sink);
        writer
            .write_record(R::COLUMNS)
            .map_err(|source| SynthError::Csv {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            writer,
            rows: 0,
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&mut self, records: &[R]) -> SynthResult<()> {
        for record in records {
            self.writer
                .serialize(record)
                .map_err(|source| SynthError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
        }
        self.rows += records.len() as u64;
        Ok(())
    }

    /// Flush and close the file. Returns the number of data rows written.
    pub fn finish(self) -> SynthResult<u64> {
        let Self {
            path, writer, rows, ..
        } = self;
        let sink = writer.into_inner().map_err(|e| SynthError::FileWrite {
            path: path.clone(),
            source: io::Error::new(e.error().kind(), e.error().to_string()),
        })?;
        sink.finish()
            .map_err(|source| SynthError::FileWrite { path, source })?;
        Ok(rows)
    }
}

/// Write each document body to `dir/<file_name>`.
pub fn write_documents(
    dir: &Path,
    documents: &[ClinicalDocument],
    compress: bool,
) -> SynthResult<()> {
    for document in documents {
        let path = dir.join(&document.file_name);
        let to_io = |source: io::Error| SynthError::FileWrite {
            path: path.clone(),
            source,
        };
        let mut sink = Sink::create(&path, compress).map_err(to_io)?;
        sink.write_all(document.note_content.as_str().as_bytes())
            .map_err(to_io)?;
        sink.finish().map_err(to_io)?;
    }
    Ok(())
}

/// Run summary written to `dataset_metadata.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub generated_date: String,
    pub generator_version: &'static str,
    pub configuration: GenerationSettings,
    pub target_patients: usize,
    pub target_encounters_per_patient: u32,
    pub actual_statistics: BTreeMap<&'static str, u64>,
    pub skipped_documents: SkipCounts,
    pub data_characteristics: DataCharacteristics,
    pub file_structure: FileStructure,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataCharacteristics {
    pub age_distribution: &'static str,
    pub geographic_focus: &'static str,
    pub insurance_mix: &'static str,
    pub condition_prevalence: &'static str,
    pub clinical_realism: &'static str,
    pub reference_date: String,
    pub seed: u64,
}

impl DataCharacteristics {
    fn describe(cfg: &GenerationConfig) -> Self {
        Self {
            age_distribution: "Pediatric (0-21 years) with higher concentration in younger ages",
            geographic_focus: "Houston metropolitan area zip codes",
            insurance_mix: "Pediatric insurance distribution (Medicaid, Commercial, CHIP)",
            condition_prevalence: "Department-conditioned pediatric diagnosis mix",
            clinical_realism: "Age-appropriate diagnoses, medications, and vital signs",
            reference_date: cfg.as_of().format(TIMESTAMP_FORMAT).to_string(),
            seed: cfg.seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStructure {
    pub structured_data: PathBuf,
    pub unstructured_data: PathBuf,
    pub csv_files: Vec<String>,
    pub text_files: BTreeMap<&'static str, u64>,
}

impl RunMetadata {
    pub fn new(
        cfg: &GenerationConfig,
        layout: &OutputLayout,
        counts: &BTreeMap<EntityTable, u64>,
        skipped_documents: SkipCounts,
        generated_at: chrono::NaiveDateTime,
    ) -> Self {
        let count = |table: EntityTable| counts.get(&table).copied().unwrap_or(0);
        let actual_statistics = EntityTable::ALL
            .iter()
            .map(|table| (table.stem(), count(*table)))
            .collect();
        let text_files = BTreeMap::from([
            (CLINICAL_NOTES_DIR_NAME, count(EntityTable::ClinicalNotes)),
            (RADIOLOGY_REPORTS_DIR_NAME, count(EntityTable::RadiologyReports)),
        ]);
        Self {
            generated_date: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            generator_version: GENERATOR_VERSION,
            configuration: cfg.settings().clone(),
            target_patients: cfg.patient_count(),
            target_encounters_per_patient: cfg.encounters_per_patient(),
            actual_statistics,
            skipped_documents,
            data_characteristics: DataCharacteristics::describe(cfg),
            file_structure: FileStructure {
                structured_data: layout.structured_dir(),
                unstructured_data: layout.unstructured_dir(),
                csv_files: EntityTable::ALL
                    .iter()
                    .map(|table| table.file_name(layout.compress()))
                    .collect(),
                text_files,
            },
        }
    }

    pub fn write(&self, path: &Path) -> SynthResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(SynthError::Metadata)?;
        fs::write(path, json).map_err(|source| SynthError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

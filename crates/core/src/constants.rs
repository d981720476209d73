//! Constants used throughout the generator.
//!
//! Output layout names and run defaults live here so that the writer, the pipeline
//! and the command line agree on them.

/// Default directory for generated output when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "data/mock_data";

/// Subdirectory holding one CSV file per entity.
pub const STRUCTURED_DIR_NAME: &str = "structured";

/// Subdirectory holding generated document text files.
pub const UNSTRUCTURED_DIR_NAME: &str = "unstructured";

/// Folder (under unstructured) for progress, nursing, discharge and consultation notes.
pub const CLINICAL_NOTES_DIR_NAME: &str = "clinical_notes";

/// Folder (under unstructured) for radiology reports.
pub const RADIOLOGY_REPORTS_DIR_NAME: &str = "radiology_reports";

/// Filename for the run metadata summary.
pub const METADATA_FILENAME: &str = "dataset_metadata.json";

/// Suffix appended to every output file when compression is enabled.
pub const COMPRESSION_SUFFIX: &str = ".gz";

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_PATIENT_COUNT: usize = 500_000;
pub const DEFAULT_ENCOUNTERS_PER_PATIENT: u32 = 5;
pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_MAX_DOCUMENT_ENCOUNTERS: usize = 100_000;

/// Reference "now" used when none is configured. Fixed so that identical arguments
/// reproduce identical output on any day.
pub const DEFAULT_AS_OF: &str = "2025-01-01 00:00:00";

/// Test-run profile sizes.
pub const TEST_RUN_PATIENT_COUNT: usize = 1_000;
pub const TEST_RUN_ENCOUNTERS_PER_PATIENT: u32 = 3;

/// Timestamp format used in tabular output and configuration.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used in tabular output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

//! Generation configuration.
//!
//! Settings are resolved once at process startup (command line, optional YAML file,
//! environment defaults) and validated into a [`GenerationConfig`] before any
//! generation begins. Generators and the pipeline only ever see the validated form.

use crate::constants::{
    DATE_FORMAT, DEFAULT_AS_OF, DEFAULT_BATCH_SIZE, DEFAULT_ENCOUNTERS_PER_PATIENT,
    DEFAULT_MAX_DOCUMENT_ENCOUNTERS, DEFAULT_OUTPUT_DIR, DEFAULT_PATIENT_COUNT, DEFAULT_SEED,
    TEST_RUN_ENCOUNTERS_PER_PATIENT, TEST_RUN_PATIENT_COUNT, TIMESTAMP_FORMAT,
};
use crate::{SynthError, SynthResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unvalidated generation settings, as read from a config file or assembled by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationSettings {
    pub patient_count: usize,
    pub encounters_per_patient: u32,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub compress: bool,
    /// Reference "now" (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`).
    pub as_of: String,
    pub batch_size: usize,
    pub max_document_encounters: usize,
    pub document_sample_rate: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            patient_count: DEFAULT_PATIENT_COUNT,
            encounters_per_patient: DEFAULT_ENCOUNTERS_PER_PATIENT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: DEFAULT_SEED,
            compress: false,
            as_of: DEFAULT_AS_OF.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_document_encounters: DEFAULT_MAX_DOCUMENT_ENCOUNTERS,
            document_sample_rate: 1.0,
        }
    }
}

impl GenerationSettings {
    /// Load settings from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> SynthResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| SynthError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> SynthResult<Self> {
        serde_yaml::from_str(contents).map_err(SynthError::ConfigParse)
    }
}

/// Run size profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunProfile {
    /// Use the configured counts.
    Full,
    /// Small fixed dataset for smoke testing.
    TestRun,
}

impl RunProfile {
    pub fn apply(self, settings: &mut GenerationSettings) {
        if self == RunProfile::TestRun {
            settings.patient_count = TEST_RUN_PATIENT_COUNT;
            settings.encounters_per_patient = TEST_RUN_ENCOUNTERS_PER_PATIENT;
        }
    }
}

/// Validated configuration for one generation run.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    settings: GenerationSettings,
    as_of: NaiveDateTime,
}

impl GenerationConfig {
    /// Validate settings. Every configuration error is reported here, before any
    /// output is touched.
    pub fn new(settings: GenerationSettings) -> SynthResult<Self> {
        if settings.patient_count == 0 {
            return Err(SynthError::InvalidConfig(
                "patient_count must be at least 1".into(),
            ));
        }
        if settings.encounters_per_patient == 0 {
            return Err(SynthError::InvalidConfig(
                "encounters_per_patient must be at least 1".into(),
            ));
        }
        if settings.batch_size == 0 {
            return Err(SynthError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        if !settings.document_sample_rate.is_finite()
            || !(0.0..=1.0).contains(&settings.document_sample_rate)
        {
            return Err(SynthError::InvalidConfig(format!(
                "document_sample_rate must be within 0.0..=1.0, got {}",
                settings.document_sample_rate
            )));
        }
        if settings.output_dir.as_os_str().is_empty() {
            return Err(SynthError::InvalidConfig(
                "output_dir cannot be empty".into(),
            ));
        }
        if settings.output_dir.is_file() {
            return Err(SynthError::InvalidConfig(format!(
                "output_dir {} is an existing file",
                settings.output_dir.display()
            )));
        }

        let as_of = parse_as_of(&settings.as_of)?;

        Ok(Self { settings, as_of })
    }

    pub fn patient_count(&self) -> usize {
        self.settings.patient_count
    }

    pub fn encounters_per_patient(&self) -> u32 {
        self.settings.encounters_per_patient
    }

    pub fn output_dir(&self) -> &Path {
        &self.settings.output_dir
    }

    pub fn seed(&self) -> u64 {
        self.settings.seed
    }

    pub fn compress(&self) -> bool {
        self.settings.compress
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    pub fn batch_size(&self) -> usize {
        self.settings.batch_size
    }

    pub fn max_document_encounters(&self) -> usize {
        self.settings.max_document_encounters
    }

    pub fn document_sample_rate(&self) -> f64 {
        self.settings.document_sample_rate
    }

    /// The settings this config was validated from, echoed into run metadata.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}

fn parse_as_of(value: &str) -> SynthResult<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            SynthError::InvalidConfig(format!(
                "as_of must be YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, got {value:?}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GenerationSettings {
        GenerationSettings {
            patient_count: 10,
            encounters_per_patient: 2,
            ..GenerationSettings::default()
        }
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = GenerationConfig::new(GenerationSettings::default()).unwrap();
        assert_eq!(cfg.seed(), 42);
        assert_eq!(cfg.as_of().to_string(), "2025-01-01 00:00:00");
    }

    #[test]
    fn test_rejects_zero_counts() {
        let mut s = settings();
        s.patient_count = 0;
        assert!(matches!(
            GenerationConfig::new(s),
            Err(SynthError::InvalidConfig(_))
        ));

        let mut s = settings();
        s.encounters_per_patient = 0;
        assert!(GenerationConfig::new(s).is_err());

        let mut s = settings();
        s.batch_size = 0;
        assert!(GenerationConfig::new(s).is_err());
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        for rate in [-0.1, 1.5, f64::NAN] {
            let mut s = settings();
            s.document_sample_rate = rate;
            assert!(GenerationConfig::new(s).is_err(), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_rejects_output_dir_that_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut s = settings();
        s.output_dir = file.path().to_path_buf();
        assert!(GenerationConfig::new(s).is_err());

        let mut s = settings();
        s.output_dir = PathBuf::new();
        assert!(GenerationConfig::new(s).is_err());
    }

    #[test]
    fn test_as_of_accepts_date_and_timestamp() {
        let mut s = settings();
        s.as_of = "2024-06-30".into();
        let cfg = GenerationConfig::new(s).unwrap();
        assert_eq!(cfg.as_of().to_string(), "2024-06-30 00:00:00");

        let mut s = settings();
        s.as_of = "2024-06-30 13:45:00".into();
        let cfg = GenerationConfig::new(s).unwrap();
        assert_eq!(cfg.as_of().to_string(), "2024-06-30 13:45:00");

        let mut s = settings();
        s.as_of = "30/06/2024".into();
        assert!(GenerationConfig::new(s).is_err());
    }

    #[test]
    fn test_test_run_profile_overrides_counts() {
        let mut s = settings();
        RunProfile::TestRun.apply(&mut s);
        assert_eq!(s.patient_count, 1_000);
        assert_eq!(s.encounters_per_patient, 3);

        let mut s = settings();
        RunProfile::Full.apply(&mut s);
        assert_eq!(s.patient_count, 10);
    }

    #[test]
    fn test_yaml_partial_settings_take_defaults() {
        let s = GenerationSettings::from_yaml_str("patient_count: 250\nseed: 7\ncompress: true\n")
            .unwrap();
        assert_eq!(s.patient_count, 250);
        assert_eq!(s.seed, 7);
        assert!(s.compress);
        assert_eq!(s.encounters_per_patient, 5);
    }

    #[test]
    fn test_yaml_unknown_key_is_rejected() {
        assert!(matches!(
            GenerationSettings::from_yaml_str("patients: 10\n"),
            Err(SynthError::ConfigParse(_))
        ));
    }
}

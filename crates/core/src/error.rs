use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read config file {path}: {source}", path = path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    ConfigParse(serde_yaml::Error),

    #[error("encounter {encounter_id} references unknown patient {patient_id}")]
    UnknownPatient {
        encounter_id: String,
        patient_id: String,
    },
    #[error("{record} references unknown encounter {encounter_id}")]
    UnknownEncounter {
        record: String,
        encounter_id: String,
    },
    #[error("stage {stage} started before its dependency {missing} completed")]
    StageOrder {
        stage: &'static str,
        missing: &'static str,
    },

    #[error("failed to create output directory {path}: {source}", path = path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to clear previous output at {path}: {source}", path = path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}", path = path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write CSV record to {path}: {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to serialize run metadata: {0}")]
    Metadata(serde_json::Error),
}

pub type SynthResult<T> = std::result::Result<T, SynthError>;

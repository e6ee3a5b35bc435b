use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CondoError {
    #[error("Config directory not found at {0}. Run 'condo init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unit '{0}' not found in units.toml")]
    UnitNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Comparison needs between 2 and 4 units (got {0})")]
    ComparisonSize(usize),

    #[error("No {collection} record with id '{id}'")]
    RecordNotFound { collection: &'static str, id: String },

    #[error("Failed to read store file {path}: {source}")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write store file {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Installment '{id}' was already paid on {date}")]
    AlreadyPaid { id: String, date: chrono::NaiveDate },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid log filter '{value}': {reason}")]
    Telemetry { value: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CondoError>;

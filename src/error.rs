use thiserror::Error;

/// Errors raised by the failure tracker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("invalid tracker configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no code accepted after {passes} sampling passes")]
    SamplingExhausted { passes: usize },
}

/// Errors raised while setting up or running a drill
#[derive(Error, Debug)]
pub enum DrillError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("key map is empty, nothing to practice")]
    EmptyKeyMap,
}

pub type Result<T> = std::result::Result<T, DrillError>;

use thiserror::Error;

/// Source data is missing or malformed. The dashboard cannot start.
#[derive(Debug, Error)]
#[error("failed to load dashboard data: {source:#}")]
pub struct DataLoadError {
    #[from]
    source: anyhow::Error,
}

/// A control change was rejected; the previous control value stays active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("unknown profession '{0}'")]
    UnknownProfession(String),

    #[error("invalid age range: {min} is greater than {max}")]
    InvalidRange { min: i64, max: i64 },
}

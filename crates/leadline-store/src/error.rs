use leadline_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid id string: {0}")]
    InvalidId(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("invalid backup path (matches database): {0}")]
    InvalidBackupPath(PathBuf),
    #[error("mobile {mobile} already belongs to lead {lead_id}")]
    DuplicateMobile { mobile: String, lead_id: String },
    #[error("agent already exists: {0}")]
    DuplicateAgent(String),
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
    #[error("unreadable status label in store: {0}")]
    InvalidStoredStatus(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Core,
    MissingHomeDir,
    InvalidId,
    NotFound,
    Migration,
    InvalidDataPath,
    InvalidBackupPath,
    DuplicateMobile,
    DuplicateAgent,
    UnknownAgent,
    InvalidStoredStatus,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Core(_) => StoreErrorKind::Core,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidId(_) => StoreErrorKind::InvalidId,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::InvalidBackupPath(_) => StoreErrorKind::InvalidBackupPath,
            StoreError::DuplicateMobile { .. } => StoreErrorKind::DuplicateMobile,
            StoreError::DuplicateAgent(_) => StoreErrorKind::DuplicateAgent,
            StoreError::UnknownAgent(_) => StoreErrorKind::UnknownAgent,
            StoreError::InvalidStoredStatus(_) => StoreErrorKind::InvalidStoredStatus,
        }
    }
}

use thiserror::Error;

use crate::rctogether::{errors::RcTogetherError, types::EntityId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("pet {0} is not in the directory")]
    NotFound(EntityId),
}

#[derive(Debug, Error)]
pub enum AgencyError {
    #[error("RC Together error: {0}")]
    RcTogether(#[from] RcTogetherError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("command table failed to build: {0}")]
    CommandTable(#[from] regex::Error),
}

use thiserror::Error;

use crate::{
    repositories,
    util::validate::{PlaceInvalidation, StageInvalidation},
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] StageInvalidation),
    #[error("Failed to resolve venue: {0}")]
    VenueResolutionFailed(#[source] repositories::Error),
    #[error("Invalid limit")]
    InvalidLimit,
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl Error {
    /// Validation errors are always raised before anything is written.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::InvalidLimit)
    }
}

impl From<PlaceInvalidation> for Error {
    fn from(err: PlaceInvalidation) -> Self {
        Self::Invalid(err.into())
    }
}

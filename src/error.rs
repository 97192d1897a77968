use simple_error::SimpleError;
use thiserror::Error;

/// Errors that can occur when estimating ambient occlusion. Every variant is raised
/// before any ray is cast, so a failed call never leaves partial results behind.
#[derive(Debug, Error)]
pub enum AoError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] SimpleError),
}

pub type AoResult<T> = Result<T, AoError>;

pub mod clock;
pub mod repository;
pub mod search;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repository::ProductRepository;
pub use search::ProductQuery;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl From<vino_catalog::ProductError> for CoreError {
    fn from(err: vino_catalog::ProductError) -> Self {
        CoreError::ValidationError(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

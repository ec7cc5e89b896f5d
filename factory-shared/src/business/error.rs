/// Business error taxonomy
///
/// Store lookups return `Ok(None)` for missing rows, so `NotFound` is always
/// decided here. Store failures are wrapped with the name of the operation
/// that hit them.

use crate::store::{StoreError, StoreResult};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{context} failed: {source}")]
    Internal {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }

    pub fn already_exists(what: impl Into<String>) -> Self {
        ServiceError::AlreadyExists(what.into())
    }

    /// Wraps a store error, keeping duplicates and dangling references typed
    pub fn from_store(context: impl Into<String>, err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { entity, key } => {
                ServiceError::AlreadyExists(format!("{} '{}'", entity, key))
            }
            StoreError::MissingReference { entity, id } => {
                ServiceError::NotFound(format!("{} {}", entity, id))
            }
            source => ServiceError::Internal {
                context: context.into(),
                source,
            },
        }
    }
}

/// Inside `run_in_transaction` closures `?` on a bare `StoreError` lands here
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::from_store("store", err)
    }
}

pub trait StoreResultExt<T> {
    /// Attaches the failing operation name to a store error
    fn context(self, context: &str) -> ServiceResult<T>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn context(self, context: &str) -> ServiceResult<T> {
        self.map_err(|err| ServiceError::from_store(context, err))
    }
}

//! Contract shared by the entity controllers.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use marquee_http::error::AppError;

/// An entity invariant that did not hold. The message is user-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(&'static str);

impl ValidationError {
    pub const fn new(message: &'static str) -> Self {
        Self(message)
    }

    pub fn message(&self) -> &'static str {
        self.0
    }
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No row matched the requested id. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<ControllerError> for AppError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Validation(err) => err.into(),
            ControllerError::NotFound(_) => AppError::not_found(err.to_string()),
            ControllerError::Persistence(source) => AppError::Internal(source.into()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(vec![], err.message())
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindAllResponse<T> {
    /// Count of every row in the table, independent of the page window.
    pub total: u32,
    pub page: u16,
    pub registers: Vec<T>,
}

impl<T> FindAllResponse<T> {
    /// Convert every register, keeping `total` and `page`.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> FindAllResponse<U> {
        FindAllResponse {
            total: self.total,
            page: self.page,
            registers: self.registers.into_iter().map(f).collect(),
        }
    }
}

/// CRUD operations every entity controller exposes.
#[async_trait]
pub trait GenericController<T>: Send + Sync {
    /// Assign a fresh id to `entity`, persist it and return the id.
    async fn create(&self, entity: &mut T) -> Result<String, ControllerError>;

    async fn find_by(&self, id: &str) -> Result<T, ControllerError>;

    /// List one 1-based page. Rows that fail validation are skipped.
    async fn find_all(&self, page: u16) -> Result<FindAllResponse<T>, ControllerError>;

    /// Replace every mutable field of the entity stored under `id`.
    async fn update_by(&self, id: &str, entity: &T) -> Result<(), ControllerError>;

    async fn delete_by(&self, id: &str) -> Result<(), ControllerError>;
}

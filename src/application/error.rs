// src/application/error.rs
use crate::domain::error::{DomainError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl ApplicationError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            ApplicationError::Other(msg) => {
                ApplicationError::Other(format!("{}: {}", context.into(), msg))
            }
            ApplicationError::Domain(err) => ApplicationError::Domain(err.context(context)),
            ApplicationError::Validation(msg) => {
                ApplicationError::Validation(format!("{}: {}", context.into(), msg))
            }
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        ApplicationError::Domain(DomainError::Store(err))
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        ApplicationError::Domain(DomainError::Io(err))
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_store_error_when_converted_then_wraps_domain_error() {
        let err: ApplicationError = StoreError::NodeNotFound("7".to_string()).into();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::Store(StoreError::NodeNotFound(_)))
        ));
    }

    #[test]
    fn given_validation_error_when_adding_context_then_keeps_variant() {
        let err = ApplicationError::Validation("interval is 0".to_string()).context("watch");
        assert_eq!(err.to_string(), "Validation failed: watch: interval is 0");
    }
}

// src/domain/error.rs
use thiserror::Error;

/// Failures reported by a bookmark store.
///
/// The engines never inspect the variant to decide what to do next, they only
/// propagate or log it. The variants exist so that a store implementation can
/// say precisely which precondition of its contract was violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Bookmark node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent folder not found: {0}")]
    ParentNotFound(String),

    #[error("Node is not a folder: {0}")]
    NotAFolder(String),

    #[error("Cannot move {node} into its own descendant {parent}")]
    CyclicMove { node: String, parent: String },

    #[error("Folder is not empty: {0}")]
    FolderNotEmpty(String),

    #[error("The root node cannot be modified")]
    RootImmutable,

    #[error("Store persistence failed: {0}")]
    Persistence(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid bookmark tree: {0}")]
    InvalidTree(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::InvalidTree(msg) => {
                DomainError::InvalidTree(format!("{}: {}", context.into(), msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            err => DomainError::Other(format!("{}: {}", context.into(), err)),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

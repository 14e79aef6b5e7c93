use thiserror::Error;
use uuid::Uuid;

use crate::attributes::{ConfigError, SlugError};

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Attribute definition not found: {0}")]
    DefinitionNotFound(Uuid),

    #[error("An active attribute with slug '{slug}' already exists in category {category_id}")]
    DuplicateSlug { category_id: Uuid, slug: String },

    #[error("Invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    #[error("Invalid attribute configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid engine configuration: {0}")]
    InvalidEngineConfig(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl DeskError {
    /// True for errors caused by a dangling category or definition reference.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            DeskError::CategoryNotFound(_) | DeskError::DefinitionNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

use crate::model::EntryKind;
use thiserror::Error;

/// The error type for taxonomy and ledger operations.
///
/// Validation failures are typed so that callers can reject an operation without
/// retrying it. Remote store and I/O failures are carried as `anyhow` chains.
#[derive(Debug, Error)]
pub enum Error {
    /// The persisted taxonomy document is structurally invalid. Fatal to the
    /// poll tick that fetched it; the previous snapshot is retained.
    #[error("malformed taxonomy document: {0}")]
    MalformedTaxonomy(String),

    /// No category with the given name exists under the given entry kind.
    #[error("no category named '{name}' under {kind}")]
    CategoryNotFound { kind: EntryKind, name: String },

    /// The category already holds a subcategory with this name.
    #[error("subcategory '{name}' already exists in category '{category}'")]
    DuplicateSubcategory { category: String, name: String },

    /// Remote store, filesystem or configuration failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

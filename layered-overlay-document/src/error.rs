//! Error types for document-level operations.

use layered_overlay::RangeError;
use thiserror::Error;

use crate::{AnnotationKind, DocumentRef};

/// Errors raised by documents, overlays and their collaborators.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Invalid span or out-of-bounds indexed access.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// A single annotation of `kind` was expected but none is attached.
    #[error("no {kind} annotation attached")]
    EmptyResult { kind: AnnotationKind },

    /// A snippet would exceed the configured batch cap.
    #[error("snippet holds {requested} sentences, limit is {max}")]
    SnippetTooLarge { requested: usize, max: usize },

    /// A snippet selection was applied to a document it was not built from.
    #[error("snippet belongs to {expected}, not {found}")]
    ForeignDocument {
        expected: DocumentRef,
        found: DocumentRef,
    },

    /// Reading configuration or input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a document record failed.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] ron::Error),

    /// Reading a document record failed.
    #[error("failed to parse document record: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for document operations.
pub type OverlayResult<T> = Result<T, OverlayError>;

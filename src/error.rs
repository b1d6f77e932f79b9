//! Error types for label storage and session operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LabelError>;

/// Errors that can occur while annotating a directory.
#[derive(Error, Debug)]
pub enum LabelError {
    /// The chosen directory holds no supported image files.
    #[error("No image files found in {path:?}")]
    EmptyDirectory {
        /// Directory that was scanned
        path: PathBuf,
    },

    /// A field outside `{valid, points}` was requested.
    #[error("Unknown label field <{field}>")]
    InvalidField {
        /// The rejected field name
        field: String,
    },

    /// Opening, reading or writing the label database failed.
    #[error("Label store error: {0}")]
    StoreIo(#[from] rusqlite::Error),

    /// The label table or one of its rows has an unexpected shape.
    #[error("Label store schema mismatch: {message}")]
    Schema {
        /// What did not match
        message: String,
    },

    /// A partial update was issued for an image that has no record yet.
    #[error("No label record for '{image}'; a full record is required before partial updates")]
    IncompleteRecord {
        /// Image filename
        image: String,
    },

    /// The directory could not be listed.
    #[error("Failed to read folder {path:?}: {source}")]
    Scan {
        /// Directory that was scanned
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Image dimensions could not be read.
    #[error("Failed to read image {path:?}: {source}")]
    Image {
        /// Image path
        path: PathBuf,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// A handle index outside the four corners.
    #[error("Handle {index} does not exist; a quad has four corners")]
    HandleOutOfRange {
        /// The rejected index
        index: usize,
    },

    /// A voided image's handles are hidden and cannot be moved.
    #[error("'{image}' is voided; restore it before moving its corners")]
    ImageVoided {
        /// Image filename
        image: String,
    },

    /// The operation needs an open directory.
    #[error("No directory chosen")]
    NoImageOpen,
}

impl LabelError {
    /// Create a schema error with a message.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
        }
    }

    /// Whether the error came from the label database.
    ///
    /// Store errors end the session; annotation without persistence is not
    /// supported.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreIo(_) | Self::Schema { .. })
    }
}

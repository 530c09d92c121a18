use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::location::{Location, LocationKeyError};

pub const DEFAULT_RECORD_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub extension: String,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_RECORD_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The extension must be a single path suffix so that a file's stem is
    /// exactly the location key.
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        let extension = &self.extension;
        let valid = !extension.is_empty()
            && !extension
                .chars()
                .any(|ch| matches!(ch, '.' | '/' | '\\') || ch.is_control());
        if valid {
            Ok(())
        } else {
            Err(StoreError::InvalidExtension {
                extension: extension.clone(),
            })
        }
    }
}

/// Path of the file backing one record. Its stem is the location key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    path: PathBuf,
}

impl RecordHandle {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn location(&self) -> Result<Location, StoreError> {
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| LocationKeyError::FieldCount {
                key: self.path.display().to_string(),
                found: 0,
            })?;
        Ok(Location::decode(stem)?)
    }
}

#[derive(Debug)]
pub struct StoredEntry {
    pub handle: RecordHandle,
    pub location: Result<Location, LocationKeyError>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record file name is not a valid location key: {0}")]
    MalformedKey(#[from] LocationKeyError),
    #[error("failed to read/write record file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record file {path} could not be decoded: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("record for {location} could not be encoded: {message}")]
    Encode { location: Location, message: String },
    #[error("record file extension {extension:?} must be non-empty with no '.' or path separators")]
    InvalidExtension { extension: String },
    #[error("failed to create storage root at {path}: {source}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

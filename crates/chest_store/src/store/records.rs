use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::location::Location;

use super::atomic_io::{remove_if_exists, write_bytes_atomic};
use super::codec::RecordCodec;
use super::types::{RecordHandle, StoreConfig, StoreError, StoredEntry};

/// One file per location under a single storage root.
#[derive(Debug)]
pub struct RecordStore<C> {
    config: StoreConfig,
    codec: C,
}

impl<C: RecordCodec> RecordStore<C> {
    pub fn open(config: StoreConfig, codec: C) -> Result<Self, StoreError> {
        config.validate()?;
        fs::create_dir_all(&config.root).map_err(|source| StoreError::CreateRoot {
            path: config.root.clone(),
            source,
        })?;
        Ok(Self { config, codec })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn path_for(&self, location: &Location) -> RecordHandle {
        RecordHandle::from_path(
            self.config
                .root
                .join(format!("{}.{}", location.key(), self.config.extension)),
        )
    }

    pub fn exists(&self, handle: &RecordHandle) -> bool {
        handle.path().is_file()
    }

    /// Reads the record behind `handle`, or builds a fresh one when no file
    /// exists yet. The stem is validated before any disk access.
    pub fn load(&self, handle: &RecordHandle) -> Result<C::Record, StoreError> {
        let location = handle.location()?;
        if !self.exists(handle) {
            debug!(location = %location, "record_file_missing_using_fresh");
            return Ok(self.codec.fresh(&location));
        }

        let bytes = fs::read(handle.path()).map_err(|source| StoreError::Io {
            path: handle.path().to_path_buf(),
            source,
        })?;
        self.codec
            .decode(&location, &bytes)
            .map_err(|message| StoreError::Decode {
                path: handle.path().to_path_buf(),
                message,
            })
    }

    pub fn save(&self, handle: &RecordHandle, record: &C::Record) -> Result<(), StoreError> {
        let location = handle.location()?;
        let bytes = self
            .codec
            .encode(record)
            .map_err(|message| StoreError::Encode { location, message })?;
        write_bytes_atomic(handle.path(), &bytes).map_err(|source| StoreError::Io {
            path: handle.path().to_path_buf(),
            source,
        })
    }

    /// True iff a file existed and is now gone.
    pub fn delete(&self, handle: &RecordHandle) -> bool {
        match remove_if_exists(handle.path()) {
            Ok(removed) => removed,
            Err(error) => {
                warn!(
                    path = %handle.path().display(),
                    error = %error,
                    "record_file_delete_failed"
                );
                false
            }
        }
    }

    /// Lists every record file under the root, sorted by file name.
    pub fn scan(&self) -> Result<Vec<StoredEntry>, StoreError> {
        let root = &self.config.root;
        let entries = fs::read_dir(root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;

        let mut stored = Vec::<StoredEntry>::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || !self.has_record_extension(&path) {
                continue;
            }
            let handle = RecordHandle::from_path(path);
            let location = match handle.location() {
                Ok(location) => Ok(location),
                Err(StoreError::MalformedKey(error)) => {
                    warn!(
                        path = %handle.path().display(),
                        error = %error,
                        "record_file_name_malformed"
                    );
                    Err(error)
                }
                Err(other) => return Err(other),
            };
            stored.push(StoredEntry { handle, location });
        }
        stored.sort_by(|a, b| a.handle.path().cmp(b.handle.path()));
        Ok(stored)
    }

    fn has_record_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.config.extension)
    }
}

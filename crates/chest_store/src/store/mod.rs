mod atomic_io;
mod codec;
mod records;
mod types;

pub use codec::{JsonRecordCodec, NewRecord, RecordCodec};
pub use records::RecordStore;
pub use types::{RecordHandle, StoreConfig, StoreError, StoredEntry, DEFAULT_RECORD_EXTENSION};

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::location::Location;

/// Turns container records into file contents and back. The store never looks
/// inside a record; everything it knows comes through this trait.
pub trait RecordCodec {
    type Record;

    fn encode(&self, record: &Self::Record) -> Result<Vec<u8>, String>;

    fn decode(&self, location: &Location, bytes: &[u8]) -> Result<Self::Record, String>;

    /// Record for a location that has no backing file yet.
    fn fresh(&self, location: &Location) -> Self::Record;
}

/// Records that know how to start out empty at a given location.
pub trait NewRecord {
    fn new_at(location: &Location) -> Self;
}

impl NewRecord for serde_json::Value {
    fn new_at(_location: &Location) -> Self {
        serde_json::Value::Object(serde_json::Map::new())
    }
}

#[derive(Debug)]
pub struct JsonRecordCodec<R> {
    pretty: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonRecordCodec<R> {
    pub fn new() -> Self {
        Self {
            pretty: true,
            _record: PhantomData,
        }
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            _record: PhantomData,
        }
    }
}

impl<R> Default for JsonRecordCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for JsonRecordCodec<R> {
    fn clone(&self) -> Self {
        Self {
            pretty: self.pretty,
            _record: PhantomData,
        }
    }
}

impl<R> RecordCodec for JsonRecordCodec<R>
where
    R: Serialize + DeserializeOwned + NewRecord,
{
    type Record = R;

    fn encode(&self, record: &R) -> Result<Vec<u8>, String> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(record)
        } else {
            serde_json::to_vec(record)
        };
        encoded.map_err(|error| format!("failed to encode record json: {error}"))
    }

    fn decode(&self, _location: &Location, bytes: &[u8]) -> Result<R, String> {
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(deserializer).map_err(|error| {
            let path = error.path().to_string();
            format!("{} (at {path})", error.into_inner())
        })
    }

    fn fresh(&self, location: &Location) -> R {
        R::new_at(location)
    }
}

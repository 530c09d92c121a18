use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{lock_record, LocationCache, SharedRecord};
use crate::location::{Location, Offset};
use crate::pairing::find_pair;
use crate::store::{RecordCodec, RecordHandle, RecordStore, StoreConfig, StoreError};
use crate::world::{ActorId, EnglishMessages, EntityKind, MessageKey, Messenger, WorldQuery};

/// Farthest cell an actor can target with `resolve_targeted`.
pub const MAX_TARGET_RANGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("{message}")]
    NoTarget { message: String },
}

/// Resolves world positions to container records, pairing double containers
/// on lookup and removal. Every miss or internal failure comes back as
/// `None`/`false`; only `resolve_targeted` returns an error.
pub struct ContainerManager<C: RecordCodec> {
    store: RecordStore<C>,
    cache: LocationCache<C::Record>,
    world: Box<dyn WorldQuery + Send>,
    messenger: Box<dyn Messenger + Send>,
}

impl<C: RecordCodec> ContainerManager<C> {
    pub fn new(store: RecordStore<C>, world: Box<dyn WorldQuery + Send>) -> Self {
        Self {
            store,
            cache: LocationCache::new(),
            world,
            messenger: Box::new(EnglishMessages),
        }
    }

    pub fn open(
        config: StoreConfig,
        codec: C,
        world: Box<dyn WorldQuery + Send>,
    ) -> Result<Self, StoreError> {
        Ok(Self::new(RecordStore::open(config, codec)?, world))
    }

    pub fn with_messenger(mut self, messenger: Box<dyn Messenger + Send>) -> Self {
        self.messenger = messenger;
        self
    }

    pub fn store(&self) -> &RecordStore<C> {
        &self.store
    }

    pub fn is_cached(&self, location: &Location) -> bool {
        self.cache.contains(location)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn get(
        &mut self,
        location: &Location,
        double_wide: bool,
    ) -> Option<SharedRecord<C::Record>> {
        if let Some(record) = self.cache.get(location) {
            debug!(location = %location, "container_cache_hit");
            return Some(record);
        }

        let mut resolved = location.clone();
        let mut handle = self.store.path_for(location);
        if !self.store.exists(&handle) {
            if !double_wide {
                debug!(location = %location, "container_not_found_single");
                return None;
            }
            let Some(pair) = find_pair(location, &*self.world) else {
                debug!(location = %location, "container_double_without_other_side");
                return None;
            };
            if let Some(record) = self.cache.get(&pair) {
                debug!(location = %location, pair = %pair, "container_cache_hit_other_side");
                return Some(record);
            }
            handle = self.store.path_for(&pair);
            if !self.store.exists(&handle) {
                debug!(location = %location, pair = %pair, "container_not_found_other_side");
                return None;
            }
            resolved = pair;
        }

        self.load_into_cache(resolved, &handle)
    }

    /// Materializes the container stored under `location` itself. Never
    /// searches for a paired cell.
    pub fn create(&mut self, location: &Location) -> Option<SharedRecord<C::Record>> {
        if let Some(record) = self.cache.get(location) {
            debug!(location = %location, "container_create_already_cached");
            return Some(record);
        }
        let handle = self.store.path_for(location);
        self.load_into_cache(location.clone(), &handle)
    }

    pub fn remove(&mut self, location: &Location) -> bool {
        if self.remove_at(location) {
            return true;
        }

        if self.world.entity_at(location, Offset::ZERO).is_some() {
            if let Some(pair) = find_pair(location, &*self.world) {
                if self.remove_at(&pair) {
                    return true;
                }
            }
        }

        info!(location = %location, "container_remove_found_nothing");
        false
    }

    pub fn resolve_targeted(&self, actor: ActorId) -> Result<Location, TargetError> {
        match self.world.target_of(actor, MAX_TARGET_RANGE) {
            Some(target)
                if self.world.entity_at(&target, Offset::ZERO) == Some(EntityKind::Container) =>
            {
                Ok(target)
            }
            _ => Err(TargetError::NoTarget {
                message: self.messenger.message(MessageKey::Targeting),
            }),
        }
    }

    /// Writes the cached record at `location` back to its file.
    pub fn save(&self, location: &Location) -> bool {
        let Some(record) = self.cache.get(location) else {
            debug!(location = %location, "container_save_not_cached");
            return false;
        };
        self.save_record(location, &record)
    }

    /// Writes every cached record, returning how many were written.
    pub fn save_all(&self) -> usize {
        let mut saved = 0usize;
        for (location, record) in self.cache.iter() {
            if self.save_record(location, record) {
                saved += 1;
            }
        }
        info!(saved, cached = self.cache.len(), "container_cache_flushed");
        saved
    }

    fn save_record(&self, location: &Location, record: &SharedRecord<C::Record>) -> bool {
        let handle = self.store.path_for(location);
        let guard = lock_record(record);
        match self.store.save(&handle, &guard) {
            Ok(()) => {
                debug!(location = %location, "container_saved");
                true
            }
            Err(error) => {
                warn!(location = %location, error = %error, "container_save_failed");
                false
            }
        }
    }

    fn remove_at(&mut self, location: &Location) -> bool {
        let cached = self.cache.remove(location);
        let filed = self.store.delete(&self.store.path_for(location));
        if cached || filed {
            info!(location = %location, cached, filed, "container_removed");
            return true;
        }
        false
    }

    fn load_into_cache(
        &mut self,
        location: Location,
        handle: &RecordHandle,
    ) -> Option<SharedRecord<C::Record>> {
        match self.store.load(handle) {
            Ok(record) => {
                let shared = Arc::new(Mutex::new(record));
                debug!(location = %location, "container_loaded");
                self.cache.put(location, Arc::clone(&shared));
                Some(shared)
            }
            Err(StoreError::MalformedKey(error)) => {
                warn!(
                    path = %handle.path().display(),
                    error = %error,
                    "container_file_name_malformed"
                );
                None
            }
            Err(error) => {
                warn!(location = %location, error = %error, "container_load_failed");
                None
            }
        }
    }
}

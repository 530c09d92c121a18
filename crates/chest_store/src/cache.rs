use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::location::Location;

/// Record handle shared between the cache and the game logic mutating it.
pub type SharedRecord<R> = Arc<Mutex<R>>;

static RECORD_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

/// Locks a shared record, recovering the value if a previous holder panicked.
pub fn lock_record<R>(record: &SharedRecord<R>) -> MutexGuard<'_, R> {
    match record.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            if RECORD_LOCK_POISON_WARNED
                .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                warn!("record lock poisoned; recovered inner value");
            }
            poisoned.into_inner()
        }
    }
}

#[derive(Debug)]
pub struct LocationCache<R> {
    entries: HashMap<Location, SharedRecord<R>>,
}

impl<R> Default for LocationCache<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<R> LocationCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, location: &Location) -> Option<SharedRecord<R>> {
        self.entries.get(location).cloned()
    }

    pub fn put(&mut self, location: Location, record: SharedRecord<R>) {
        self.entries.insert(location, record);
    }

    pub fn remove(&mut self, location: &Location) -> bool {
        self.entries.remove(location).is_some()
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.entries.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Location, &SharedRecord<R>)> {
        self.entries.iter()
    }
}

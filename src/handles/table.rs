//! Handle table.
//!
//! The factory only needs [`HandleTable::register`]; lookup, retain and
//! release belong to the rest of the runtime. [`SlotHandleTable`] is the
//! default in-process implementation.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use super::record::{HandleKind, HandleRecord};
use crate::types::Handle;

/// Registration failure reported by a handle table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("handle table full ({capacity} slots)")]
    TableFull { capacity: usize },
}

/// A registered handle as seen through [`HandleTable::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredHandle {
    pub kind: HandleKind,
    pub record: HandleRecord,
}

/// Registry mapping handles to their records.
///
/// `register` must be atomic: it either publishes a complete, immutable entry
/// or fails without side effects.
pub trait HandleTable: Send + Sync + fmt::Debug {
    fn register(
        &self,
        kind: HandleKind,
        record: HandleRecord,
    ) -> std::result::Result<Handle, RegistrationError>;

    fn lookup(&self, handle: Handle) -> Option<RegisteredHandle>;

    /// Add a reference. Returns false for a stale or unknown handle.
    fn retain(&self, handle: Handle) -> bool;

    /// Drop a reference; the entry is removed when the last one goes.
    /// Returns false for a stale or unknown handle.
    fn release(&self, handle: Handle) -> bool;
}

#[derive(Debug)]
struct Entry {
    kind: HandleKind,
    record: HandleRecord,
    refcount: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u16,
    entry: Option<Entry>,
}

#[derive(Debug, Default)]
struct Slots {
    slots: Vec<Slot>,
    free: Vec<u16>,
    live: usize,
}

impl Slots {
    fn get_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(usize::from(handle.index()))?;
        if slot.entry.is_none() || slot.generation != handle.generation() {
            return None;
        }
        Some(slot)
    }
}

/// Fixed-capacity slot table. Handles carry the slot generation, so a handle
/// to a released slot never resolves to the slot's next occupant.
///
/// A slot whose generation reaches `u16::MAX` is retired on release instead
/// of being reused, so generations never wrap. Retired slots count against
/// capacity.
#[derive(Debug)]
pub struct SlotHandleTable {
    capacity: usize,
    inner: Mutex<Slots>,
}

impl SlotHandleTable {
    /// Largest capacity whose handles can never collide with [`Handle::INVALID`].
    pub const MAX_CAPACITY: usize = u16::MAX as usize;
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.min(Self::MAX_CAPACITY),
            inner: Mutex::new(Slots::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lock().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SlotHandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleTable for SlotHandleTable {
    fn register(
        &self,
        kind: HandleKind,
        record: HandleRecord,
    ) -> std::result::Result<Handle, RegistrationError> {
        let mut inner = self.lock();

        let index = match inner.free.pop() {
            Some(index) => index,
            None if inner.slots.len() < self.capacity => {
                inner.slots.push(Slot::default());
                (inner.slots.len() - 1) as u16
            }
            None => {
                return Err(RegistrationError::TableFull {
                    capacity: self.capacity,
                })
            }
        };

        let slot = &mut inner.slots[usize::from(index)];
        // Free and fresh slots are always below u16::MAX; see `release`.
        slot.generation += 1;
        slot.entry = Some(Entry {
            kind,
            record,
            refcount: 1,
        });
        let handle = Handle::new(index, slot.generation);
        inner.live += 1;
        Ok(handle)
    }

    fn lookup(&self, handle: Handle) -> Option<RegisteredHandle> {
        let mut inner = self.lock();
        let entry = inner.get_mut(handle)?.entry.as_ref()?;
        Some(RegisteredHandle {
            kind: entry.kind,
            record: entry.record.clone(),
        })
    }

    fn retain(&self, handle: Handle) -> bool {
        let mut inner = self.lock();
        match inner.get_mut(handle).and_then(|slot| slot.entry.as_mut()) {
            Some(entry) => {
                entry.refcount = entry.refcount.saturating_add(1);
                true
            }
            None => false,
        }
    }

    fn release(&self, handle: Handle) -> bool {
        let mut inner = self.lock();
        let Some(slot) = inner.get_mut(handle) else {
            return false;
        };
        let remove = match slot.entry.as_mut() {
            Some(entry) => {
                entry.refcount -= 1;
                entry.refcount == 0
            }
            None => return false,
        };
        if remove {
            slot.entry = None;
            let exhausted = slot.generation == u16::MAX;
            if exhausted {
                tracing::debug!("retiring handle slot {}: generations exhausted", handle.index());
            } else {
                inner.free.push(handle.index());
            }
            inner.live -= 1;
        }
        true
    }
}

use thiserror::Error;

use crate::manager::KindId;

/// Stable reference to a pooled entity. Slots are never destroyed while the
/// manager lives; a handle stays valid across any number of activate/release
/// cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    kind: KindId,
    slot: usize,
}

impl Handle {
    pub fn kind(&self) -> KindId {
        self.kind
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("handle belongs to kind {handle_kind:?}, not to this pool ({pool_kind:?})")]
    ForeignKind {
        handle_kind: KindId,
        pool_kind: KindId,
    },
    #[error("slot {slot} is not currently active")]
    NotActive { slot: usize },
    #[error("slot {slot} was never created by this pool")]
    UnknownSlot { slot: usize },
}

struct Entry<E> {
    entity: E,
    active: bool,
}

/// Reusable set of entity instances for one content kind. Grows lazily via
/// the caller-supplied factory and never shrinks during normal operation.
pub struct Pool<E> {
    kind: KindId,
    entries: Vec<Entry<E>>,
    free: Vec<usize>,
}

impl<E> Pool<E> {
    pub fn new(kind: KindId) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Create `count` idle entities up front so steady-state acquires rarely
    /// hit the factory.
    pub fn prewarm(&mut self, count: usize, mut factory: impl FnMut() -> E) {
        self.entries.reserve(count);
        for _ in 0..count {
            let slot = self.entries.len();
            self.entries.push(Entry {
                entity: factory(),
                active: false,
            });
            self.free.push(slot);
        }
    }

    /// Pop a free handle, or grow by one via the factory. Never fails.
    pub fn acquire(&mut self, factory: impl FnOnce() -> E) -> Handle {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(Entry {
                    entity: factory(),
                    active: false,
                });
                log::debug!(
                    "pool {:?} grew to {} entries; consider a larger pre-warm",
                    self.kind,
                    self.entries.len()
                );
                slot
            }
        };
        self.entries[slot].active = true;
        Handle {
            kind: self.kind,
            slot,
        }
    }

    /// Return an active handle to the free list. Misuse (wrong kind, already
    /// free) is reported and leaves the pool untouched.
    pub fn release(&mut self, handle: Handle) -> Result<(), PoolError> {
        if handle.kind != self.kind {
            return Err(PoolError::ForeignKind {
                handle_kind: handle.kind,
                pool_kind: self.kind,
            });
        }
        let entry = self
            .entries
            .get_mut(handle.slot)
            .ok_or(PoolError::UnknownSlot { slot: handle.slot })?;
        if !entry.active {
            return Err(PoolError::NotActive { slot: handle.slot });
        }
        entry.active = false;
        self.free.push(handle.slot);
        Ok(())
    }

    pub fn entity(&self, handle: Handle) -> &E {
        &self.entries[handle.slot].entity
    }

    pub fn entity_mut(&mut self, handle: Handle) -> &mut E {
        &mut self.entries[handle.slot].entity
    }

    /// Total entities ever created. Monotonic.
    pub fn created(&self) -> usize {
        self.entries.len()
    }

    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(index: usize) -> KindId {
        KindId::from_index(index)
    }

    #[test]
    fn acquire_prefers_the_free_list() {
        let mut pool: Pool<u32> = Pool::new(kind(0));
        pool.prewarm(2, || 0);
        assert_eq!(pool.created(), 2);

        let a = pool.acquire(|| panic!("factory must not run while idle handles exist"));
        let _b = pool.acquire(|| panic!("factory must not run while idle handles exist"));
        assert_eq!(pool.idle(), 0);

        pool.release(a).unwrap();
        assert_eq!(pool.idle(), 1);
        let _c = pool.acquire(|| panic!("factory must not run while idle handles exist"));
        assert_eq!(pool.created(), 2);
    }

    #[test]
    fn empty_pool_grows_through_the_factory() {
        let mut pool: Pool<u32> = Pool::new(kind(0));
        let h = pool.acquire(|| 7);
        assert_eq!(pool.created(), 1);
        assert_eq!(*pool.entity(h), 7);
    }

    #[test]
    fn double_release_is_rejected_without_corruption() {
        let mut pool: Pool<u32> = Pool::new(kind(0));
        let h = pool.acquire(|| 1);
        pool.release(h).unwrap();
        assert_eq!(pool.release(h), Err(PoolError::NotActive { slot: h.slot() }));
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut first: Pool<u32> = Pool::new(kind(0));
        let mut second: Pool<u32> = Pool::new(kind(1));
        let h = first.acquire(|| 1);
        assert!(matches!(
            second.release(h),
            Err(PoolError::ForeignKind { .. })
        ));
        assert_eq!(second.idle(), 0);
    }
}

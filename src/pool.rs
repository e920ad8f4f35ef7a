use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Reuse statistics for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub reused: u64,
    pub allocated: u64,
}

/// Pool of scratch `Vec<T>` buffers for per-frame overlay math.
///
/// Acquired buffers are returned on drop with their capacity intact, so
/// steady-state frame composition stops allocating scratch space.
pub struct VecPool<T> {
    free: RefCell<Vec<Vec<T>>>,
    reused: Cell<u64>,
    allocated: Cell<u64>,
}

impl<T> VecPool<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            free: RefCell::new(Vec::new()),
            reused: Cell::new(0),
            allocated: Cell::new(0),
        }
    }

    /// Hands out an empty buffer, reusing a returned one when available.
    #[must_use]
    pub fn acquire(&self) -> PooledVec<'_, T> {
        let vec = match self.free.borrow_mut().pop() {
            Some(vec) => {
                self.reused.set(self.reused.get() + 1);
                vec
            }
            None => {
                self.allocated.set(self.allocated.get() + 1);
                Vec::new()
            }
        };
        PooledVec { pool: self, vec }
    }

    /// Buffers currently sitting in the pool.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.free.borrow().len()
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            reused: self.reused.get(),
            allocated: self.allocated.get(),
        }
    }
}

impl<T> Default for VecPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for VecPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecPool")
            .field("idle", &self.idle_count())
            .field("stats", &self.stats())
            .finish()
    }
}

/// RAII handle over a pooled buffer; dereferences to the `Vec` and returns
/// it to the pool, cleared, when dropped.
pub struct PooledVec<'a, T> {
    pool: &'a VecPool<T>,
    vec: Vec<T>,
}

impl<T> Deref for PooledVec<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.vec
    }
}

impl<T> DerefMut for PooledVec<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.vec
    }
}

impl<T> Drop for PooledVec<'_, T> {
    fn drop(&mut self) {
        let mut vec = std::mem::take(&mut self.vec);
        vec.clear();
        self.pool.free.borrow_mut().push(vec);
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledVec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.vec.fmt(f)
    }
}

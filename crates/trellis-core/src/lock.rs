#![forbid(unsafe_code)]

//! Scoped geometry lock.
//!
//! The event-processing thread mutates widget geometry while a concurrent
//! paint path may read it, so every widget keeps its mutable geometric and
//! visual state behind a [`GeometryLock`]. The guard is released on every
//! exit path, including panics, by RAII; a poisoned lock is recovered rather
//! than propagated so the paint path can still observe a consistent snapshot
//! after an event handler panicked.

use std::sync::{Mutex, MutexGuard};

/// Mutual exclusion for a widget's mutable geometric/visual state.
#[derive(Debug, Default)]
pub struct GeometryLock<T> {
    inner: Mutex<T>,
}

impl<T> GeometryLock<T> {
    /// Wrap a state value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Acquire the lock for the duration of the returned guard.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Consume the lock, returning the protected value.
    pub fn into_inner(self) -> T {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryLock;

    #[test]
    fn lock_guards_mutation() {
        let lock = GeometryLock::new(0u32);
        {
            let mut guard = lock.lock();
            *guard += 41;
            *guard += 1;
        }
        assert_eq!(*lock.lock(), 42);
    }

    #[test]
    fn into_inner_returns_value() {
        let lock = GeometryLock::new(vec![1, 2, 3]);
        assert_eq!(lock.into_inner(), vec![1, 2, 3]);
    }
}

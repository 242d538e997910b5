//! Exclusive leases over a graph store shared between threads.
//!
//! A secure run mutates the graph, so no other mutator may interleave
//! deletions with it. Within one thread `&mut S` already expresses that;
//! [`SharedGraph`] extends it to stores handed to several workers. The
//! [`GraphLease`] guard releases the store on drop, so every exit path of a
//! run (success, abort, error, panic) gives the graph back.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::TriboundError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A graph store that runs on different threads take turns leasing.
#[derive(Debug, Default)]
pub struct SharedGraph<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedGraph<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedGraph<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Block until the exclusive lease is available.
    ///
    /// # Errors
    ///
    /// Returns [`TriboundError::LeasePoisoned`] if a previous holder panicked.
    pub fn lease(&self) -> Result<GraphLease<'_, S>, TriboundError> {
        self.inner
            .lock()
            .map(|guard| GraphLease { guard })
            .map_err(|_| TriboundError::LeasePoisoned)
    }

    /// Try to take the exclusive lease, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TriboundError::LeaseTimeout`] when another holder keeps the
    /// lease past `timeout`, or [`TriboundError::LeasePoisoned`] if a
    /// previous holder panicked.
    pub fn lease_timeout(&self, timeout: Duration) -> Result<GraphLease<'_, S>, TriboundError> {
        let start = Instant::now();
        loop {
            match self.inner.try_lock() {
                Ok(guard) => return Ok(GraphLease { guard }),
                Err(TryLockError::Poisoned(_)) => return Err(TriboundError::LeasePoisoned),
                Err(TryLockError::WouldBlock) => {}
            }

            if start.elapsed() >= timeout {
                debug!(waited = ?start.elapsed(), "graph lease still held elsewhere");
                return Err(TriboundError::LeaseTimeout {
                    waited: start.elapsed(),
                });
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// RAII guard granting exclusive access to the leased store.
#[derive(Debug)]
pub struct GraphLease<'a, S> {
    guard: MutexGuard<'a, S>,
}

impl<S> Deref for GraphLease<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.guard
    }
}

impl<S> DerefMut for GraphLease<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.guard
    }
}

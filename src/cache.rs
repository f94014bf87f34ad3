//! In-process caching of resolved fragments and built descriptors
//!
//! Both engine caches are [`KeyedCache`]s. A value is computed at most once
//! per key: the first thread to ask for a key marks it in flight and computes
//! it outside the lock, and every other thread asking for the same key waits
//! for that computation instead of duplicating the work. A failed
//! computation stores nothing, so the key is computed again on the next
//! request.
//!
//! Waiting threads are tracked in a wait-for graph. A thread about to wait
//! on a key whose computation (directly or through other waiting threads)
//! is itself waiting on this thread gets a [`Error::CyclicFragment`] instead,
//! so a fragment cycle split across parallel builds fails rather than
//! blocking forever.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use crate::descriptor::BuildDescriptor;
use crate::error::{Error, Result};
use crate::phases::ResolvedArtifact;

/// Cache of resolved fragment artifacts, keyed by `Coordinate::key`
pub type ResolutionCache = KeyedCache<String, ResolvedArtifact>;

/// Cache of fully assembled fragment descriptors, keyed by `Coordinate::key`
pub type BuildCache = KeyedCache<String, Arc<BuildDescriptor>>;

#[derive(Debug)]
struct State<K, V> {
    values: HashMap<K, V>,
    /// Keys being computed, with the thread computing them
    in_flight: HashMap<K, ThreadId>,
    /// Threads blocked on an in-flight key
    waiting: HashMap<ThreadId, K>,
}

/// Append-only cache computing each value at most once
#[derive(Debug)]
pub struct KeyedCache<K, V> {
    state: Mutex<State<K, V>>,
    ready: Condvar,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                values: HashMap::new(),
                in_flight: HashMap::new(),
                waiting: HashMap::new(),
            }),
            ready: Condvar::new(),
        }
    }

    /// Get a cached value, or compute and cache it if not present
    ///
    /// Fails with [`Error::CyclicFragment`] when waiting for `key` would
    /// close a cycle of threads waiting on each other, including a thread
    /// asking for a key it is computing itself.
    pub fn get_or_try_insert_with<F>(&self, key: &K, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let me = thread::current().id();
        let mut state = self.lock_state()?;
        loop {
            if let Some(cached) = state.values.get(key) {
                return Ok(cached.clone());
            }
            if !state.in_flight.contains_key(key) {
                break;
            }
            if let Some(chain) = waiting_cycle(&state, key, me) {
                return Err(Error::CyclicFragment { chain });
            }
            state.waiting.insert(me, key.clone());
            state = self.ready.wait(state).map_err(|_| Error::LockPoisoned {
                context: "cache state".to_string(),
            })?;
            state.waiting.remove(&me);
        }
        state.in_flight.insert(key.clone(), me);
        drop(state);

        let _flight = InFlight { cache: self, key };
        let computed = compute()?;
        self.lock_state()?.values.insert(key.clone(), computed.clone());
        Ok(computed)
    }

    /// Get a computed value without computing it
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.lock_state()?.values.get(key).cloned())
    }

    /// Check if a computed value exists for `key`
    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.lock_state()?.values.contains_key(key))
    }

    /// Get the number of computed values
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock_state()?.values.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock_state()?.values.is_empty())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, State<K, V>>> {
        self.state.lock().map_err(|_| Error::LockPoisoned {
            context: "cache state".to_string(),
        })
    }
}

/// Follow the wait-for graph from `key`; `Some(chain)` if it leads back to `me`
///
/// The chain starts and ends with the key `me` is computing.
fn waiting_cycle<K, V>(state: &State<K, V>, key: &K, me: ThreadId) -> Option<String>
where
    K: Eq + Hash + Display,
{
    let mut keys = vec![key];
    let mut holder = *state.in_flight.get(key)?;
    // Each thread waits on at most one key, so the walk visits every thread once at most
    for _ in 0..=state.waiting.len() {
        if holder == me {
            let mut chain: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
            let closing = chain[chain.len() - 1].clone();
            chain.insert(0, closing);
            return Some(chain.join(" -> "));
        }
        let next = state.waiting.get(&holder)?;
        keys.push(next);
        holder = *state.in_flight.get(next)?;
    }
    None
}

/// Marks a key in flight until dropped
///
/// Dropping clears the mark and wakes the waiting threads, whether the
/// computation stored a value, failed or panicked.
struct InFlight<'a, K, V>
where
    K: Eq + Hash,
{
    cache: &'a KeyedCache<K, V>,
    key: &'a K,
}

impl<K, V> Drop for InFlight<'_, K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        let mut state = self
            .cache
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.in_flight.remove(self.key);
        drop(state);
        self.cache.ready.notify_all();
    }
}

impl<K, V> Default for KeyedCache<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

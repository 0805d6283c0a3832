//! Shared collection abstractions used throughout lx-core.
//!
//! The default build uses `dashmap::DashMap` for concurrency.

use dashmap::DashMap;
use std::hash::Hash;

pub struct ConcurrentMap<K, V> {
    inner: DashMap<K, V>,
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: dashmap::DashMap::new(),
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    pub fn get_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Mutates the entry for `key` in place, creating it first if absent.
    pub fn update_or_default<R>(&self, key: K, func: impl FnOnce(&mut V) -> R) -> R
    where
        V: Default,
    {
        let mut entry = self.inner.entry(key).or_default();
        func(entry.value_mut())
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.inner.iter() {
            let (k, v) = entry.pair();
            f(k, v);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

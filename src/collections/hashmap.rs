use std::hash::{Hash, Hasher};

use crate::collections::dynarray::DynArray;

/// Polynomial accumulator over the key's byte representation.
///
/// Fast distribution hash, not a security primitive: every byte folds in
/// as `state * 31 + byte`.
pub struct PolyHasher {
    state: u64,
}

impl PolyHasher {
    pub fn new() -> Self {
        PolyHasher { state: 0 }
    }
}

impl Default for PolyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for PolyHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.wrapping_mul(31).wrapping_add(byte as u64);
        }
    }
}

struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

/// Chained hash table with automatic doubling.
///
/// Collisions chain off the bucket head, newest entry prepended. The
/// table doubles (and reinserts every entry) before an insert would push
/// the load factor to 0.75. Deletes never shrink.
pub struct ChainedMap<K, V> {
    buckets: DynArray<Option<Box<Entry<K, V>>>>,
    len: usize,
}

impl<K: Hash + Eq, V> ChainedMap<K, V> {
    const DEFAULT_CAPACITY: usize = 16;
    const MAX_LOAD_FACTOR: f64 = 0.75;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ChainedMap {
            buckets: Self::empty_buckets(capacity),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Insert or overwrite. Exactly one chain entry per key afterwards.
    pub fn insert(&mut self, key: K, value: V) {
        let index = self.bucket_index(&key);
        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                entry.value = value;
                return;
            }
            cursor = entry.next.as_deref_mut();
        }
        self.link_fresh(key, value);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.bucket_index(key);
        let mut cursor = self.buckets[index].as_deref();
        while let Some(entry) = cursor {
            if entry.key == *key {
                return Some(&entry.value);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == *key {
                return Some(&mut entry.value);
            }
            cursor = entry.next.as_deref_mut();
        }
        None
    }

    /// Upsert-on-read: the value for `key`, inserting `V::default()` when
    /// absent. Read-only callers must use `get`/`contains` instead or they
    /// will grow the table.
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        if self.contains(&key) {
            let index = self.bucket_index(&key);
            let mut cursor = self.buckets[index].as_deref_mut();
            while let Some(entry) = cursor {
                if entry.key == key {
                    return &mut entry.value;
                }
                cursor = entry.next.as_deref_mut();
            }
            unreachable!("chain entry vanished between lookups");
        }
        let index = self.link_fresh(key, V::default());
        match self.buckets[index].as_deref_mut() {
            Some(entry) => &mut entry.value,
            None => unreachable!("freshly linked entry missing"),
        }
    }

    /// Remove `key` if present; no-op otherwise. Never shrinks the table.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let mut cursor = &mut self.buckets[index];
        loop {
            let hit_or_end = match cursor.as_deref() {
                None => true,
                Some(entry) => entry.key == *key,
            };
            if hit_or_end {
                let Some(mut entry) = cursor.take() else {
                    return None;
                };
                *cursor = entry.next.take();
                self.len -= 1;
                return Some(entry.value);
            }
            cursor = match cursor {
                Some(entry) => &mut entry.next,
                None => return None,
            };
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: &self.buckets,
            bucket: 0,
            chain: None,
        }
    }

    /// Prepend a fresh entry, rehashing first when the insert would reach
    /// the load-factor ceiling. Returns the (post-rehash) bucket index.
    fn link_fresh(&mut self, key: K, value: V) -> usize {
        if self.len as f64 >= self.buckets.len() as f64 * Self::MAX_LOAD_FACTOR {
            self.rehash();
        }
        let index = self.bucket_index(&key);
        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry { key, value, next }));
        self.len += 1;
        index
    }

    /// Double capacity and relink every entry. The modulus changes, so
    /// every entry's bucket is recomputed.
    fn rehash(&mut self) {
        let new_capacity = self.buckets.len() * 2;
        let mut old = std::mem::replace(&mut self.buckets, Self::empty_buckets(new_capacity));
        for slot in old.iter_mut() {
            let mut chain = slot.take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let index = Self::bucket_for(&entry.key, new_capacity);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }
    }

    fn bucket_index(&self, key: &K) -> usize {
        Self::bucket_for(key, self.buckets.len())
    }

    fn bucket_for(key: &K, capacity: usize) -> usize {
        let mut hasher = PolyHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % capacity as u64) as usize
    }

    fn empty_buckets(capacity: usize) -> DynArray<Option<Box<Entry<K, V>>>> {
        let mut buckets = DynArray::with_capacity(capacity);
        for _ in 0..capacity {
            buckets.push(None);
        }
        buckets
    }
}

impl<K: Hash + Eq, V> Default for ChainedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, K, V> {
    buckets: &'a [Option<Box<Entry<K, V>>>],
    bucket: usize,
    chain: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                return Some((&entry.key, &entry.value));
            }
            if self.bucket >= self.buckets.len() {
                return None;
            }
            self.chain = self.buckets[self.bucket].as_deref();
            self.bucket += 1;
        }
    }
}

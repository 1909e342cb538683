use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use rustc_hash::{FxBuildHasher, FxHashMap};

/// Trait for inserting a key-value pair that must not exist yet.
pub trait HashMapInsertNew<K, V> {
    /// Inserts a new key-value pair into the map.
    ///
    /// # Panics
    /// Panics if the key is already present in the map.
    fn insert_new(&mut self, key: K, value: V);
}

impl<K, V, H> HashMapInsertNew<K, V> for HashMap<K, V, H>
where
    K: Eq + Hash + Debug,
    V: Debug,
    H: BuildHasher,
{
    #[inline]
    fn insert_new(&mut self, key: K, value: V) {
        match self.entry(key) {
            Entry::Occupied(occupied_entry) => panic!(
                "can not insert value {value:?}, because there is already an entry ({:?}, {:?})",
                occupied_entry.key(),
                occupied_entry.get()
            ),
            Entry::Vacant(vacant_entry) => {
                vacant_entry.insert(value);
            }
        }
    }
}

/// Trait for objects that can be created with a given capacity.
pub trait WithCapacity {
    fn with_capacity(capacity: usize) -> Self;
}

impl<K, V> WithCapacity for FxHashMap<K, V> {
    #[inline]
    fn with_capacity(capacity: usize) -> Self {
        FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}

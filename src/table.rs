use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use xxhash_rust::xxh3::Xxh3;

/// Byte size or count read from a report.
pub type Size = i64;

type Xxh3Builder = BuildHasherDefault<Xxh3>;

/// Section or symbol name mapped to a size, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeTable {
    data: IndexMap<String, Size, Xxh3Builder>,
}

impl SizeTable {
    pub fn new() -> Self {
        SizeTable {
            data: IndexMap::with_capacity_and_hasher(64, Xxh3Builder::default()),
        }
    }

    /// Stores `value` under `key`. A key seen before keeps its position.
    pub fn set(&mut self, key: &str, value: Size) {
        match self.data.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.data.insert(key.to_owned(), value);
            }
        }
    }

    /// Makes `key` visible with size 0 unless it is already present.
    pub fn reserve_key(&mut self, key: &str) {
        if !self.data.contains_key(key) {
            self.data.insert(key.to_owned(), 0);
        }
    }

    /// Adds `value` to the running sum for `key`, returning the new sum or
    /// `None` when it would overflow (the table is left untouched then).
    pub fn add(&mut self, key: &str, value: Size) -> Option<Size> {
        if let Some(sum) = self.data.get_mut(key) {
            *sum = sum.checked_add(value)?;
            return Some(*sum);
        }
        self.data.insert(key.to_owned(), value);
        Some(value)
    }

    pub fn get(&self, key: &str) -> Option<Size> {
        self.data.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Size)> + '_ {
        self.data.iter().map(|(key, size)| (key.as_str(), *size))
    }
}

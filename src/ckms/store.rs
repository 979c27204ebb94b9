//! The ordered summary store.
//!
//! Entries are kept in value order, split across blocks of at most
//! `block_cap` entries so that insertion and removal only shift one block.
//! Positions are plain indexes. Traversal state lives in a [`Cursor`] owned
//! by the caller and threaded through every positional operation; the store
//! itself holds none.
use std::ops::Index;

use crate::ckms::entry::Entry;

/// Entries per block before it is split in half.
pub const DEFAULT_BLOCK_CAPACITY: usize = 512;

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
struct Block<T>
where
    T: PartialEq,
{
    data: Vec<Entry<T>>,
    g_sum: usize,
}

impl<T> Block<T>
where
    T: PartialEq,
{
    fn with_capacity(cap: usize) -> Block<T> {
        Block {
            data: Vec::with_capacity(cap),
            g_sum: 0,
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn split_off(&mut self, index: usize) -> Self {
        assert!(index < self.data.len());
        let nxt = self.data.split_off(index);
        let nxt_g_sum = nxt.iter().fold(0, |acc, x| acc + x.g);
        self.g_sum -= nxt_g_sum;
        Block {
            data: nxt,
            g_sum: nxt_g_sum,
        }
    }
}

/// A traversal position within a [`Store`].
///
/// The cursor sits between entries. `next` yields the entry after it and
/// moves past it, `prev` moves back over the entry before it. A fresh cursor
/// sits before the first entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    next: usize,
}

impl Cursor {
    /// A cursor positioned before the first entry
    pub fn new() -> Cursor {
        Cursor { next: 0 }
    }

    /// The 0-based index of the entry `next` would yield. Equivalently, the
    /// number of entries behind the cursor.
    pub fn position(&self) -> usize {
        self.next
    }
}

/// An ordered sequence of entries with position-aware edits.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Store<T>
where
    T: PartialEq,
{
    data: Vec<Block<T>>,
    block_cap: usize,
    len: usize,
}

impl<T> Default for Store<T>
where
    T: PartialEq,
{
    fn default() -> Self {
        Store::new()
    }
}

impl<T> Store<T>
where
    T: PartialEq,
{
    /// Create an empty store with the default block capacity
    pub fn new() -> Store<T> {
        Store::with_block_capacity(DEFAULT_BLOCK_CAPACITY)
    }

    /// Create an empty store whose blocks split above `block_cap` entries
    pub fn with_block_capacity(block_cap: usize) -> Store<T> {
        assert!(block_cap != 0);
        Store {
            data: vec![Block::with_capacity(block_cap)],
            block_cap,
            len: 0,
        }
    }

    /// Entries currently stored
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of `g` over every entry
    pub fn g_sum(&self) -> usize {
        self.data.iter().fold(0, |acc, b| acc + b.g_sum)
    }

    /// The entry at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Entry<T>> {
        if index < self.len {
            let (outer_idx, inner_idx) = self.locate(index);
            Some(&self.data[outer_idx].data[inner_idx])
        } else {
            None
        }
    }

    /// Whether an entry lies ahead of `cursor`
    pub fn has_next(&self, cursor: &Cursor) -> bool {
        cursor.next < self.len
    }

    /// Yield the entry ahead of `cursor` and step past it
    pub fn next(&self, cursor: &mut Cursor) -> Option<&Entry<T>> {
        let entry = self.get(cursor.next)?;
        cursor.next += 1;
        Some(entry)
    }

    /// Step `cursor` back over the entry behind it, yielding that entry
    pub fn prev(&self, cursor: &mut Cursor) -> Option<&Entry<T>> {
        if cursor.next == 0 {
            return None;
        }
        cursor.next -= 1;
        self.get(cursor.next)
    }

    /// Insert `entry` at the cursor, immediately before the entry `next`
    /// would have yielded. The cursor ends up past the new entry.
    pub fn insert_before(&mut self, cursor: &mut Cursor, entry: Entry<T>) {
        assert!(
            cursor.next <= self.len,
            "cursor {} beyond end of store of {}",
            cursor.next,
            self.len
        );
        let mut outer_idx = 0;
        let mut idx = cursor.next;
        while idx > self.data[outer_idx].len() {
            idx -= self.data[outer_idx].len();
            outer_idx += 1;
        }
        self.data[outer_idx].g_sum += entry.g;
        self.data[outer_idx].data.insert(idx, entry);
        self.len += 1;
        cursor.next += 1;

        if self.data[outer_idx].len() > self.block_cap {
            let half = self.data[outer_idx].len() / 2;
            let nxt = self.data[outer_idx].split_off(half);
            self.data.insert(outer_idx + 1, nxt);
        }
    }

    /// Absorb the predecessor of the entry last yielded by `next` into it.
    ///
    /// The predecessor's `g` is added to the current entry and the
    /// predecessor removed. The cursor moves back with the current entry so
    /// traversal continues after it.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has no current entry or the current entry is the
    /// head of the store.
    pub fn merge_into_next(&mut self, cursor: &mut Cursor) {
        assert!(
            cursor.next >= 2 && cursor.next <= self.len,
            "no predecessor to merge at cursor {} in store of {}",
            cursor.next,
            self.len
        );
        let prev_idx = cursor.next - 2;
        let len = self.len;
        let prev = self.remove(prev_idx);
        let (outer_idx, inner_idx) = self.locate(prev_idx);
        self.data[outer_idx].data[inner_idx].g += prev.g;
        self.data[outer_idx].g_sum += prev.g;
        cursor.next -= 1;
        assert_eq!(len - 1, self.len, "merge did not shrink the store");
    }

    /// Iterate the entries in order
    pub fn iter(&self) -> StoreIter<T> {
        StoreIter {
            store: &self.data,
            outer_idx: 0,
            inner_idx: 0,
        }
    }

    fn remove(&mut self, index: usize) -> Entry<T> {
        let (outer_idx, inner_idx) = self.locate(index);
        let entry = self.data[outer_idx].data.remove(inner_idx);
        self.data[outer_idx].g_sum -= entry.g;
        self.len -= 1;
        if self.data[outer_idx].data.is_empty() && self.data.len() > 1 {
            self.data.remove(outer_idx);
        }
        entry
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        debug_assert!(index < self.len);
        let mut outer_idx = 0;
        let mut idx = index;
        while idx >= self.data[outer_idx].len() {
            idx -= self.data[outer_idx].len();
            outer_idx += 1;
        }
        (outer_idx, idx)
    }
}

impl<T> Index<usize> for Store<T>
where
    T: PartialEq,
{
    type Output = Entry<T>;

    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < self.len, "index {} out of {}", index, self.len);
        let (outer_idx, inner_idx) = self.locate(index);
        &self.data[outer_idx].data[inner_idx]
    }
}

/// Borrowing iterator over a [`Store`], in order.
#[derive(Debug)]
pub struct StoreIter<'a, T>
where
    T: 'a + PartialEq,
{
    store: &'a [Block<T>],
    outer_idx: usize,
    inner_idx: usize,
}

impl<'a, T> Iterator for StoreIter<'a, T>
where
    T: PartialEq,
{
    type Item = &'a Entry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.outer_idx < self.store.len() {
            if self.inner_idx < self.store[self.outer_idx].len() {
                let ret = &self.store[self.outer_idx].data[self.inner_idx];
                self.inner_idx += 1;
                return Some(ret);
            }
            self.inner_idx = 0;
            self.outer_idx += 1;
        }
        None
    }
}

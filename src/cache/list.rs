//! Recency List Module
//!
//! Doubly-linked list of cache entries kept in a slab, so links are slot
//! indices rather than references.

use crate::cache::entry::CacheEntry;

/// Node in the recency list
#[derive(Debug)]
struct Node<K, V> {
    entry: CacheEntry<K, V>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Entries ordered by recency of use.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// A slot index returned by [`push_front`](Self::push_front) stays valid until
/// that entry is removed; vacated slots are recycled through a free list.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot of the least recently used entry.
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Slot of the entry just more recent than `idx`, if any.
    pub fn prev(&self, idx: usize) -> Option<usize> {
        self.node(idx).and_then(|node| node.prev)
    }

    pub fn get(&self, idx: usize) -> Option<&CacheEntry<K, V>> {
        self.node(idx).map(|node| &node.entry)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut CacheEntry<K, V>> {
        self.nodes
            .get_mut(idx)
            .and_then(Option::as_mut)
            .map(|node| &mut node.entry)
    }

    // == Push Front ==
    /// Links a new entry at the head and returns its slot.
    pub fn push_front(&mut self, entry: CacheEntry<K, V>) -> usize {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        match self.head {
            Some(head_idx) => self.set_prev(head_idx, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Marks the entry at `idx` as most recently used.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || self.node(idx).is_none() {
            return;
        }

        self.unlink(idx);
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_idx) => self.set_prev(head_idx, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    // == Remove ==
    /// Unlinks the entry at `idx` and frees its slot.
    pub fn remove(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        self.node(idx)?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry<K, V>> {
        let idx = self.tail?;
        self.remove(idx)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(idx).and_then(Option::as_mut)
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(node) = self.node_mut(idx) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(node) = self.node_mut(idx) {
            node.next = next;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => self.set_next(prev_idx, next),
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.set_prev(next_idx, prev),
            None => self.tail = prev,
        }
    }
}

/// Head-to-tail iterator over a [`RecencyList`].
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (usize, &'a CacheEntry<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx)?;
        self.cursor = node.next;
        Some((idx, &node.entry))
    }
}

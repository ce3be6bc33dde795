//! Fixed-capacity slot arena with an intrusive recency list.
//!
//! Entries live in a `Vec` reserved to the cache capacity at construction. The
//! recency list is threaded through the slots as `prev`/`next` indices, so
//! promoting or evicting an entry only rewrites a handful of integers.
//!
//! ```text
//!   index │ Slot { key, value, prev, next }
//!  ───────┼──────────────────────────────────────
//!     0   │ { a, 1, prev: Some(2), next: None }     ◀── tail (LRU)
//!     1   │ { b, 2, prev: None,    next: Some(2) }  ◀── head (MRU)
//!     2   │ { c, 3, prev: Some(1), next: Some(0) }
//! ```
//!
//! Active slots always occupy `[0, len)`. New entries are appended at `len`,
//! evictions overwrite the tail slot in place, and the only way to shrink the
//! range is [`SlotList::drain`] / [`SlotList::clear`], which empty it entirely.
//!
//! **Note**: This module is internal infrastructure. Every index handed to it
//! must come from the cache's key index or from [`SlotList::tail`].

use core::mem;

/// One storage cell: an entry plus its recency links.
#[derive(Debug)]
pub(crate) struct Slot<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Neighbor on the MRU (head) side.
    prev: Option<usize>,
    /// Neighbor on the LRU (tail) side.
    next: Option<usize>,
}

/// The slot arena and the cursors of the recency list threaded through it.
pub(crate) struct SlotList<K, V> {
    slots: Vec<Slot<K, V>>,
    cap: usize,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> SlotList<K, V> {
    /// Creates an empty list with storage reserved for `cap` slots.
    pub(crate) fn new(cap: usize) -> Self {
        SlotList {
            slots: Vec::with_capacity(cap),
            cap,
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.slots.len() >= self.cap
    }

    /// Slot index of the least recently used entry.
    #[inline]
    pub(crate) fn tail(&self) -> Option<usize> {
        self.tail
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> Option<&Slot<K, V>> {
        self.slots.get(idx)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Slot<K, V>> {
        self.slots.get_mut(idx)
    }

    /// Returns the entry stored at `idx` in storage order, if active.
    #[inline]
    pub(crate) fn entry(&self, idx: usize) -> Option<(&K, &V)> {
        self.slots.get(idx).map(|slot| (&slot.key, &slot.value))
    }

    /// Claims slot `len` for a new entry and links it as the head.
    ///
    /// The caller must check [`is_full`](Self::is_full) first; the arena never
    /// grows past the capacity it was created with.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        debug_assert!(!self.is_full(), "push_front on a full slot list");
        let idx = self.slots.len();
        self.slots.push(Slot {
            key,
            value,
            prev: None,
            next: None,
        });
        self.attach_front(idx);
        idx
    }

    /// Moves an active slot to the head of the recency list.
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || idx >= self.slots.len() {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }

    /// Overwrites the entry in slot `idx` in place, returning the previous one.
    ///
    /// Links are left untouched; the slot keeps its position in the list.
    pub(crate) fn replace(&mut self, idx: usize, key: K, value: V) -> Option<(K, V)> {
        let slot = self.slots.get_mut(idx)?;
        let old_key = mem::replace(&mut slot.key, key);
        let old_value = mem::replace(&mut slot.value, value);
        Some((old_key, old_value))
    }

    /// Removes every entry in storage order, keeping the reserved storage.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        self.head = None;
        self.tail = None;
        self.slots.drain(..).map(|slot| (slot.key, slot.value))
    }

    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.slots.clear();
    }

    /// Unlinks `idx` from its neighbors, moving the head/tail cursors if needed.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = &mut self.slots[idx];
            (slot.prev.take(), slot.next.take())
        };

        match prev {
            Some(prev_idx) => self.slots[prev_idx].next = next,
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.slots[next_idx].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Links a detached slot in front of the current head.
    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[idx];
            slot.prev = None;
            slot.next = old_head;
        }

        match old_head {
            Some(head_idx) => self.slots[head_idx].prev = Some(idx),
            // first entry since the list was last empty is also the tail
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Slot indices from head (MRU) to tail (LRU).
    #[cfg(test)]
    pub(crate) fn recency_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            order.push(idx);
            if order.len() > self.slots.len() {
                break;
            }
            cursor = self.slots[idx].next;
        }
        order
    }

    /// Panics if the list and arena disagree.
    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        let len = self.slots.len();
        assert!(len <= self.cap, "len {} exceeds capacity {}", len, self.cap);

        if len == 0 {
            assert_eq!(self.head, None);
            assert_eq!(self.tail, None);
            return;
        }

        let mut seen = vec![false; len];
        let mut prev = None;
        let mut cursor = self.head;
        let mut visited = 0;
        while let Some(idx) = cursor {
            assert!(idx < len, "link to inactive slot {}", idx);
            assert!(!seen[idx], "cycle through slot {}", idx);
            seen[idx] = true;
            assert_eq!(self.slots[idx].prev, prev, "bad prev link at {}", idx);
            prev = Some(idx);
            cursor = self.slots[idx].next;
            visited += 1;
        }

        assert_eq!(visited, len, "list does not cover every active slot");
        assert_eq!(self.tail, prev, "tail does not end the list");
    }
}

impl<K, V> core::fmt::Debug for SlotList<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotList")
            .field("cap", &self.cap)
            .field("len", &self.slots.len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> SlotList<u32, u32> {
        let mut list = SlotList::new(n);
        for i in 0..n as u32 {
            list.push_front(i, i * 10);
        }
        list
    }

    #[test]
    fn test_new_list_is_empty() {
        let list: SlotList<u32, u32> = SlotList::new(4);
        assert_eq!(list.len(), 0);
        assert_eq!(list.cap(), 4);
        assert_eq!(list.tail(), None);
        assert!(!list.is_full());
        list.debug_validate_invariants();
    }

    #[test]
    fn test_first_push_is_head_and_tail() {
        let mut list = SlotList::new(3);
        let idx = list.push_front("a", 1);
        assert_eq!(idx, 0);
        assert_eq!(list.tail(), Some(0));
        assert_eq!(list.recency_order(), vec![0]);
        list.debug_validate_invariants();
    }

    #[test]
    fn test_push_front_orders_by_recency() {
        let list = filled(4);
        assert!(list.is_full());
        assert_eq!(list.recency_order(), vec![3, 2, 1, 0]);
        assert_eq!(list.tail(), Some(0));
        list.debug_validate_invariants();
    }

    #[test]
    fn test_move_tail_to_front() {
        let mut list = filled(3);
        list.move_to_front(0);
        assert_eq!(list.recency_order(), vec![0, 2, 1]);
        assert_eq!(list.tail(), Some(1));
        list.debug_validate_invariants();
    }

    #[test]
    fn test_move_interior_to_front() {
        let mut list = filled(4);
        list.move_to_front(2);
        assert_eq!(list.recency_order(), vec![2, 3, 1, 0]);
        list.move_to_front(1);
        assert_eq!(list.recency_order(), vec![1, 2, 3, 0]);
        list.debug_validate_invariants();
    }

    #[test]
    fn test_move_head_is_noop() {
        let mut list = filled(3);
        list.move_to_front(2);
        assert_eq!(list.recency_order(), vec![2, 1, 0]);
        list.debug_validate_invariants();
    }

    #[test]
    fn test_move_inactive_index_is_ignored() {
        let mut list = filled(2);
        list.move_to_front(7);
        assert_eq!(list.recency_order(), vec![1, 0]);
        list.debug_validate_invariants();
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut list = filled(3);
        let old = list.replace(0, 99, 990);
        assert_eq!(old, Some((0, 0)));
        assert_eq!(list.entry(0), Some((&99, &990)));
        assert_eq!(list.recency_order(), vec![2, 1, 0]);
        assert_eq!(list.replace(5, 1, 1), None);
    }

    #[test]
    fn test_single_slot_cycle() {
        let mut list = filled(1);
        list.move_to_front(0);
        list.replace(0, 5, 50);
        list.move_to_front(0);
        assert_eq!(list.tail(), Some(0));
        assert_eq!(list.recency_order(), vec![0]);
        list.debug_validate_invariants();
    }

    #[test]
    fn test_drain_in_storage_order() {
        let mut list = filled(3);
        list.move_to_front(0);
        let drained: Vec<_> = list.drain().collect();
        assert_eq!(drained, vec![(0, 0), (1, 10), (2, 20)]);
        assert_eq!(list.len(), 0);
        list.debug_validate_invariants();
    }

    #[test]
    fn test_refill_after_clear_resets_tail() {
        let mut list = filled(3);
        list.move_to_front(0);
        list.move_to_front(1);
        assert_eq!(list.tail(), Some(2));
        list.clear();
        list.debug_validate_invariants();

        list.push_front(7, 70);
        assert_eq!(list.tail(), Some(0));
        list.push_front(8, 80);
        assert_eq!(list.recency_order(), vec![1, 0]);
        list.debug_validate_invariants();
    }
}

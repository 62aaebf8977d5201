//! Fixed-capacity key/value store with least-recently-used eviction

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Sentinel link meaning "no slot"
const NIL: usize = usize::MAX;

struct Slot<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Bounded associative store. Entries live in an index-addressed arena of
/// slots with the recency list threaded through them by index (head is
/// least-recently-used, tail most-recently-used); freed slots are recycled
/// through a free list. Every structural mutation updates the key index and
/// the links together, so the two views never disagree.
pub struct LruCache<K, V> {
    capacity: usize,
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    head: usize,
    tail: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            free: Vec::new(),
            index: FxHashMap::default(),
            head: NIL,
            tail: NIL,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a key. A hit becomes the most-recently-used entry.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.move_to_tail(slot);
        self.slots[slot].as_ref().map(|s| &s.value)
    }

    /// Insert or replace a value, making it the most-recently-used entry,
    /// then evict from the least-recently-used end until the entry count is
    /// within capacity again.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(s) = self.slots[slot].as_mut() {
                s.value = value;
            }
            self.move_to_tail(slot);
            return;
        }

        let slot = self.alloc(key.clone(), value);
        self.attach_tail(slot);
        self.index.insert(key, slot);

        while self.index.len() > self.capacity {
            self.evict_head();
        }
    }

    // ========================================================================
    // ARENA AND LINK MAINTENANCE
    // ========================================================================

    fn alloc(&mut self, key: K, value: V) -> usize {
        let slot = Slot {
            key,
            value,
            prev: NIL,
            next: NIL,
        };
        match self.free.pop() {
            Some(i) => {
                self.slots[i] = Some(slot);
                i
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        }
    }

    fn detach(&mut self, i: usize) {
        let (prev, next) = match self.slots[i].as_ref() {
            Some(s) => (s.prev, s.next),
            None => return,
        };

        if prev != NIL {
            if let Some(p) = self.slots[prev].as_mut() {
                p.next = next;
            }
        } else {
            self.head = next;
        }
        if next != NIL {
            if let Some(n) = self.slots[next].as_mut() {
                n.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(s) = self.slots[i].as_mut() {
            s.prev = NIL;
            s.next = NIL;
        }
    }

    fn attach_tail(&mut self, i: usize) {
        if let Some(s) = self.slots[i].as_mut() {
            s.prev = self.tail;
            s.next = NIL;
        }
        if self.tail != NIL {
            if let Some(t) = self.slots[self.tail].as_mut() {
                t.next = i;
            }
        }
        self.tail = i;
        if self.head == NIL {
            self.head = i;
        }
    }

    fn move_to_tail(&mut self, i: usize) {
        if self.tail == i {
            return;
        }
        self.detach(i);
        self.attach_tail(i);
    }

    fn evict_head(&mut self) {
        let i = self.head;
        if i == NIL {
            return;
        }
        self.detach(i);
        if let Some(slot) = self.slots[i].take() {
            self.index.remove(&slot.key);
        }
        self.free.push(i);
    }

    #[cfg(test)]
    fn arena_len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let mut cache: LruCache<&str, i32> = LruCache::new(4);
        cache.put("a", 1);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replace_updates_value() {
        let mut cache: LruCache<&str, i32> = LruCache::new(4);
        cache.put("a", 1);
        cache.put("a", 2);
        assert_eq!(cache.get(&"a"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut cache: LruCache<i32, i32> = LruCache::new(3);
        for k in 0..4 {
            cache.put(k, k * 10);
            assert!(cache.len() <= cache.capacity());
        }
        // 0 was the least-recently-touched of the originals.
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.get(&2), Some(&20));
        assert_eq!(cache.get(&3), Some(&30));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache: LruCache<&str, i32> = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.put("c", 3);
        // "b" was least recently touched once "a" was read.
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn test_put_refreshes_recency() {
        let mut cache: LruCache<&str, i32> = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 9);
        cache.put("c", 3);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&9));
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let mut cache: LruCache<i32, i32> = LruCache::new(0);
        cache.put(1, 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_evicted_slots_are_recycled() {
        let mut cache: LruCache<i32, i32> = LruCache::new(2);
        for k in 0..100 {
            cache.put(k, k);
        }
        assert_eq!(cache.len(), 2);
        // The arena never grows past capacity + the slot being cycled.
        assert!(cache.arena_len() <= 3, "arena grew to {}", cache.arena_len());
        assert_eq!(cache.get(&99), Some(&99));
        assert_eq!(cache.get(&98), Some(&98));
    }

    #[test]
    fn test_single_entry_churn() {
        let mut cache: LruCache<i32, i32> = LruCache::new(1);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&2));
        cache.put(2, 4);
        assert_eq!(cache.get(&2), Some(&4));
        assert_eq!(cache.len(), 1);
    }
}

//! Order index - direct-mapped id lookup over the pool.
//!
//! A fixed array of pool indices sized to the pool capacity, keyed by
//! `id % capacity` with linear probing. Sequential ids hit their natural
//! slot, so the steady-state lookup is one array read and one id compare.
//! Deletion backward-shifts the probe chain: every entry between the
//! cleared slot and the next empty slot is pulled out and re-inserted
//! through the normal insertion routine, which keeps "stop at first
//! empty" a safe termination rule for lookups.

use crate::pool::{OrderPool, PoolIndex, NULL_INDEX};
use crate::types::OrderId;

/// Outcome of an insertion attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertResult {
    Ok,
    /// An entry with the same id is already present.
    Duplicate,
    /// The probe wrapped without finding an empty slot.
    Full,
}

/// Open-addressed map from order id to pool index.
pub struct OrderIndex {
    slots: Vec<PoolIndex>,
}

impl OrderIndex {
    /// Create an index with `capacity` slots; must match the pool capacity
    /// so the table can never run out before the pool does.
    pub fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "index capacity must be non-zero");
        Self {
            slots: vec![NULL_INDEX; capacity as usize],
        }
    }

    #[inline]
    fn slot_of(&self, id: OrderId) -> usize {
        (id.0 % self.slots.len() as u64) as usize
    }

    #[inline]
    fn next_slot(&self, idx: usize) -> usize {
        (idx + 1) % self.slots.len()
    }

    /// Find the pool cell holding `id`.
    ///
    /// Probes from the natural slot, stopping at the first empty slot or
    /// after a full wrap. O(1) for sequential ids.
    #[inline]
    pub fn lookup(&self, pool: &OrderPool, id: OrderId) -> Option<PoolIndex> {
        let start = self.slot_of(id);
        let mut idx = start;
        loop {
            let entry = self.slots[idx];
            if entry == NULL_INDEX {
                return None;
            }
            if pool.get(entry).id == id {
                return Some(entry);
            }
            idx = self.next_slot(idx);
            if idx == start {
                return None;
            }
        }
    }

    /// Insert the order held in `pool` at `index`.
    #[inline]
    pub fn insert(&mut self, pool: &OrderPool, index: PoolIndex) -> InsertResult {
        let id = pool.get(index).id;
        let start = self.slot_of(id);
        let mut idx = start;
        while self.slots[idx] != NULL_INDEX {
            if pool.get(self.slots[idx]).id == id {
                return InsertResult::Duplicate;
            }
            idx = self.next_slot(idx);
            if idx == start {
                return InsertResult::Full;
            }
        }
        self.slots[idx] = index;
        InsertResult::Ok
    }

    /// Remove `id` with backward-shift rehashing.
    ///
    /// After clearing the slot, every occupied slot up to the next empty
    /// one is cleared and re-inserted from its natural position, so no
    /// surviving key is ever separated from its natural slot by an empty.
    /// A miss is a no-op.
    pub fn remove(&mut self, pool: &OrderPool, id: OrderId) {
        let start = self.slot_of(id);
        let mut idx = start;
        loop {
            let entry = self.slots[idx];
            if entry == NULL_INDEX {
                return;
            }
            if pool.get(entry).id == id {
                self.slots[idx] = NULL_INDEX;
                let mut next = self.next_slot(idx);
                while self.slots[next] != NULL_INDEX {
                    let displaced = self.slots[next];
                    self.slots[next] = NULL_INDEX;
                    let reinserted = self.insert(pool, displaced);
                    debug_assert_eq!(reinserted, InsertResult::Ok);
                    next = self.next_slot(next);
                }
                return;
            }
            idx = self.next_slot(idx);
            if idx == start {
                return;
            }
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrdType, Price, Qty, Side, Timestamp};

    const CAP: u32 = 8;

    fn create(pool: &mut OrderPool, id: u64) -> PoolIndex {
        pool.create(OrderId(id), Price(100), Qty(10), Side::Buy, OrdType::Limit, Timestamp(0))
            .unwrap()
    }

    #[test]
    fn test_insert_lookup_natural_slot() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        let a = create(&mut pool, 1);
        let b = create(&mut pool, 2);

        assert_eq!(index.insert(&pool, a), InsertResult::Ok);
        assert_eq!(index.insert(&pool, b), InsertResult::Ok);

        assert_eq!(index.lookup(&pool, OrderId(1)), Some(a));
        assert_eq!(index.lookup(&pool, OrderId(2)), Some(b));
        assert_eq!(index.lookup(&pool, OrderId(3)), None);
    }

    #[test]
    fn test_duplicate_insert() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        let a = create(&mut pool, 5);
        let b = create(&mut pool, 5);

        assert_eq!(index.insert(&pool, a), InsertResult::Ok);
        assert_eq!(index.insert(&pool, b), InsertResult::Duplicate);
    }

    #[test]
    fn test_collision_probes_forward() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        // Ids congruent mod CAP all hash to slot 1.
        let a = create(&mut pool, 1);
        let b = create(&mut pool, 1 + CAP as u64);
        let c = create(&mut pool, 1 + 2 * CAP as u64);

        assert_eq!(index.insert(&pool, a), InsertResult::Ok);
        assert_eq!(index.insert(&pool, b), InsertResult::Ok);
        assert_eq!(index.insert(&pool, c), InsertResult::Ok);

        assert_eq!(index.lookup(&pool, OrderId(1)), Some(a));
        assert_eq!(index.lookup(&pool, OrderId(1 + CAP as u64)), Some(b));
        assert_eq!(index.lookup(&pool, OrderId(1 + 2 * CAP as u64)), Some(c));
    }

    #[test]
    fn test_backward_shift_preserves_chain() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        // Three colliders occupy slots 1, 2, 3.
        let a = create(&mut pool, 1);
        let b = create(&mut pool, 1 + CAP as u64);
        let c = create(&mut pool, 1 + 2 * CAP as u64);
        assert_eq!(index.insert(&pool, a), InsertResult::Ok);
        assert_eq!(index.insert(&pool, b), InsertResult::Ok);
        assert_eq!(index.insert(&pool, c), InsertResult::Ok);

        // Removing the head of the chain must not strand the others
        // behind an empty slot.
        index.remove(&pool, OrderId(1));

        assert_eq!(index.lookup(&pool, OrderId(1)), None);
        assert_eq!(index.lookup(&pool, OrderId(1 + CAP as u64)), Some(b));
        assert_eq!(index.lookup(&pool, OrderId(1 + 2 * CAP as u64)), Some(c));

        // And the survivors moved back to their natural positions.
        index.remove(&pool, OrderId(1 + CAP as u64));
        assert_eq!(index.lookup(&pool, OrderId(1 + 2 * CAP as u64)), Some(c));
    }

    #[test]
    fn test_remove_middle_of_chain() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        let a = create(&mut pool, 2);
        let b = create(&mut pool, 2 + CAP as u64);
        let c = create(&mut pool, 2 + 2 * CAP as u64);
        assert_eq!(index.insert(&pool, a), InsertResult::Ok);
        assert_eq!(index.insert(&pool, b), InsertResult::Ok);
        assert_eq!(index.insert(&pool, c), InsertResult::Ok);

        index.remove(&pool, OrderId(2 + CAP as u64));

        assert_eq!(index.lookup(&pool, OrderId(2)), Some(a));
        assert_eq!(index.lookup(&pool, OrderId(2 + CAP as u64)), None);
        assert_eq!(index.lookup(&pool, OrderId(2 + 2 * CAP as u64)), Some(c));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        let a = create(&mut pool, 1);
        assert_eq!(index.insert(&pool, a), InsertResult::Ok);

        index.remove(&pool, OrderId(99));
        assert_eq!(index.lookup(&pool, OrderId(1)), Some(a));
    }

    #[test]
    fn test_full_table_insert_and_lookup_terminate() {
        // Oversized pool so one order is left over once the table fills.
        let mut pool = OrderPool::new(CAP + 1);
        let mut index = OrderIndex::new(CAP);

        // Fill every slot with colliders so each insert probes.
        for i in 0..CAP as u64 {
            let idx = create(&mut pool, i * CAP as u64);
            assert_eq!(index.insert(&pool, idx), InsertResult::Ok);
        }

        // A lookup for an absent id must wrap and give up rather than spin.
        assert_eq!(index.lookup(&pool, OrderId(7)), None);

        // And an insert into the full table must report Full.
        let fresh = create(&mut pool, CAP as u64 * CAP as u64);
        assert_eq!(index.insert(&pool, fresh), InsertResult::Full);
    }

    #[test]
    fn test_wraparound_probing() {
        let mut pool = OrderPool::new(CAP);
        let mut index = OrderIndex::new(CAP);

        // Natural slot CAP-1; colliders must wrap to slot 0.
        let a = create(&mut pool, CAP as u64 - 1);
        let b = create(&mut pool, 2 * CAP as u64 - 1);
        assert_eq!(index.insert(&pool, a), InsertResult::Ok);
        assert_eq!(index.insert(&pool, b), InsertResult::Ok);

        assert_eq!(index.lookup(&pool, OrderId(2 * CAP as u64 - 1)), Some(b));

        index.remove(&pool, OrderId(CAP as u64 - 1));
        assert_eq!(index.lookup(&pool, OrderId(2 * CAP as u64 - 1)), Some(b));
    }
}

//! Price level - a FIFO queue of orders at a single tick.
//!
//! Implements a doubly-linked list over pool indices for O(1) append,
//! O(1) removal from the head during matching, and O(1) removal from an
//! arbitrary position on cancel. `NULL_INDEX` plays the role of the list
//! sentinel: it terminates traversal the same way on an empty level and
//! at either end of a populated one.

use crate::pool::{OrderPool, PoolIndex, NULL_INDEX};
use crate::types::Qty;

/// A queue of orders resting at one price.
///
/// Orders are consumed strictly in arrival order (price-time priority).
#[derive(Clone, Copy, Debug)]
pub struct PriceLevel {
    /// Oldest order - first to match.
    pub(crate) head: PoolIndex,
    /// Newest order - last to match.
    pub(crate) tail: PoolIndex,
    total_qty: Qty,
    count: u32,
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceLevel {
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: NULL_INDEX,
            tail: NULL_INDEX,
            total_qty: Qty(0),
            count: 0,
        }
    }

    /// True if no orders rest at this price.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of resting orders.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Total resting quantity across the level.
    #[inline]
    pub const fn qty(&self) -> Qty {
        self.total_qty
    }

    /// Index of the oldest order, `NULL_INDEX` when empty.
    #[inline]
    pub const fn front(&self) -> PoolIndex {
        self.head
    }

    /// Index of the newest order, `NULL_INDEX` when empty.
    #[inline]
    pub const fn back(&self) -> PoolIndex {
        self.tail
    }

    /// Append an order after the current tail.
    ///
    /// Adds the order's remaining quantity (at insertion) to the level
    /// total. O(1).
    #[inline]
    pub fn push_back(&mut self, pool: &mut OrderPool, index: PoolIndex) {
        let qty = pool.get(index).qty;

        if self.tail == NULL_INDEX {
            debug_assert!(self.head == NULL_INDEX);
            self.head = index;
            self.tail = index;
            let node = pool.get_mut(index);
            node.prev = NULL_INDEX;
            node.next = NULL_INDEX;
        } else {
            pool.get_mut(self.tail).next = index;
            let node = pool.get_mut(index);
            node.prev = self.tail;
            node.next = NULL_INDEX;
            self.tail = index;
        }

        self.count += 1;
        self.total_qty += qty;
    }

    /// Unlink an order from anywhere in the queue.
    ///
    /// Subtracts the order's *current* remaining quantity from the level
    /// total and clears its sibling links. The cell is not returned to
    /// the pool; the caller owns that step. O(1).
    #[inline]
    pub fn remove(&mut self, pool: &mut OrderPool, index: PoolIndex) {
        let node = pool.get(index);
        let prev_idx = node.prev;
        let next_idx = node.next;
        let qty = node.qty;

        if prev_idx == NULL_INDEX && next_idx == NULL_INDEX {
            debug_assert!(self.head == index && self.tail == index);
            self.head = NULL_INDEX;
            self.tail = NULL_INDEX;
        } else if prev_idx == NULL_INDEX {
            debug_assert!(self.head == index);
            self.head = next_idx;
            pool.get_mut(next_idx).prev = NULL_INDEX;
        } else if next_idx == NULL_INDEX {
            debug_assert!(self.tail == index);
            self.tail = prev_idx;
            pool.get_mut(prev_idx).next = NULL_INDEX;
        } else {
            pool.get_mut(prev_idx).next = next_idx;
            pool.get_mut(next_idx).prev = prev_idx;
        }

        self.count -= 1;
        self.total_qty -= qty;

        let node = pool.get_mut(index);
        node.prev = NULL_INDEX;
        node.next = NULL_INDEX;
    }

    /// Account for a partial fill of an order that stays in the queue.
    ///
    /// The matching engine adjusts the order's own quantity; this only
    /// keeps the level total in step.
    #[inline]
    pub fn reduce_qty(&mut self, amount: Qty) {
        debug_assert!(self.total_qty >= amount);
        self.total_qty -= amount;
    }
}

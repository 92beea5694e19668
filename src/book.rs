//! Order book engine - dense tick-indexed price levels with O(1)
//! best-price access and O(1) order lookup.
//!
//! Price levels live in a flat array indexed by raw tick, so finding a
//! level is a single bounds-free array walk away from the best-price
//! cursors. The cursors are exact, never approximate: whenever a
//! mutation can empty the best level, the cursor is re-advanced by a
//! linear scan until it lands on a non-empty level or leaves the valid
//! range. Crossing is resolved inside `add`, so outside a call the book
//! is never left crossed.

use crate::order_index::{InsertResult, OrderIndex};
use crate::pool::{Order, OrderPool, PoolIndex, NULL_INDEX};
use crate::price_level::PriceLevel;
use crate::types::{
    AddResult, OrdType, OrderId, Price, Qty, Side, Timestamp, DEFAULT_MAX_ORDERS,
    DEFAULT_MAX_PRICE, NO_BID,
};

/// A two-sided limit order book over integer ticks `0..=max_price`.
///
/// Single-owner, single-threaded; all capacities are fixed at
/// construction and no operation allocates after that. The level array
/// and pool are `Vec`-backed, so the aggregate's bulk lives on the heap
/// no matter where the `OrderBook` value itself is placed.
pub struct OrderBook {
    levels: Vec<PriceLevel>,

    // Best-price cursors, kept hot together. `best_bid` falls to
    // `NO_BID` and `best_ask` rises to `max_price + 1` on empty sides.
    best_bid: Price,
    best_ask: Price,
    total_orders: usize,

    pool: OrderPool,
    index: OrderIndex,

    max_price: i64,
}

impl OrderBook {
    /// Create a book accepting prices in `0..=max_price` and at most
    /// `capacity` resting orders.
    ///
    /// # Panics
    /// Panics if `max_price` is negative or `capacity` is zero.
    pub fn new(max_price: i64, capacity: u32) -> Self {
        assert!(max_price >= 0, "max_price must be non-negative");
        assert!(capacity > 0, "capacity must be non-zero");

        Self {
            levels: vec![PriceLevel::new(); (max_price + 1) as usize],
            best_bid: NO_BID,
            best_ask: Price(max_price + 1),
            total_orders: 0,
            pool: OrderPool::new(capacity),
            index: OrderIndex::new(capacity),
            max_price,
        }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Add an order.
    ///
    /// Validations run in a fixed sequence: duplicate id, then quantity,
    /// then price; the first failure wins. A crossing order is matched
    /// against the opposite side up to its own price before any resting
    /// decision. IOC and Market orders never rest. A failed add leaves
    /// the book untouched, with one deliberate exception: liquidity
    /// consumed by a crossing add is retained even if the remainder then
    /// fails to rest with `PoolExhausted`.
    pub fn add(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        qty: Qty,
        kind: OrdType,
        ts: Timestamp,
    ) -> AddResult {
        if self.index.lookup(&self.pool, id).is_some() {
            return AddResult::DuplicateId;
        }
        if qty.0 <= 0 {
            return AddResult::InvalidQty;
        }
        if price.0 < 0 || price.0 > self.max_price {
            return AddResult::InvalidPrice;
        }

        // Match if crossing, limited by the order's own price.
        let mut remaining = qty;
        match side {
            Side::Buy => {
                if price >= self.best_ask {
                    remaining = self.match_internal(side, remaining, price);
                }
            }
            Side::Sell => {
                if price <= self.best_bid {
                    remaining = self.match_internal(side, remaining, price);
                }
            }
        }

        // IOC/Market never rest.
        if matches!(kind, OrdType::IOC | OrdType::Market) {
            return AddResult::Ok;
        }

        // Fully crossed.
        if remaining.0 <= 0 {
            return AddResult::Ok;
        }

        // Rest the remainder. The original quantity recorded on the cell
        // is the remaining-after-cross amount.
        let Some(cell) = self.pool.create(id, price, remaining, side, kind, ts) else {
            return AddResult::PoolExhausted;
        };

        if self.index.insert(&self.pool, cell) != InsertResult::Ok {
            self.pool.free(cell);
            return AddResult::DuplicateId;
        }

        self.levels[price.0 as usize].push_back(&mut self.pool, cell);
        self.total_orders += 1;

        match side {
            Side::Buy => {
                if price > self.best_bid {
                    self.best_bid = price;
                }
            }
            Side::Sell => {
                if price < self.best_ask {
                    self.best_ask = price;
                }
            }
        }

        AddResult::Ok
    }

    /// Add a limit order with a zero timestamp; the common case.
    #[inline]
    pub fn add_limit(&mut self, id: OrderId, side: Side, price: Price, qty: Qty) -> AddResult {
        self.add(id, side, price, qty, OrdType::Limit, Timestamp(0))
    }

    /// Cancel a resting order. Returns `false` if the id is not resting.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        let Some(cell) = self.index.lookup(&self.pool, id) else {
            return false;
        };

        let (price, side) = {
            let o = self.pool.get(cell);
            (o.price, o.side)
        };

        self.unlink(cell);

        // Re-advance the cursor only when the best level was touched.
        match side {
            Side::Buy => {
                if price == self.best_bid {
                    self.advance_best_bid();
                }
            }
            Side::Sell => {
                if price == self.best_ask {
                    self.advance_best_ask();
                }
            }
        }

        true
    }

    /// Execute a market order for `qty` against the opposite side.
    ///
    /// Returns the unfilled remainder, which equals `qty` when the
    /// opposite side is empty.
    pub fn match_market(&mut self, aggressor: Side, qty: Qty) -> Qty {
        let limit = match aggressor {
            Side::Buy => Price(self.max_price),
            Side::Sell => Price(0),
        };
        self.match_internal(aggressor, qty, limit)
    }

    // ========================================================================
    // Matching engine
    // ========================================================================

    /// Sweep the opposite side from the best price toward `limit`.
    fn match_internal(&mut self, aggressor: Side, mut qty: Qty, limit: Price) -> Qty {
        match aggressor {
            Side::Buy => {
                while qty.0 > 0 && self.best_ask <= limit && self.best_ask.0 <= self.max_price {
                    let px = self.best_ask.0 as usize;
                    qty = self.match_level(px, qty);
                    if self.levels[px].is_empty() {
                        self.advance_best_ask();
                    }
                }
            }
            Side::Sell => {
                while qty.0 > 0 && self.best_bid >= limit && self.best_bid.0 >= 0 {
                    let px = self.best_bid.0 as usize;
                    qty = self.match_level(px, qty);
                    if self.levels[px].is_empty() {
                        self.advance_best_bid();
                    }
                }
            }
        }
        qty
    }

    /// Consume orders at one level in FIFO order until the aggressor or
    /// the level is drained.
    fn match_level(&mut self, px: usize, mut qty: Qty) -> Qty {
        while qty.0 > 0 && !self.levels[px].is_empty() {
            let front = self.levels[px].front();
            debug_assert_ne!(front, NULL_INDEX);

            let fill = qty.min(self.pool.get(front).qty);
            self.pool.get_mut(front).fill(fill);
            qty -= fill;
            self.levels[px].reduce_qty(fill);

            if self.pool.get(front).filled() {
                self.unlink(front);
            }
        }
        qty
    }

    /// Remove an order from its level, the index and the pool.
    fn unlink(&mut self, cell: PoolIndex) {
        let (id, price) = {
            let o = self.pool.get(cell);
            (o.id, o.price)
        };
        self.levels[price.0 as usize].remove(&mut self.pool, cell);
        self.index.remove(&self.pool, id);
        self.pool.free(cell);
        self.total_orders -= 1;
    }

    /// Walk the bid cursor down to the next non-empty level.
    fn advance_best_bid(&mut self) {
        while self.best_bid.0 >= 0 && self.levels[self.best_bid.0 as usize].is_empty() {
            self.best_bid.0 -= 1;
        }
    }

    /// Walk the ask cursor up to the next non-empty level.
    fn advance_best_ask(&mut self) {
        while self.best_ask.0 <= self.max_price && self.levels[self.best_ask.0 as usize].is_empty() {
            self.best_ask.0 += 1;
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Best bid price; `NO_BID` when no buy order rests.
    #[inline]
    pub fn bid(&self) -> Price {
        self.best_bid
    }

    /// Best ask price; `max_price + 1` when no sell order rests.
    #[inline]
    pub fn ask(&self) -> Price {
        self.best_ask
    }

    #[inline]
    pub fn has_bid(&self) -> bool {
        self.best_bid.0 >= 0
    }

    #[inline]
    pub fn has_ask(&self) -> bool {
        self.best_ask.0 <= self.max_price
    }

    /// True only while both sides exist and the bid reaches the ask;
    /// never true between operations.
    #[inline]
    pub fn crossed(&self) -> bool {
        self.has_bid() && self.has_ask() && self.best_bid >= self.best_ask
    }

    /// Total resting quantity at the best bid, zero when the side is empty.
    #[inline]
    pub fn bid_qty(&self) -> Qty {
        if self.best_bid.0 < 0 {
            return Qty(0);
        }
        self.levels[self.best_bid.0 as usize].qty()
    }

    /// Total resting quantity at the best ask, zero when the side is empty.
    #[inline]
    pub fn ask_qty(&self) -> Qty {
        if self.best_ask.0 > self.max_price {
            return Qty(0);
        }
        self.levels[self.best_ask.0 as usize].qty()
    }

    /// `ask - bid`, in ticks.
    #[inline]
    pub fn spread(&self) -> Price {
        self.best_ask - self.best_bid
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.total_orders
    }

    #[inline]
    pub fn pool_used(&self) -> usize {
        self.pool.used() as usize
    }

    #[inline]
    pub fn pool_capacity(&self) -> usize {
        self.pool.capacity() as usize
    }

    /// Immutable view of a resting order.
    #[inline]
    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.index.lookup(&self.pool, id).map(|cell| self.pool.get(cell))
    }

    /// Immutable view of the level at `price`.
    ///
    /// # Panics
    /// Panics if `price` is outside `0..=max_price`.
    #[inline]
    pub fn level_at(&self, price: Price) -> &PriceLevel {
        &self.levels[price.0 as usize]
    }

    /// Iterate the orders resting at `price` in FIFO order.
    pub fn iter_level(&self, price: Price) -> LevelOrders<'_> {
        LevelOrders {
            pool: &self.pool,
            cur: self.levels[price.0 as usize].front(),
        }
    }

    #[inline]
    pub fn max_price(&self) -> i64 {
        self.max_price
    }

    /// Pre-fault the pool and level pages so first use never page-faults.
    pub fn warm_up(&mut self) {
        self.pool.warm_up();
        for level in &mut self.levels {
            unsafe {
                std::ptr::write_volatile(level, *level);
            }
        }
    }
}

impl Default for OrderBook {
    /// A book with the default tick range and order capacity. Roughly
    /// 700 MB of state; construct on the heap-friendly path (e.g. inside
    /// a `Box` field) if the enclosing value is stack-bound.
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PRICE, DEFAULT_MAX_ORDERS)
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid)
            .field("best_ask", &self.best_ask)
            .field("order_count", &self.total_orders)
            .field("pool_used", &self.pool.used())
            .field("max_price", &self.max_price)
            .finish()
    }
}

/// FIFO iterator over one price level. See [`OrderBook::iter_level`].
pub struct LevelOrders<'a> {
    pool: &'a OrderPool,
    cur: PoolIndex,
}

impl<'a> Iterator for LevelOrders<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<&'a Order> {
        if self.cur == NULL_INDEX {
            return None;
        }
        let order = self.pool.get(self.cur);
        self.cur = order.next;
        Some(order)
    }
}

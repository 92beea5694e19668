//! # Tickbook
//!
//! A deterministic, single-threaded limit order book over integer ticks.
//!
//! ## Design Principles
//!
//! - **Single-Owner**: one thread owns the book exclusively (no locks)
//! - **O(1) Operations**: add, cancel and per-order matching run in
//!   constant time on the common path
//! - **Cache-Optimized**: 64-byte aligned order cells, 32-bit indices
//! - **Pooled Storage**: no heap allocation after construction
//!
//! ## Architecture
//!
//! ```text
//! add/cancel/match
//!        |
//!   [OrderBook] -- dense Vec<PriceLevel> indexed by tick
//!        |              best_bid / best_ask cursors
//!        +-- [OrderIndex]  id -> cell, linear probe, backward-shift delete
//!        +-- [OrderPool]   fixed slab of 64-byte order cells, free list
//! ```
//!
//! Prices are integer ticks in `0..=max_price`; the level array is
//! indexed directly by tick, which trades memory for a best-price scan
//! with perfectly predictable access patterns.

pub mod book;
pub mod order_index;
pub mod pool;
pub mod price_level;
pub mod types;
pub mod workload;

// Re-exports for convenience
pub use book::{LevelOrders, OrderBook};
pub use order_index::{InsertResult, OrderIndex};
pub use pool::{Order, OrderPool, PoolIndex, NULL_INDEX};
pub use price_level::PriceLevel;
pub use types::{
    AddResult, OrdType, OrderId, Price, Qty, Side, Timestamp, DEFAULT_MAX_ORDERS,
    DEFAULT_MAX_PRICE, NO_BID,
};
pub use workload::{Op, OpKind, WorkloadConfig, WorkloadGen};

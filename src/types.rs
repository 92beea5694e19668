//! Domain scalar types.
//!
//! Every scalar the book works with gets its own `#[repr(transparent)]`
//! newtype so prices, quantities, ids and timestamps cannot be mixed up
//! at a call site. The wrappers compile down to their underlying integers.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// External order identifier, assigned by the client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OrderId(pub u64);

/// Price in integer ticks.
///
/// Valid book prices are `0..=max_price`; one tick below and one tick
/// above that range serve as the empty-side sentinels for the best-price
/// cursors (see [`NO_BID`] and `OrderBook::ask`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Price(pub i64);

/// Order quantity.
///
/// Signed so that fill arithmetic may transiently pass through zero; a
/// resting order always holds a strictly positive remaining quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Qty(pub i64);

/// Submission timestamp, opaque to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Timestamp(pub u64);

impl Add for Price {
    type Output = Price;
    #[inline]
    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Price;
    #[inline]
    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

impl Add for Qty {
    type Output = Qty;
    #[inline]
    fn add(self, rhs: Qty) -> Qty {
        Qty(self.0 + rhs.0)
    }
}

impl Sub for Qty {
    type Output = Qty;
    #[inline]
    fn sub(self, rhs: Qty) -> Qty {
        Qty(self.0 - rhs.0)
    }
}

impl AddAssign for Qty {
    #[inline]
    fn add_assign(&mut self, rhs: Qty) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Qty {
    #[inline]
    fn sub_assign(&mut self, rhs: Qty) {
        self.0 -= rhs.0;
    }
}

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type determines whether unmatched quantity rests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OrdType {
    /// Rests in the book if not fully matched (default).
    #[default]
    Limit = 0,
    /// Matches up to the farthest permitted tick, never rests.
    Market = 1,
    /// Immediate-Or-Cancel: may match on entry, never rests.
    IOC = 2,
}

/// Status of an `add` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
#[repr(u8)]
pub enum AddResult {
    Ok = 0,
    DuplicateId,
    InvalidPrice,
    PoolExhausted,
    InvalidQty,
}

/// Default maximum valid tick.
pub const DEFAULT_MAX_PRICE: i64 = 1_000_000;

/// Default maximum number of resting orders.
pub const DEFAULT_MAX_ORDERS: u32 = 10_000_000;

/// Best-bid sentinel: one tick below the valid range.
pub const NO_BID: Price = Price(-1);

// The wrappers must stay zero-cost.
const _: () = assert!(std::mem::size_of::<OrderId>() == 8);
const _: () = assert!(std::mem::size_of::<Price>() == 8);
const _: () = assert!(std::mem::size_of::<Qty>() == 8);
const _: () = assert!(std::mem::size_of::<Timestamp>() == 8);
const _: () = assert!(std::mem::size_of::<Side>() == 1);
const _: () = assert!(std::mem::size_of::<OrdType>() == 1);

//! Synthetic workload generation for benchmarks and randomized tests.
//!
//! Produces a deterministic, seeded stream of add/cancel/match
//! operations with a configurable mix. Limit prices are drawn from a
//! band around a mid price, biased so bids land below it and asks
//! above; order sizes follow a heavy-tailed inverse-power curve so the
//! occasional large order sweeps several levels.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::types::{OrdType, OrderId, Price, Qty, Side, DEFAULT_MAX_PRICE};

/// Which engine entry point an [`Op`] targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OpKind {
    Add = 0,
    Cancel = 1,
    Match = 2,
}

/// One generated operation. Fields not meaningful for the kind (price
/// of a cancel, id of a match) are zeroed.
#[derive(Clone, Copy, Debug)]
pub struct Op {
    pub kind: OpKind,
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub qty: Qty,
    pub ord_type: OrdType,
}

/// Workload shape knobs.
#[derive(Clone, Copy, Debug)]
pub struct WorkloadConfig {
    /// Mid-market price the limit band is centered on.
    pub mid_price: i64,
    /// Half-width of the limit price band, in ticks.
    pub band: i64,
    /// Fraction of operations that cancel a live order.
    pub cancel_rate: f64,
    /// Fraction of non-cancel operations that are market matches.
    pub market_rate: f64,
    /// Fraction of limit adds submitted as IOC.
    pub ioc_rate: f64,
    /// Tail exponent of the order-size curve; lower means heavier tail.
    pub size_alpha: f64,
    /// Order sizes are clamped to `1..=max_qty`.
    pub max_qty: i64,
    /// Prices are clamped to `0..=max_price`.
    pub max_price: i64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            mid_price: 50_000,
            band: 200,
            cancel_rate: 0.40,
            market_rate: 0.30,
            ioc_rate: 0.10,
            size_alpha: 1.5,
            max_qty: 10_000,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

/// Deterministic operation stream.
///
/// Tracks ids of orders it believes are resting so cancels target real
/// orders; a cancelled id is dropped by swap-remove, matching the churn
/// a live gateway produces.
pub struct WorkloadGen {
    rng: ChaCha8Rng,
    cfg: WorkloadConfig,
    next_id: u64,
    active: Vec<OrderId>,
}

impl WorkloadGen {
    pub fn new(seed: u64, cfg: WorkloadConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            cfg,
            next_id: 1,
            active: Vec::new(),
        }
    }

    /// A generator over the default configuration.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, WorkloadConfig::default())
    }

    /// Draw the next operation.
    pub fn next_op(&mut self) -> Op {
        if self.rng.gen_bool(self.cfg.cancel_rate) && !self.active.is_empty() {
            return self.gen_cancel();
        }
        if self.rng.gen_bool(self.cfg.market_rate) {
            return self.gen_market();
        }
        self.gen_limit()
    }

    /// Generate `n` operations.
    pub fn generate(&mut self, n: usize) -> Vec<Op> {
        (0..n).map(|_| self.next_op()).collect()
    }

    /// Restart the stream from a seed.
    pub fn reset(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.next_id = 1;
        self.active.clear();
    }

    fn gen_limit(&mut self) -> Op {
        let id = OrderId(self.next_id);
        self.next_id += 1;

        let side = if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let ord_type = if self.rng.gen_bool(self.cfg.ioc_rate) {
            OrdType::IOC
        } else {
            self.active.push(id);
            OrdType::Limit
        };

        Op {
            kind: OpKind::Add,
            id,
            side,
            price: self.gen_price(side),
            qty: self.gen_qty(),
            ord_type,
        }
    }

    fn gen_market(&mut self) -> Op {
        Op {
            kind: OpKind::Match,
            id: OrderId(0),
            side: if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell },
            price: Price(0),
            qty: self.gen_qty(),
            ord_type: OrdType::Market,
        }
    }

    fn gen_cancel(&mut self) -> Op {
        let idx = self.rng.gen_range(0..self.active.len());
        let id = self.active.swap_remove(idx);

        Op {
            kind: OpKind::Cancel,
            id,
            side: Side::Buy,
            price: Price(0),
            qty: Qty(0),
            ord_type: OrdType::Limit,
        }
    }

    fn gen_price(&mut self, side: Side) -> Price {
        let offset = self.rng.gen_range(1..=self.cfg.band);
        let px = match side {
            Side::Buy => self.cfg.mid_price - offset,
            Side::Sell => self.cfg.mid_price + offset,
        };
        Price(px.clamp(0, self.cfg.max_price))
    }

    fn gen_qty(&mut self) -> Qty {
        // Inverse-power transform: P(X > x) = x^-alpha.
        let u: f64 = self.rng.gen();
        let size = 1.0 / u.powf(1.0 / self.cfg.size_alpha);
        Qty((size as i64).clamp(1, self.cfg.max_qty))
    }
}

//! Percentile latency report over a synthetic workload.
//!
//! Drives a seeded operation stream through the book, recording
//! per-call wall time into one histogram per operation class. Pins to
//! the last CPU core and pre-faults the book's pages before measuring.

use hdrhistogram::Histogram;
use std::time::Instant;
use tickbook::{OpKind, OrderBook, WorkloadConfig, WorkloadGen};

const WARMUP_OPS: usize = 10_000;
const BENCH_OPS: usize = 1_000_000;
const SEED: u64 = 42;

const MAX_PRICE: i64 = 100_000;
const CAPACITY: u32 = 1_000_000;

fn percentile_line(name: &str, h: &Histogram<u64>) {
    println!(
        "  {:7} p50={:<5} p90={:<5} p99={:<5} p99.9={:<5} p99.99={:<5} max={:<6} ({} ops)",
        name,
        h.value_at_quantile(0.50),
        h.value_at_quantile(0.90),
        h.value_at_quantile(0.99),
        h.value_at_quantile(0.999),
        h.value_at_quantile(0.9999),
        h.max(),
        h.len(),
    );
}

fn main() {
    println!("=== Tickbook Latency Report ===\n");

    // The last core is the one most likely to be isolated from OS noise.
    if let Some(core_ids) = core_affinity::get_core_ids() {
        if let Some(last) = core_ids.last() {
            core_affinity::set_for_current(*last);
        }
    }

    let mut book = OrderBook::new(MAX_PRICE, CAPACITY);
    println!("Pre-faulting book pages...");
    book.warm_up();

    println!("Generating {} operations...", WARMUP_OPS + BENCH_OPS);
    let cfg = WorkloadConfig {
        max_price: MAX_PRICE,
        ..WorkloadConfig::default()
    };
    let mut gen = WorkloadGen::new(SEED, cfg);
    let warmup_ops = gen.generate(WARMUP_OPS);
    let bench_ops = gen.generate(BENCH_OPS);

    println!("Warming up ({WARMUP_OPS} ops)...");
    for op in &warmup_ops {
        match op.kind {
            OpKind::Add => {
                let _ = book.add(op.id, op.side, op.price, op.qty, op.ord_type, tickbook::Timestamp(0));
            }
            OpKind::Cancel => {
                let _ = book.cancel(op.id);
            }
            OpKind::Match => {
                let _ = book.match_market(op.side, op.qty);
            }
        }
    }

    // Measure against a fresh book so warmup fills don't skew the run.
    let mut book = OrderBook::new(MAX_PRICE, CAPACITY);
    book.warm_up();

    println!("Running {BENCH_OPS} operations...\n");

    let mut add_hist = Histogram::<u64>::new_with_bounds(1, 10_000_000, 3).unwrap();
    let mut cancel_hist = Histogram::<u64>::new_with_bounds(1, 10_000_000, 3).unwrap();
    let mut match_hist = Histogram::<u64>::new_with_bounds(1, 10_000_000, 3).unwrap();

    let total_start = Instant::now();

    for op in &bench_ops {
        let start = Instant::now();
        match op.kind {
            OpKind::Add => {
                std::hint::black_box(book.add(
                    op.id,
                    op.side,
                    op.price,
                    op.qty,
                    op.ord_type,
                    tickbook::Timestamp(0),
                ));
                add_hist.record(start.elapsed().as_nanos() as u64).unwrap_or(());
            }
            OpKind::Cancel => {
                std::hint::black_box(book.cancel(op.id));
                cancel_hist.record(start.elapsed().as_nanos() as u64).unwrap_or(());
            }
            OpKind::Match => {
                std::hint::black_box(book.match_market(op.side, op.qty));
                match_hist.record(start.elapsed().as_nanos() as u64).unwrap_or(());
            }
        }
    }

    let total = total_start.elapsed();

    println!("Workload: {BENCH_OPS} operations");
    println!(
        "  Add:    {:8} ({:.1}%)",
        add_hist.len(),
        100.0 * add_hist.len() as f64 / BENCH_OPS as f64
    );
    println!(
        "  Cancel: {:8} ({:.1}%)",
        cancel_hist.len(),
        100.0 * cancel_hist.len() as f64 / BENCH_OPS as f64
    );
    println!(
        "  Match:  {:8} ({:.1}%)",
        match_hist.len(),
        100.0 * match_hist.len() as f64 / BENCH_OPS as f64
    );

    println!("\nLatency (nanoseconds):");
    percentile_line("Add:", &add_hist);
    percentile_line("Cancel:", &cancel_hist);
    percentile_line("Match:", &match_hist);

    let throughput = BENCH_OPS as f64 / total.as_secs_f64();
    println!(
        "\nThroughput: {:.2} M ops/sec ({:.1} ns/op avg)",
        throughput / 1e6,
        total.as_nanos() as f64 / BENCH_OPS as f64
    );
    println!(
        "Final book: {} resting orders, bid={:?}, ask={:?}",
        book.order_count(),
        book.bid(),
        book.ask()
    );
}

// Shared test helpers for wiring an accumulator to its queues.
//
// Every test needs the same setup: an input queue, output/error queues, a
// completion handle, and an accumulator constructed from them. This module
// keeps that wiring in one place.

use std::time::Duration;

use batch_accumulator::{AccumulatorConfig, BatchAccumulator};
use tokio::sync::{mpsc, oneshot};

/// An accumulator plus the caller-side endpoints of all its queues.
#[allow(dead_code)] // Used by other test files
pub struct Wiring<I, O, E> {
    pub accumulator: BatchAccumulator<I, O, E>,
    pub input: mpsc::Sender<I>,
    pub output: mpsc::Receiver<O>,
    pub errors: mpsc::Receiver<E>,
    pub completion: oneshot::Receiver<()>,
}

/// Wires up an accumulator with buffered queues and a completion handle.
///
/// The input queue gets room for several full batches so tests can enqueue
/// a whole scenario without blocking on the accumulator.
#[allow(dead_code)] // Used by other test files
pub fn wire<I, O, E>(batch_size: usize, tick_interval: Duration) -> Wiring<I, O, E> {
    let (input_tx, input_rx) = mpsc::channel(batch_size.max(1) * 4);
    let (output_tx, output_rx) = mpsc::channel(16);
    let (error_tx, error_rx) = mpsc::channel(16);
    let (done_tx, done_rx) = oneshot::channel();

    let accumulator = BatchAccumulator::new(AccumulatorConfig {
        batch_size,
        tick_interval,
        input: input_rx,
        output: output_tx,
        errors: error_tx,
        completion: Some(done_tx),
    });

    Wiring {
        accumulator,
        input: input_tx,
        output: output_rx,
        errors: error_rx,
        completion: done_rx,
    }
}

/// Opt-in log output for debugging failing tests (RUST_LOG=debug).
#[allow(dead_code)] // Used by other test files
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

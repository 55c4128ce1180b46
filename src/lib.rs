//! batch_accumulator: size-or-time batching for async item streams
//!
//! This library provides a single building block, [`BatchAccumulator`], that
//! reads items from an input queue, collects them into batches, and hands each
//! batch to a caller-supplied processing function either when the batch
//! reaches a configured size or when a configured interval elapses, whichever
//! comes first. Per-batch results are published on an output queue, per-batch
//! errors on a separate error queue.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use batch_accumulator::{AccumulatorConfig, BatchAccumulator};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (input_tx, input_rx) = mpsc::channel::<i64>(100);
//! let (output_tx, mut output_rx) = mpsc::channel::<i64>(16);
//! let (error_tx, _error_rx) = mpsc::channel::<String>(16);
//!
//! let mut accumulator = BatchAccumulator::new(AccumulatorConfig {
//!     batch_size: 100,
//!     tick_interval: Duration::from_secs(5),
//!     input: input_rx,
//!     output: output_tx,
//!     errors: error_tx,
//!     completion: None,
//! });
//!
//! // Each batch is summed; a real caller would amortize a network or disk
//! // round-trip here instead.
//! accumulator.set_processing_function(|_cancel, batch: Vec<i64>| async move {
//!     Ok::<_, String>(batch.iter().sum())
//! });
//!
//! let cancel = CancellationToken::new();
//! let handle = accumulator.spawn(cancel.clone());
//!
//! for n in 0..100 {
//!     input_tx.send(n).await?;
//! }
//! let sum = output_rx.recv().await.expect("one batch result");
//! assert_eq!(sum, 4950);
//!
//! cancel.cancel();
//! handle.await??;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. The accumulator loop is meant to run
//! on its own task (see [`BatchAccumulator::spawn`]) and blocks until the
//! provided cancellation token fires.

#![warn(missing_docs)]

mod accumulator;
mod config;
mod error_handling;

// Re-export public API
pub use accumulator::{BatchAccumulator, ProcessFn};
pub use config::AccumulatorConfig;
pub use error_handling::DeliveryError;

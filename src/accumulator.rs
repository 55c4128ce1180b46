// accumulator.rs
// The size-or-time accumulation/dispatch loop

use std::future::Future;
use std::mem;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::AccumulatorConfig;
use crate::error_handling::DeliveryError;

/// The stored form of a processing function.
///
/// Takes the cancellation token (so long-running batch work can observe
/// shutdown) and one batch of items, and resolves to either a result for the
/// output queue or an error for the error queue. See
/// [`BatchAccumulator::set_processing_function`] for the closure-friendly
/// setter; this alias is what it boxes into.
pub type ProcessFn<I, O, E> =
    Box<dyn FnMut(CancellationToken, Vec<I>) -> BoxFuture<'static, Result<O, E>> + Send>;

/// Groups items from an input queue into batches and flushes each batch
/// through a caller-supplied processing function.
///
/// A flush happens when the buffer reaches `batch_size` items or when
/// `tick_interval` elapses, whichever comes first. `Ok` results are written to
/// the output queue, `Err` results to the error queue. The loop exits when the
/// cancellation token fires (or the input queue closes), after one final drain
/// flush of whatever is buffered.
///
/// The loop is strictly sequential: one event at a time, at most one
/// processing-function invocation in flight, and flushed batches preserve
/// input order.
pub struct BatchAccumulator<I, O, E> {
    batch_size: usize,
    tick_interval: std::time::Duration,
    input: mpsc::Receiver<I>,
    output: mpsc::Sender<O>,
    errors: mpsc::Sender<E>,
    completion: Option<oneshot::Sender<()>>,
    process: Option<ProcessFn<I, O, E>>,
}

impl<I, O, E> BatchAccumulator<I, O, E> {
    /// Creates an accumulator from the given configuration.
    ///
    /// The configuration is taken as-is; `batch_size` and `tick_interval` are
    /// not validated (see [`AccumulatorConfig`] for the caller contract).
    pub fn new(config: AccumulatorConfig<I, O, E>) -> Self {
        BatchAccumulator {
            batch_size: config.batch_size,
            tick_interval: config.tick_interval,
            input: config.input,
            output: config.output,
            errors: config.errors,
            completion: config.completion,
            process: None,
        }
    }

    /// Sets the processing function applied to each batch, replacing any
    /// previously set function.
    ///
    /// Must be called before [`start`](Self::start). The function receives a
    /// clone of the loop's cancellation token and the batch by value, and
    /// returns `Ok` to route a result to the output queue or `Err` to route an
    /// error to the error queue.
    pub fn set_processing_function<F, Fut>(&mut self, mut function: F)
    where
        F: FnMut(CancellationToken, Vec<I>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
    {
        self.process = Some(Box::new(move |cancel, batch| function(cancel, batch).boxed()));
    }

    /// Runs the accumulation loop until the token is cancelled or the input
    /// queue closes.
    ///
    /// Intended to run on its own task (see [`spawn`](Self::spawn)); blocks
    /// the calling task for its whole lifetime. On shutdown it flushes the
    /// pending buffer one last time, closes the output and error queues so
    /// readers observe end-of-stream, and signals the completion handle if one
    /// was configured.
    ///
    /// Returns an error only if that final drain flush could not be delivered
    /// because the destination queue's receiver was already gone; mid-run
    /// delivery failures are logged and the loop keeps running.
    ///
    /// # Panics
    ///
    /// Panics if no processing function has been set. That is a broken call
    /// contract, not a runtime condition; call
    /// [`set_processing_function`](Self::set_processing_function) first.
    pub async fn start(self, cancel: CancellationToken) -> Result<(), DeliveryError> {
        let BatchAccumulator {
            batch_size,
            tick_interval,
            mut input,
            output,
            errors,
            completion,
            process,
        } = self;

        let mut process = match process {
            Some(function) => function,
            None => panic!(
                "failed to start batch accumulator: no processing function set, \
                 call set_processing_function before start"
            ),
        };

        let mut buffer: Vec<I> = Vec::with_capacity(batch_size);

        // First tick one full interval from now; a tick at startup would
        // flush an empty buffer immediately.
        let mut ticker = time::interval_at(Instant::now() + tick_interval, tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::debug!(
            "batch accumulator started (batch_size={}, tick_interval={:?})",
            batch_size,
            tick_interval
        );

        let reason = loop {
            tokio::select! {
                item = input.recv() => {
                    match item {
                        Some(item) => {
                            buffer.push(item);
                            if buffer.len() < batch_size {
                                continue;
                            }
                            let batch = mem::replace(&mut buffer, Vec::with_capacity(batch_size));
                            if let Err(e) =
                                flush(&cancel, &mut process, batch, &output, &errors).await
                            {
                                log::error!("error delivering size-triggered batch: {}", e);
                            }
                            // A full batch restarts the clock on the next
                            // time-triggered flush.
                            ticker.reset();
                        }
                        None => break "input queue closed",
                    }
                }
                _ = ticker.tick() => {
                    if buffer.is_empty() {
                        continue;
                    }
                    let batch = mem::replace(&mut buffer, Vec::with_capacity(batch_size));
                    if let Err(e) = flush(&cancel, &mut process, batch, &output, &errors).await {
                        log::error!("error delivering time-triggered batch: {}", e);
                    }
                    ticker.reset();
                }
                _ = cancel.cancelled() => break "cancellation requested",
            }
        };

        log::info!(
            "batch accumulator shutting down ({}), draining {} buffered item(s)",
            reason,
            buffer.len()
        );

        // Final drain flush runs even with an empty buffer, so the processing
        // function gets a last invocation and downstream readers see its
        // result before end-of-stream.
        let drained = flush(&cancel, &mut process, buffer, &output, &errors).await;
        if let Err(e) = &drained {
            log::error!("error delivering final batch during shutdown: {}", e);
        }

        // Dropping the senders closes both queues exactly once; readers
        // observe end-of-stream after the drained result.
        drop(output);
        drop(errors);

        if let Some(done) = completion {
            let _ = done.send(());
        }

        log::info!("batch accumulator shutdown complete");
        drained
    }

    /// Spawns [`start`](Self::start) on a new task and returns its handle.
    ///
    /// The same caller contract applies: set the processing function first,
    /// otherwise the spawned task panics.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<Result<(), DeliveryError>>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: Send + 'static,
    {
        tokio::spawn(self.start(cancel))
    }
}

/// Hands one batch to the processing function and routes the outcome.
///
/// `Ok` goes to the output queue, `Err` to the error queue, never both. The
/// queue write awaits while the destination is full, so a slow or absent
/// consumer stalls the loop here; that backpressure coupling is the caller's
/// capacity planning to get right.
async fn flush<I, O, E>(
    cancel: &CancellationToken,
    process: &mut ProcessFn<I, O, E>,
    batch: Vec<I>,
    output: &mpsc::Sender<O>,
    errors: &mpsc::Sender<E>,
) -> Result<(), DeliveryError> {
    log::debug!("flushing batch of {} item(s)", batch.len());

    match process(cancel.clone(), batch).await {
        Ok(result) => output
            .send(result)
            .await
            .map_err(|_| DeliveryError::OutputQueueClosed),
        Err(error) => errors
            .send(error)
            .await
            .map_err(|_| DeliveryError::ErrorQueueClosed),
    }
}

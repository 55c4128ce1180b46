use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

/// Configuration for a [`crate::BatchAccumulator`].
///
/// All fields are fixed once the accumulator is constructed; there is no
/// dynamic reconfiguration of the batch size or flush interval while the loop
/// runs. The three queues are caller-created so the caller picks their
/// capacities and keeps the matching endpoints.
pub struct AccumulatorConfig<I, O, E> {
    /// Maximum number of items collected before a flush is forced.
    ///
    /// Not validated; a batch size of zero is a caller contract violation and
    /// degenerates into a flush per item.
    pub batch_size: usize,
    /// Maximum time between flushes. A tick with an empty buffer is skipped.
    ///
    /// Not validated; a zero interval panics when the ticker is created.
    pub tick_interval: Duration,
    /// Queue the accumulator reads items from. The accumulator is its sole
    /// consumer.
    pub input: mpsc::Receiver<I>,
    /// Queue that receives one result per successfully processed batch.
    pub output: mpsc::Sender<O>,
    /// Queue that receives one error per failed batch.
    pub errors: mpsc::Sender<E>,
    /// Optional one-shot handle signalled exactly once when the accumulator
    /// has flushed its final batch and closed both outbound queues.
    pub completion: Option<oneshot::Sender<()>>,
}

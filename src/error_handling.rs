use thiserror::Error;

/// Errors raised when a flushed batch result cannot be handed to its queue.
///
/// Both variants mean the receiving half of the queue was dropped while the
/// accumulator was still running. Mid-run delivery failures are logged and the
/// loop keeps going; a failure during the final shutdown drain is returned
/// from [`crate::BatchAccumulator::start`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The output queue's receiver was dropped before the batch result could
    /// be delivered.
    #[error("output queue closed before batch result could be delivered")]
    OutputQueueClosed,

    /// The error queue's receiver was dropped before the batch error could be
    /// delivered.
    #[error("error queue closed before batch error could be delivered")]
    ErrorQueueClosed,
}

//! Bounded streaming channel between adapters and consumers
//!
//! Each model call spawns one producer task that pushes partial responses
//! into a bounded channel and drops the sender on completion. Consumers read
//! until `recv` returns `None`. Dropping the receiver cancels the producer
//! cooperatively: its next `send` fails and it stops emitting.

use tokio::sync::mpsc;

use crate::Response;

/// Default capacity of the per-call response channel
pub const DEFAULT_STREAM_CAPACITY: usize = 256;

/// Producer half of a response stream
pub type ResponseSender = mpsc::Sender<Response>;

/// Consumer half of a response stream
pub type ResponseReceiver = mpsc::Receiver<Response>;

/// Create a bounded response channel. A capacity of 0 falls back to
/// [`DEFAULT_STREAM_CAPACITY`].
pub fn response_channel(capacity: usize) -> (ResponseSender, ResponseReceiver) {
    let capacity = if capacity == 0 {
        DEFAULT_STREAM_CAPACITY
    } else {
        capacity
    };
    mpsc::channel(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ERROR_TYPE_API_ERROR;

    #[tokio::test]
    async fn test_channel_closes_when_sender_drops() {
        let (tx, mut rx) = response_channel(4);
        tx.send(Response::error("m", ERROR_TYPE_API_ERROR, "boom"))
            .await
            .unwrap();
        drop(tx);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_zero_capacity_falls_back_to_default() {
        let (tx, _rx) = response_channel(0);
        assert_eq!(tx.capacity(), DEFAULT_STREAM_CAPACITY);
    }
}

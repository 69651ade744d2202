//! crates/shell_io/src/buffer.rs
//! Byte queue that keeps the surplus of bounded reads.

use std::collections::VecDeque;

/// FIFO of received bytes waiting to be handed to the caller.
///
/// ```
/// use shell_io::ReceiveBuffer;
///
/// let mut buffer = ReceiveBuffer::default();
/// buffer.extend(b"Router#show ver");
/// assert_eq!(buffer.take(7), b"Router#".to_vec());
/// assert_eq!(buffer.len(), 8);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReceiveBuffer {
    bytes: VecDeque<u8>,
}

impl ReceiveBuffer {
    /// Appends bytes to the back of the queue.
    pub fn extend(&mut self, data: &[u8]) {
        self.bytes.extend(data);
    }

    /// Number of queued bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Removes and returns up to `max_bytes` bytes from the front.
    pub fn take(&mut self, max_bytes: usize) -> Vec<u8> {
        let count = max_bytes.min(self.bytes.len());
        self.bytes.drain(..count).collect()
    }

    /// Discards every queued byte.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

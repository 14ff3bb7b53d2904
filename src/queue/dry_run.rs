use std::sync::atomic::{AtomicU64, Ordering};

use super::{Destination, MessageHandle, QueueClient, TransportError};

/// Accepts every payload without sending it anywhere
#[derive(Debug, Default)]
pub struct DryRunQueue {
    sent: AtomicU64,
}

impl DryRunQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payloads accepted so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

impl QueueClient for DryRunQueue {
    fn send(&self, destination: &Destination, body: &str) -> Result<MessageHandle, TransportError> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        log::info!("Dry run: not sending to {}: {}", destination.url, body);
        Ok(MessageHandle::new(format!("dry-run-{}", n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_counts_sends() {
        let queue = DryRunQueue::new();
        let destination = Destination {
            url: "https://example.invalid".to_string(),
            region: None,
        };

        assert_eq!(queue.send(&destination, "{}").unwrap().as_str(), "dry-run-1");
        assert_eq!(queue.send(&destination, "{}").unwrap().as_str(), "dry-run-2");
        assert_eq!(queue.sent(), 2);
    }
}

//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fans a single shutdown trigger out to every running server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A handle that completes once [`Shutdown::trigger`] is called.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal(self.tx.subscribe())
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`Shutdown`].
#[derive(Debug)]
pub struct ShutdownSignal(broadcast::Receiver<()>);

impl ShutdownSignal {
    /// Wait for the trigger. A dropped coordinator counts as a trigger.
    pub async fn recv(mut self) {
        let _ = self.0.recv().await;
    }
}

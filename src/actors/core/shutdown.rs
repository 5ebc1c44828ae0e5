use tokio::sync::watch;

// ============================================================================
// Shutdown Signal
// ============================================================================
//
// One `Shutdown` owned by the coordinator, any number of listeners held by
// actors. Triggering is sticky: listeners created afterwards observe it too.
//
// ============================================================================

pub struct Shutdown {
    tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered or the `Shutdown` is gone
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_listener() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.listener();

        let waiter = tokio::spawn(async move {
            listener.cancelled().await;
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("listener was not woken")
            .unwrap();
    }

    #[tokio::test]
    async fn test_late_listener_sees_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        let mut listener = shutdown.listener();
        assert!(listener.is_shutdown());
        tokio::time::timeout(Duration::from_millis(100), listener.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_shutdown_releases_listener() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.listener();
        drop(shutdown);

        tokio::time::timeout(Duration::from_millis(100), listener.cancelled())
            .await
            .unwrap();
    }
}

use super::{Decision, Gate};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs navigations through a [`Gate`]. Starting a navigation cancels the one
/// before it, so only the latest can commit a decision.
#[derive(Debug)]
pub struct Navigator {
    gate: Arc<Gate>,
    current: Mutex<CancellationToken>,
}

impl Navigator {
    #[must_use]
    pub fn new(gate: Arc<Gate>) -> Self {
        Self {
            gate,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    #[must_use]
    pub fn gate(&self) -> &Arc<Gate> {
        &self.gate
    }

    pub async fn navigate(&self, path: &str) -> Decision {
        let token = self.begin().await;
        self.gate.check(path, &token).await
    }

    /// Cancels any in-flight navigation without starting a new one.
    pub async fn cancel(&self) {
        self.current.lock().await.cancel();
    }

    async fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.current.lock().await, token.clone());

        if !previous.is_cancelled() {
            debug!("cancelling previous navigation");
            previous.cancel();
        }

        token
    }
}

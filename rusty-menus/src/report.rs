use async_trait::async_trait;
use tracing::error;

use crate::token::MenuId;

/// Receives errors raised by button handlers.
#[async_trait]
pub trait ButtonErrorReporter: Send + Sync {
    async fn report(&self, error: anyhow::Error, menu_id: MenuId);
}

/// Logs handler errors and moves on.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

#[async_trait]
impl ButtonErrorReporter for TracingReporter {
    async fn report(&self, error: anyhow::Error, menu_id: MenuId) {
        error!(menu = %menu_id, error = ?error, "menu button handler failed");
    }
}

//! OS launchers.

use mockall::automock;
use pestitele::contact::ContactAction;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no app can open {0}")]
    Unsupported(String),
}

/// Hands an intent to the OS. Nothing is awaited.
#[automock]
pub trait Launcher: Send + Sync {
    fn launch(&self, action: &ContactAction) -> Result<(), LaunchError>;
}

/// Launcher for environments without a phone, dialer or maps app. Intents
/// are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLauncher;

impl Launcher for LoggingLauncher {
    fn launch(&self, action: &ContactAction) -> Result<(), LaunchError> {
        info!(uri = %action, "launch");

        Ok(())
    }
}

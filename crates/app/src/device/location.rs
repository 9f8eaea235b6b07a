//! Device location.

use async_trait::async_trait;
use mockall::automock;
use pestitele::geo::Coordinates;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// One-shot position lookup.
#[automock]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The device's current position.
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// A provider pinned to a configured position, or to none at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(Option<Coordinates>);

impl FixedLocation {
    #[must_use]
    pub const fn new(at: Option<Coordinates>) -> Self {
        Self(at)
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        self.0
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn fixed_location_reports_its_position() -> TestResult {
        let at = Coordinates::new(50.08, 14.44);

        assert_eq!(FixedLocation::new(Some(at)).current_location().await?, at);
        assert!(FixedLocation::default().current_location().await.is_err());

        Ok(())
    }
}

//! Contact service errors.

use pestitele::contact::ContactError;
use thiserror::Error;

use crate::device::LaunchError;

#[derive(Debug, Error)]
pub enum ContactServiceError {
    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("grower is not on the shopping list")]
    NotOnList,

    #[error("failed to open app")]
    Launch(#[from] LaunchError),
}

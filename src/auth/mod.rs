use crate::core::models::PendingLogin;
use crate::core::types::AttemptId;

pub mod access_token;
pub mod authorization;
pub mod error;

pub use access_token::*;
pub use authorization::*;
pub use error::{BeginLoginError, ErrorKind, ErrorResponse, FlowError, StoreError};

/// Server-side records of login attempts awaiting their callback.
///
/// Each record is keyed by its own attempt id so that one browser's callback
/// is only ever checked against the state issued to that browser.
pub trait AttemptStore {
    fn put_attempt(&self, attempt: PendingLogin) -> Result<(), StoreError>;
    /// Removes and returns the record. Expired records are never returned.
    fn take_attempt(&self, id: &AttemptId) -> Result<Option<PendingLogin>, StoreError>;
    /// Drops expired records, returning how many were removed.
    fn clean_up(&self) -> Result<usize, StoreError>;
}

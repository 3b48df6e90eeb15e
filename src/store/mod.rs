use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::auth::{AttemptStore, StoreError};
use crate::core::models::PendingLogin;
use crate::core::types::AttemptId;

/// In-process attempt store. Records live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    attempts: Mutex<HashMap<AttemptId, PendingLogin>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<AttemptId, PendingLogin>>, StoreError> {
        self.attempts
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}

impl AttemptStore for MemoryStore {
    fn put_attempt(&self, attempt: PendingLogin) -> Result<(), StoreError> {
        self.lock()?.insert(attempt.id.clone(), attempt);
        Ok(())
    }

    fn take_attempt(&self, id: &AttemptId) -> Result<Option<PendingLogin>, StoreError> {
        let attempt = self.lock()?.remove(id);
        Ok(attempt.filter(|a| !a.expires.is_expired()))
    }

    fn clean_up(&self) -> Result<usize, StoreError> {
        let now = SystemTime::now();
        let mut attempts = self.lock()?;
        let before = attempts.len();
        attempts.retain(|_, a| !a.expires.is_expired_at(now));
        Ok(before - attempts.len())
    }
}

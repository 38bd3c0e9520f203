//! Guard against duplicate submissions

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use crate::core::error::{ClientError, ClientResult};

/// Shared "a request is running" flag
///
/// Clones share the same flag, so a page and its modals can serialise their
/// mutating actions through one handle and the UI can poll
/// [`InFlight::is_active`] to disable buttons.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Claim the flag for `operation`
    ///
    /// Fails with [`ClientError::Busy`] while another guard is alive.
    pub fn begin(&self, operation: &str) -> ClientResult<InFlightGuard> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(operation, "rejected while another request is in flight");
            return Err(ClientError::Busy {
                operation: operation.to_string(),
            });
        }

        Ok(InFlightGuard {
            active: Arc::clone(&self.active),
        })
    }
}

/// Releases the flag when dropped
#[must_use = "the in-flight flag is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

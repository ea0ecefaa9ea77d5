//! Per-entity in-flight registry.
//!
//! Each component keeps one `InFlight` keyed by the id of the entity it acts on
//! (job id, application id, resume id). At most one operation per key can be
//! pending; different keys never block each other. The marker is released by
//! dropping the guard, so it clears on success, on error, and if the future is
//! dropped mid-request.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use crate::errors::ClientError;

#[derive(Debug)]
pub struct InFlight {
    label: &'static str,
    keys: Mutex<HashSet<String>>,
}

impl InFlight {
    /// `label` names the entity kind in errors and logs, e.g. `"job"`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            keys: Mutex::new(HashSet::new()),
        }
    }

    /// Marks `key` as in flight, or fails with `ClientError::InFlight` if it
    /// already is.
    pub fn try_acquire(&self, key: &str) -> Result<InFlightGuard<'_>, ClientError> {
        let mut keys = self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !keys.insert(key.to_string()) {
            debug!("{} {} already in flight", self.label, key);
            return Err(ClientError::InFlight {
                key: format!("{} {}", self.label, key),
            });
        }
        Ok(InFlightGuard {
            registry: self,
            key: key.to_string(),
        })
    }

    /// Whether the control for `key` should currently be disabled.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }

    pub fn pending(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn release(&self, key: &str) {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}

/// Holds one key in flight until dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    key: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::backend::Backend;
use crate::errors::ClientError;
use crate::models::profile::UserProfile;

/// Holds the user's profile in memory and persists it by whole-document replacement.
pub struct ProfileStore {
    backend: Arc<dyn Backend>,
    current: Mutex<UserProfile>,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            current: Mutex::new(UserProfile::default()),
        }
    }

    /// The in-memory copy as of the last successful `load` or `save`.
    pub fn current(&self) -> UserProfile {
        self.lock().clone()
    }

    /// Fetches the profile. A user without a stored profile gets the empty default.
    pub async fn load(&self) -> Result<UserProfile, ClientError> {
        let profile = self.backend.get_profile().await?.unwrap_or_default();
        info!(
            "Profile loaded: {} skills, {} experience entries",
            profile.skills.len(),
            profile.experience.len()
        );
        *self.lock() = profile.clone();
        Ok(profile)
    }

    /// Replaces the stored profile with `profile` in full.
    ///
    /// On failure the in-memory copy is left as it was and the error is
    /// returned as-is; nothing is retried.
    pub async fn save(&self, profile: UserProfile) -> Result<UserProfile, ClientError> {
        match self.backend.put_profile(&profile).await {
            Ok(saved) => {
                info!("Profile saved");
                *self.lock() = saved.clone();
                Ok(saved)
            }
            Err(e) => {
                warn!("Profile save failed: {e}");
                Err(e)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, UserProfile> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//! The persisted `currentStep`, i.e. the resume point carried across launches.

use std::sync::Arc;

use crate::error::DatabaseError;
use crate::store::{Database, ResolutionRecord};

use super::screen::ScreenName;

/// Settings keys used for onboarding persistence.
pub mod settings_keys {
    /// Last screen the session was routed to.
    pub const CURRENT_STEP: &str = "currentStep";
}

/// Reads and writes the `currentStep` setting for one user.
#[derive(Clone)]
pub struct StepStore {
    db: Arc<dyn Database>,
    user_id: String,
}

impl StepStore {
    pub fn new(db: Arc<dyn Database>, user_id: impl Into<String>) -> Self {
        Self {
            db,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The persisted step, if any. Values that are not JSON strings read as
    /// absent. The raw string is returned unvalidated: the resolver only
    /// compares it, and an older client may have stored a screen this build
    /// does not know.
    pub async fn load(&self) -> Result<Option<String>, DatabaseError> {
        let value = self
            .db
            .get_setting(&self.user_id, settings_keys::CURRENT_STEP)
            .await?;
        Ok(value.and_then(|v| v.as_str().map(String::from)))
    }

    pub async fn save(&self, screen: ScreenName) -> Result<(), DatabaseError> {
        self.record(screen.as_str()).await
    }

    /// Store a raw step value.
    pub async fn record(&self, step: &str) -> Result<(), DatabaseError> {
        self.db
            .set_setting(
                &self.user_id,
                settings_keys::CURRENT_STEP,
                &serde_json::Value::String(step.to_string()),
            )
            .await
    }

    /// Forget the persisted step (logout). Returns whether one existed.
    pub async fn clear(&self) -> Result<bool, DatabaseError> {
        self.db
            .delete_setting(&self.user_id, settings_keys::CURRENT_STEP)
            .await
    }

    pub async fn log_resolution(&self, record: &ResolutionRecord) -> Result<(), DatabaseError> {
        self.db.record_resolution(record).await
    }

    /// Past resolutions for this user, newest first.
    pub async fn history(&self, limit: usize) -> Result<Vec<ResolutionRecord>, DatabaseError> {
        self.db.list_resolutions(&self.user_id, limit).await
    }
}

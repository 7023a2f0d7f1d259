//! Backend-agnostic `Database` trait — single async interface for all persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DatabaseError;

/// One bootstrap decision, kept for auditing how a user moved through
/// registration.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub screen: String,
    pub rule: String,
    /// The persisted step the resolver saw, before it was overwritten.
    pub persisted_step: Option<String>,
    pub resolved_at: DateTime<Utc>,
}

impl ResolutionRecord {
    pub fn new(user_id: &str, screen: &str, rule: &str, persisted_step: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            screen: screen.to_string(),
            rule: rule.to_string(),
            persisted_step: persisted_step.map(String::from),
            resolved_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Settings ────────────────────────────────────────────────────

    /// Get a JSON setting for a user.
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Insert or replace a JSON setting for a user.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    /// Delete a setting. Returns whether a row was removed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError>;

    // ── Step resolutions ────────────────────────────────────────────

    async fn record_resolution(&self, record: &ResolutionRecord) -> Result<(), DatabaseError>;

    /// Most recent resolutions for a user, newest first.
    async fn list_resolutions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ResolutionRecord>, DatabaseError>;
}

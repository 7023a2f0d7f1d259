//! Wiring for the onboarding HTTP service.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::ProfileClient;
use crate::config::PortalConfig;
use crate::error::Result;
use crate::onboarding::{OnboardingRouteState, SessionBootstrapper, StepStore, onboarding_routes};
use crate::store::{Database, LibSqlBackend};

/// Open the step database and build the onboarding router for `config`.
pub async fn build_app(config: &PortalConfig) -> Result<Router> {
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);

    let steps = StepStore::new(db, config.user_id.clone());
    let profiles = Arc::new(ProfileClient::from_config(config));
    let bootstrapper = Arc::new(SessionBootstrapper::new(profiles, steps));

    let app = onboarding_routes(OnboardingRouteState { bootstrapper });
    Ok(app.layer(CorsLayer::permissive()))
}

/// Read the configuration from the environment.
pub fn load_config() -> Result<PortalConfig> {
    Ok(PortalConfig::from_env()?)
}

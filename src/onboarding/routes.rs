//! REST endpoints for step resolution and the persisted step.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::bootstrap::SessionBootstrapper;
use super::profile::ProfileSnapshot;
use super::resolver::StepResolver;
use super::screen::ScreenName;

/// Default and maximum page size for the history endpoint.
const HISTORY_DEFAULT_LIMIT: usize = 20;
const HISTORY_MAX_LIMIT: usize = 200;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub bootstrapper: Arc<SessionBootstrapper>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest {
    /// Raw profile JSON; interpreted leniently like a backend response.
    #[serde(default)]
    profile: serde_json::Value,
    #[serde(default)]
    persisted_step: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResolveResponse {
    screen: ScreenName,
    rule: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepBody {
    current_step: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (
        status,
        Json(serde_json::json!({"error": message.to_string()})),
    )
        .into_response()
}

/// POST /api/onboarding/resolve
///
/// Pure resolution of a caller-supplied profile. Nothing is persisted.
async fn resolve(Json(req): Json<ResolveRequest>) -> impl IntoResponse {
    let profile = ProfileSnapshot::from_response(&req.profile);
    let resolution =
        StepResolver::doctor_onboarding().evaluate(&profile, req.persisted_step.as_deref());
    Json(ResolveResponse {
        screen: resolution.screen,
        rule: resolution.rule,
    })
}

/// POST /api/onboarding/bootstrap
///
/// Fetches the configured user's profile and routes the session.
async fn bootstrap(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.bootstrapper.resolve_session().await)
}

/// GET /api/onboarding/step
async fn get_step(State(state): State<OnboardingRouteState>) -> Response {
    match state.bootstrapper.steps().load().await {
        Ok(current_step) => Json(StepBody { current_step }).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// PUT /api/onboarding/step
///
/// Records that the user moved to a screen. Only known screen names are
/// accepted; malformed bodies get the same JSON error shape.
async fn put_step(
    State(state): State<OnboardingRouteState>,
    body: Result<Json<StepBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let Some(raw) = body.current_step else {
        return error_response(StatusCode::BAD_REQUEST, "currentStep is required");
    };
    let screen = match raw.parse::<ScreenName>() {
        Ok(screen) => screen,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    match state.bootstrapper.steps().save(screen).await {
        Ok(()) => Json(StepBody {
            current_step: Some(screen.to_string()),
        })
        .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// DELETE /api/onboarding/step
async fn clear_step(State(state): State<OnboardingRouteState>) -> Response {
    match state.bootstrapper.steps().clear().await {
        Ok(cleared) => Json(serde_json::json!({"cleared": cleared})).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// GET /api/onboarding/history?limit=N
async fn history(
    State(state): State<OnboardingRouteState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(HISTORY_DEFAULT_LIMIT)
        .min(HISTORY_MAX_LIMIT);
    match state.bootstrapper.steps().history(limit).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/resolve", post(resolve))
        .route("/api/onboarding/bootstrap", post(bootstrap))
        .route(
            "/api/onboarding/step",
            get(get_step).put(put_step).delete(clear_step),
        )
        .route("/api/onboarding/history", get(history))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::error::ProfileError;
    use crate::onboarding::bootstrap::ProfileSource;
    use crate::onboarding::steps::StepStore;
    use crate::store::{Database, LibSqlBackend, ResolutionRecord};

    struct FixedProfile(Value);

    #[async_trait]
    impl ProfileSource for FixedProfile {
        async fn fetch_profile(&self) -> Result<ProfileSnapshot, ProfileError> {
            Ok(ProfileSnapshot::from_response(&self.0))
        }
    }

    async fn app(profile: Value) -> Router {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let steps = StepStore::new(db, "doc1");
        let bootstrapper =
            Arc::new(SessionBootstrapper::new(Arc::new(FixedProfile(profile)), steps));
        onboarding_routes(OnboardingRouteState { bootstrapper })
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn resolve_is_pure() {
        let app = app(json!({})).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/onboarding/resolve",
            Some(json!({
                "profile": {"role": "doctor", "status": "approved", "isFirstLogin": true},
                "persistedStep": null
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"screen": "AccountVerified", "rule": "approved_first_login"}));

        let (_, step) = call(&app, Method::GET, "/api/onboarding/step", None).await;
        assert_eq!(step, json!({"currentStep": null}));
    }

    #[tokio::test]
    async fn resolve_honours_persisted_step() {
        let app = app(json!({})).await;
        let (_, body) = call(
            &app,
            Method::POST,
            "/api/onboarding/resolve",
            Some(json!({
                "profile": {"role": "doctor", "status": "pending"},
                "persistedStep": "ProfileReview"
            })),
        )
        .await;
        assert_eq!(body["screen"], "ProfileReview");
    }

    #[tokio::test]
    async fn bootstrap_persists_and_reports() {
        let app = app(json!({"data": {"role": "doctor", "status": "pending"}})).await;
        let (status, body) = call(&app, Method::POST, "/api/onboarding/bootstrap", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"outcome": "navigate", "screen": "PersonalInfo", "rule": "personal_info_missing"})
        );

        let (_, step) = call(&app, Method::GET, "/api/onboarding/step", None).await;
        assert_eq!(step["currentStep"], "PersonalInfo");

        let (_, history) = call(&app, Method::GET, "/api/onboarding/history", None).await;
        let records = history.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["screen"], "PersonalInfo");
        assert_eq!(records[0]["userId"], "doc1");
    }

    #[tokio::test]
    async fn put_step_validates_screen_name() {
        let app = app(json!({})).await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/onboarding/step",
            Some(json!({"currentStep": "Checkout"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Checkout"));

        let (status, _) = call(&app, Method::PUT, "/api/onboarding/step", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/onboarding/step",
            Some(json!({"currentStep": "KYCDetailsScreen"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentStep"], "KYCDetailsScreen");
    }

    #[tokio::test]
    async fn put_step_rejects_malformed_body_as_json() {
        let app = app(json!({})).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/onboarding/step",
            Some(json!({"currentStep": 42})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, step) = call(&app, Method::GET, "/api/onboarding/step", None).await;
        assert_eq!(step, json!({"currentStep": null}));
    }

    #[tokio::test]
    async fn history_limit_defaults_and_clamps() {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        for _ in 0..HISTORY_MAX_LIMIT + 5 {
            let record = ResolutionRecord::new("doc1", "Practice", "practice_missing", None);
            db.record_resolution(&record).await.unwrap();
        }
        let steps = StepStore::new(db, "doc1");
        let bootstrapper =
            Arc::new(SessionBootstrapper::new(Arc::new(FixedProfile(json!({}))), steps));
        let app = onboarding_routes(OnboardingRouteState { bootstrapper });

        let count = |body: Value| body.as_array().map(Vec::len).unwrap_or_default();

        let (_, body) = call(&app, Method::GET, "/api/onboarding/history", None).await;
        assert_eq!(count(body), HISTORY_DEFAULT_LIMIT);

        let (_, body) = call(&app, Method::GET, "/api/onboarding/history?limit=3", None).await;
        assert_eq!(count(body), 3);

        let (_, body) = call(&app, Method::GET, "/api/onboarding/history?limit=1000", None).await;
        assert_eq!(count(body), HISTORY_MAX_LIMIT);
    }

    #[tokio::test]
    async fn delete_step_clears_it() {
        let app = app(json!({})).await;
        call(
            &app,
            Method::PUT,
            "/api/onboarding/step",
            Some(json!({"currentStep": "ProfileReview"})),
        )
        .await;

        let (_, body) = call(&app, Method::DELETE, "/api/onboarding/step", None).await;
        assert_eq!(body, json!({"cleared": true}));
        let (_, body) = call(&app, Method::DELETE, "/api/onboarding/step", None).await;
        assert_eq!(body, json!({"cleared": false}));
    }
}

//! Session bootstrap, run once per login or app launch.
//!
//! Fetches the profile, reads the persisted step, resolves the next screen,
//! persists it, then navigates. Persisting happens before navigation so the
//! next launch always sees the step this one routed to.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ProfileError;
use crate::store::ResolutionRecord;

use super::profile::ProfileSnapshot;
use super::resolver::StepResolver;
use super::screen::ScreenName;
use super::steps::StepStore;

/// Source of the logged-in doctor's profile.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self) -> Result<ProfileSnapshot, ProfileError>;
}

/// UI navigation sink. Treated as infallible.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, screen: ScreenName, params: Option<serde_json::Value>);

    async fn redirect_to_login(&self);
}

/// Where a bootstrapped session should go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    Navigate {
        screen: ScreenName,
        rule: &'static str,
    },
    RedirectToLogin {
        reason: String,
    },
}

/// Drives the resolver with real I/O on either side.
pub struct SessionBootstrapper {
    profiles: Arc<dyn ProfileSource>,
    steps: StepStore,
    resolver: StepResolver,
}

impl SessionBootstrapper {
    pub fn new(profiles: Arc<dyn ProfileSource>, steps: StepStore) -> Self {
        Self {
            profiles,
            steps,
            resolver: StepResolver::doctor_onboarding(),
        }
    }

    pub fn steps(&self) -> &StepStore {
        &self.steps
    }

    /// Fetch, resolve, and persist without navigating.
    pub async fn resolve_session(&self) -> BootstrapOutcome {
        let profile = match self.profiles.fetch_profile().await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(
                    user_id = %self.steps.user_id(),
                    error = %e,
                    "Profile fetch failed, redirecting to login"
                );
                return BootstrapOutcome::RedirectToLogin {
                    reason: e.to_string(),
                };
            }
        };

        let persisted = match self.steps.load().await {
            Ok(step) => step,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted step, resolving without it");
                None
            }
        };

        let resolution = self.resolver.evaluate(&profile, persisted.as_deref());

        if let Err(e) = self.steps.save(resolution.screen).await {
            warn!(screen = %resolution.screen, error = %e, "Failed to persist resolved step");
        }

        let record = ResolutionRecord::new(
            self.steps.user_id(),
            resolution.screen.as_str(),
            resolution.rule,
            persisted.as_deref(),
        );
        if let Err(e) = self.steps.log_resolution(&record).await {
            warn!(error = %e, "Failed to record step resolution");
        }

        info!(
            user_id = %self.steps.user_id(),
            screen = %resolution.screen,
            rule = resolution.rule,
            previous_step = ?persisted,
            "Session bootstrapped"
        );

        BootstrapOutcome::Navigate {
            screen: resolution.screen,
            rule: resolution.rule,
        }
    }

    /// Resolve the session and hand the result to the navigator.
    pub async fn run(&self, navigator: &dyn Navigator) -> BootstrapOutcome {
        let outcome = self.resolve_session().await;
        match &outcome {
            BootstrapOutcome::Navigate { screen, .. } => navigator.navigate(*screen, None).await,
            BootstrapOutcome::RedirectToLogin { .. } => navigator.redirect_to_login().await,
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::store::{Database, LibSqlBackend};

    /// Serves a fixed body, or rejects the session when there is none.
    struct StubProfiles(Option<serde_json::Value>);

    #[async_trait]
    impl ProfileSource for StubProfiles {
        async fn fetch_profile(&self) -> Result<ProfileSnapshot, ProfileError> {
            match &self.0 {
                Some(body) => Ok(ProfileSnapshot::from_response(body)),
                None => Err(ProfileError::Unauthorized),
            }
        }
    }

    /// Records every navigation along with the step persisted at that moment.
    struct RecordingNavigator {
        steps: StepStore,
        calls: Mutex<Vec<(Option<ScreenName>, Option<String>)>>,
    }

    impl RecordingNavigator {
        fn new(steps: StepStore) -> Self {
            Self {
                steps,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Navigator for RecordingNavigator {
        async fn navigate(&self, screen: ScreenName, _params: Option<serde_json::Value>) {
            let persisted = self.steps.load().await.unwrap();
            self.calls.lock().unwrap().push((Some(screen), persisted));
        }

        async fn redirect_to_login(&self) {
            let persisted = self.steps.load().await.unwrap();
            self.calls.lock().unwrap().push((None, persisted));
        }
    }

    async fn store() -> StepStore {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        StepStore::new(db, "doc1")
    }

    fn bootstrapper(body: serde_json::Value, steps: StepStore) -> SessionBootstrapper {
        SessionBootstrapper::new(Arc::new(StubProfiles(Some(body))), steps)
    }

    fn registered_doctor() -> serde_json::Value {
        json!({
            "role": "doctor",
            "status": "pending",
            "firstname": "Asha",
            "lastname": "Rao",
            "email": "asha@clinic.in",
            "medicalRegistrationNumber": "MCI-1001",
            "specialization": {"name": "Cardiology"},
            "addresses": [{"clinicName": "Heart Care"}],
            "consultationModeFee": [{"mode": "online"}]
        })
    }

    #[tokio::test]
    async fn fetch_failure_redirects_to_login_without_persisting() {
        let steps = store().await;
        let boot = SessionBootstrapper::new(Arc::new(StubProfiles(None)), steps.clone());
        let nav = RecordingNavigator::new(steps.clone());

        let outcome = boot.run(&nav).await;
        assert!(matches!(outcome, BootstrapOutcome::RedirectToLogin { .. }));
        assert_eq!(*nav.calls.lock().unwrap(), vec![(None, None)]);
        assert!(steps.history(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn step_is_persisted_before_navigation() {
        let steps = store().await;
        let boot = bootstrapper(registered_doctor(), steps.clone());
        let nav = RecordingNavigator::new(steps.clone());

        let outcome = boot.run(&nav).await;
        assert_eq!(
            outcome,
            BootstrapOutcome::Navigate {
                screen: ScreenName::FinancialSetupScreen,
                rule: "bank_details_missing"
            }
        );
        assert_eq!(
            *nav.calls.lock().unwrap(),
            vec![(
                Some(ScreenName::FinancialSetupScreen),
                Some("FinancialSetupScreen".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn second_launch_skips_financial_setup() {
        let steps = store().await;
        let boot = bootstrapper(registered_doctor(), steps.clone());

        let first = boot.resolve_session().await;
        assert!(matches!(
            first,
            BootstrapOutcome::Navigate { screen: ScreenName::FinancialSetupScreen, .. }
        ));

        // Bank details still missing, but a step is now persisted.
        let second = boot.resolve_session().await;
        assert!(matches!(
            second,
            BootstrapOutcome::Navigate { screen: ScreenName::KycDetailsScreen, .. }
        ));

        let history = steps.history(10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].persisted_step.as_deref(), Some("FinancialSetupScreen"));
    }

    #[tokio::test]
    async fn parked_review_survives_incomplete_profile() {
        let steps = store().await;
        steps.save(ScreenName::ProfileReview).await.unwrap();
        let boot = bootstrapper(json!({"role": "doctor", "status": "pending"}), steps.clone());

        let outcome = boot.resolve_session().await;
        assert_eq!(
            outcome,
            BootstrapOutcome::Navigate {
                screen: ScreenName::ProfileReview,
                rule: "parked_at_review"
            }
        );
        assert_eq!(steps.load().await.unwrap().as_deref(), Some("ProfileReview"));
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let nav = serde_json::to_value(BootstrapOutcome::Navigate {
            screen: ScreenName::KycDetailsScreen,
            rule: "kyc_missing",
        })
        .unwrap();
        assert_eq!(
            nav,
            json!({"outcome": "navigate", "screen": "KYCDetailsScreen", "rule": "kyc_missing"})
        );

        let redirect = serde_json::to_value(BootstrapOutcome::RedirectToLogin {
            reason: "expired".into(),
        })
        .unwrap();
        assert_eq!(redirect, json!({"outcome": "redirect_to_login", "reason": "expired"}));
    }
}

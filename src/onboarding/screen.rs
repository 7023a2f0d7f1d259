//! Destination screens the step resolver can route a doctor to.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OnboardingError;

/// The closed set of screens a session can land on after login.
///
/// The string forms are the route names the mobile shell navigates to and
/// the values persisted under `currentStep`, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenName {
    DoctorDashboard,
    AccountVerified,
    ProfileReview,
    PersonalInfo,
    Specialization,
    Practice,
    ConsultationPreferences,
    FinancialSetupScreen,
    #[serde(rename = "KYCDetailsScreen")]
    KycDetailsScreen,
    ConfirmationScreen,
}

impl ScreenName {
    /// Every screen, dashboard first then the registration checklist.
    pub const ALL: [ScreenName; 10] = [
        Self::DoctorDashboard,
        Self::AccountVerified,
        Self::ProfileReview,
        Self::PersonalInfo,
        Self::Specialization,
        Self::Practice,
        Self::ConsultationPreferences,
        Self::FinancialSetupScreen,
        Self::KycDetailsScreen,
        Self::ConfirmationScreen,
    ];

    /// The registration checklist, in the order a new doctor walks it.
    pub const REGISTRATION_STEPS: [ScreenName; 7] = [
        Self::PersonalInfo,
        Self::Specialization,
        Self::Practice,
        Self::ConsultationPreferences,
        Self::FinancialSetupScreen,
        Self::KycDetailsScreen,
        Self::ConfirmationScreen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoctorDashboard => "DoctorDashboard",
            Self::AccountVerified => "AccountVerified",
            Self::ProfileReview => "ProfileReview",
            Self::PersonalInfo => "PersonalInfo",
            Self::Specialization => "Specialization",
            Self::Practice => "Practice",
            Self::ConsultationPreferences => "ConsultationPreferences",
            Self::FinancialSetupScreen => "FinancialSetupScreen",
            Self::KycDetailsScreen => "KYCDetailsScreen",
            Self::ConfirmationScreen => "ConfirmationScreen",
        }
    }

    /// Whether this screen is one of the registration checklist steps.
    pub fn is_registration_step(&self) -> bool {
        Self::REGISTRATION_STEPS.contains(self)
    }
}

impl std::fmt::Display for ScreenName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenName {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| OnboardingError::UnknownScreen(s.to_string()))
    }
}

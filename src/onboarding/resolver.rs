//! Post-login step resolver.
//!
//! Decides which screen a freshly bootstrapped session lands on. The
//! decision is an ordered rule table evaluated top to bottom; the first rule
//! whose predicate holds picks the screen. Rule order is load-bearing:
//!
//! 1. non-doctor accounts → dashboard
//! 2. approved, first login → account verified
//! 3. approved, returning → dashboard
//! 4. parked at `ProfileReview` → stays there
//! 5–10. first missing registration section → that section's screen
//! 11–12. status-specific terminal screens
//! 13. anything else → profile review
//!
//! The financial setup gate only fires when no step has been persisted yet:
//! a doctor who moved past it once is never sent back, bank details or not.
//! The `ProfileReview` park is checked before the registration checklist, so
//! a profile that becomes incomplete again does not re-enter registration.

use tracing::debug;

use super::profile::{AccountStatus, ProfileSnapshot, is_filled};
use super::screen::ScreenName;

/// Inputs a rule predicate sees.
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    pub profile: &'a ProfileSnapshot,
    /// Last step persisted by the caller, if any.
    pub persisted_step: Option<&'a str>,
}

impl StepInput<'_> {
    /// `None` and the empty string both count as "nothing persisted".
    fn has_persisted_step(&self) -> bool {
        is_filled(self.persisted_step)
    }
}

/// A single routing rule.
#[derive(Debug, Clone, Copy)]
pub struct StepRule {
    /// Stable identifier, reported in resolutions and logs.
    pub name: &'static str,
    pub applies: fn(&StepInput<'_>) -> bool,
    pub screen: ScreenName,
}

/// Outcome of a resolution: the screen and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub screen: ScreenName,
    pub rule: &'static str,
}

/// Rule name reported when no rule in the table matched.
pub const FALLBACK_RULE: &str = "default_review";

/// Ordered rule table with a fallback screen.
pub struct StepResolver {
    rules: Vec<StepRule>,
    fallback: ScreenName,
}

impl Default for StepResolver {
    fn default() -> Self {
        Self::doctor_onboarding()
    }
}

impl StepResolver {
    /// The doctor registration flow.
    pub fn doctor_onboarding() -> Self {
        let rules = vec![
            StepRule {
                name: "non_doctor",
                applies: |i| !i.profile.is_doctor(),
                screen: ScreenName::DoctorDashboard,
            },
            StepRule {
                name: "approved_first_login",
                applies: |i| {
                    i.profile.has_status(&AccountStatus::Approved)
                        && i.profile.is_first_login == Some(true)
                },
                screen: ScreenName::AccountVerified,
            },
            StepRule {
                name: "approved_returning",
                applies: |i| {
                    i.profile.has_status(&AccountStatus::Approved)
                        && i.profile.is_first_login == Some(false)
                },
                screen: ScreenName::DoctorDashboard,
            },
            StepRule {
                name: "parked_at_review",
                applies: |i| i.persisted_step == Some(ScreenName::ProfileReview.as_str()),
                screen: ScreenName::ProfileReview,
            },
            StepRule {
                name: "personal_info_missing",
                applies: |i| !i.profile.has_personal_info(),
                screen: ScreenName::PersonalInfo,
            },
            StepRule {
                name: "specialization_missing",
                applies: |i| !i.profile.has_specialization(),
                screen: ScreenName::Specialization,
            },
            StepRule {
                name: "practice_missing",
                applies: |i| !i.profile.has_practice(),
                screen: ScreenName::Practice,
            },
            StepRule {
                name: "consultation_fees_missing",
                applies: |i| !i.profile.has_consultation_fees(),
                screen: ScreenName::ConsultationPreferences,
            },
            StepRule {
                name: "bank_details_missing",
                applies: |i| !i.profile.has_bank_details() && !i.has_persisted_step(),
                screen: ScreenName::FinancialSetupScreen,
            },
            StepRule {
                name: "kyc_missing",
                applies: |i| !i.profile.has_kyc_details(),
                screen: ScreenName::KycDetailsScreen,
            },
            StepRule {
                name: "awaiting_approval",
                applies: |i| i.profile.has_status(&AccountStatus::Pending),
                screen: ScreenName::ConfirmationScreen,
            },
            StepRule {
                name: "inactive_review",
                applies: |i| i.profile.has_status(&AccountStatus::Inactive),
                screen: ScreenName::ProfileReview,
            },
        ];

        Self {
            rules,
            fallback: ScreenName::ProfileReview,
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[StepRule] {
        &self.rules
    }

    /// Evaluate the rule table. Always produces exactly one screen.
    pub fn evaluate(&self, profile: &ProfileSnapshot, persisted_step: Option<&str>) -> Resolution {
        let input = StepInput {
            profile,
            persisted_step,
        };

        for rule in &self.rules {
            if (rule.applies)(&input) {
                debug!(
                    rule = rule.name,
                    screen = %rule.screen,
                    persisted_step = ?persisted_step,
                    "Step rule matched"
                );
                return Resolution {
                    screen: rule.screen,
                    rule: rule.name,
                };
            }
        }

        debug!(
            screen = %self.fallback,
            status = ?profile.status,
            "No step rule matched, using fallback"
        );
        Resolution {
            screen: self.fallback,
            rule: FALLBACK_RULE,
        }
    }
}

/// Resolve the next screen for a profile with the doctor onboarding rules.
pub fn resolve_next_step(profile: &ProfileSnapshot, persisted_step: Option<&str>) -> ScreenName {
    StepResolver::doctor_onboarding()
        .evaluate(profile, persisted_step)
        .screen
}

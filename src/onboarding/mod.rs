//! Doctor onboarding: post-login routing through the registration checklist.
//!
//! A doctor registers in steps (personal info, specialization, practice,
//! consultation fees, bank details, KYC) and then waits for an administrator
//! to approve the account. Every login or app launch decides where the
//! session lands: the first unfinished step, a review/confirmation screen,
//! or the dashboard.

pub mod bootstrap;
pub mod profile;
pub mod resolver;
pub mod routes;
pub mod screen;
pub mod steps;

pub use bootstrap::{BootstrapOutcome, Navigator, ProfileSource, SessionBootstrapper};
pub use profile::{AccountStatus, BankDetails, ProfileSnapshot, Role, Specialization};
pub use resolver::{Resolution, StepResolver, resolve_next_step};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use screen::ScreenName;
pub use steps::StepStore;

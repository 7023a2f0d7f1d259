//! Error types for the doctor portal.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors fetching the doctor's profile from the portal backend.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile request failed to send: {0}")]
    Transport(String),

    #[error("Profile request rejected: session is not authorized")]
    Unauthorized,

    #[error("Profile request returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Invalid profile response: {0}")]
    InvalidResponse(String),
}

/// Onboarding input errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Unknown screen name: {0}")]
    UnknownScreen(String),
}

/// Result type alias for the portal.
pub type Result<T> = std::result::Result<T, Error>;

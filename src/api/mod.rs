//! Clients for the portal REST backend.

pub mod profile;

pub use profile::ProfileClient;

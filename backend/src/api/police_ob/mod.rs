//! Police-OB track API: verification and fast-track onboarding.

pub mod handlers;
pub mod routes;

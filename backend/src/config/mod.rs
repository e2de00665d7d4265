//! Central module for application-wide configuration settings.
//!
//! Configuration is read once from the environment at startup. Every value
//! has a development default; defaulted values are logged so a misconfigured
//! deployment is visible in the startup output.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};

/// Signing secret used when `JWT_SECRET` is unset. Fine for local
/// development, unacceptable in production; `from_env` warns loudly.
const DEV_FALLBACK_SECRET: &str = "fallback-secret-for-development";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    /// Payment provider key; optional because most deployments handle
    /// payments in a separate service.
    pub stripe_secret_key: Option<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let production = matches!(
            env::var("APP_ENV").as_deref(),
            Ok("production") | Ok("prod")
        );

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if production {
                warn!("JWT_SECRET not set in production; using the insecure development fallback");
            } else {
                info!("JWT_SECRET not set, using development fallback");
            }
            DEV_FALLBACK_SECRET.to_string()
        });

        Config {
            port: try_load("PORT", "3000"),
            mongodb_uri: try_load("MONGODB_URI", "mongodb://localhost:27017"),
            database_name: try_load("MONGODB_DATABASE", "academy"),
            jwt_secret,
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            production,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| warn!("Invalid {key} value: {e}"))
        .expect("Environment misconfigured!")
}

use chrono_tz::Tz;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub timezone: Tz,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://court-booking.db?mode=rwc".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            timezone: env::var("BUSINESS_TIMEZONE")
                .unwrap_or_else(|_| "UTC".to_string())
                .parse()
                .expect("BUSINESS_TIMEZONE must be an IANA timezone name"),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// In-memory configuration used by tests and throw-away instances.
    pub fn in_memory() -> Self {
        Self {
            database_url: "memory://".to_string(),
            port: 0,
            timezone: chrono_tz::UTC,
            seed_demo_data: false,
        }
    }
}

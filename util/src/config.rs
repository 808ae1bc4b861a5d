//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and per-field setters for overrides in tests.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Every this many late marks count as one effective absence.
    pub late_penalty_group_size: u32,
    /// Rotating QR token lifetime before a status check triggers rotation.
    pub token_rotation_seconds: i64,
    /// Geofence radius applied when a session has coordinates but no radius.
    pub default_geofence_radius_meters: f64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "rollcall".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/rollcall.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-in-prod".into()),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("JWT_DURATION_MINUTES must be a number"),
            late_penalty_group_size: env::var("LATE_PENALTY_GROUP_SIZE")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .expect("LATE_PENALTY_GROUP_SIZE must be a number"),
            token_rotation_seconds: env::var("TOKEN_ROTATION_SECONDS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("TOKEN_ROTATION_SECONDS must be a number"),
            default_geofence_radius_meters: env::var("DEFAULT_GEOFENCE_RADIUS_METERS")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .expect("DEFAULT_GEOFENCE_RADIUS_METERS must be a number"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Reloads the configuration from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    pub fn set_database_path(value: impl Into<String>) {
        Self::set_field(|c| c.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        Self::set_field(|c| c.jwt_secret = value.into());
    }

    pub fn set_late_penalty_group_size(value: u32) {
        Self::set_field(|c| c.late_penalty_group_size = value);
    }

    pub fn set_token_rotation_seconds(value: i64) {
        Self::set_field(|c| c.token_rotation_seconds = value);
    }
}

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn late_penalty_group_size() -> u32 {
    AppConfig::global().late_penalty_group_size
}

pub fn token_rotation_seconds() -> i64 {
    AppConfig::global().token_rotation_seconds
}

pub fn default_geofence_radius_meters() -> f64 {
    AppConfig::global().default_geofence_radius_meters
}

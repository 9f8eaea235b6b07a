//! App configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::store::SupabaseConfig;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Backend settings.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: String,

    /// Storage bucket for photos
    #[arg(long, env = "SUPABASE_STORAGE_BUCKET", default_value = "fotky")]
    pub storage_bucket: String,
}

impl BackendConfig {
    /// Client settings for [`crate::store::SupabaseStore`].
    pub fn supabase(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.supabase_url.clone(),
            anon_key: self.supabase_anon_key.clone(),
            storage_bucket: self.storage_bucket.clone(),
        }
    }
}

/// Device settings.
#[derive(Debug, Args)]
pub struct DeviceConfig {
    /// File holding the persisted session and customer identity
    #[arg(long, env = "DEVICE_STORAGE_PATH", default_value = ".pestitele/storage.json")]
    pub storage_path: PathBuf,
}

/// Pěstitelé app configuration
#[derive(Debug, Parser)]
#[command(name = "pestitele", about = "Pěstitelé marketplace", long_about = None)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Backend settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Device settings.
    #[command(flatten)]
    pub device: DeviceConfig,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse_from(["pestitele"])
    }
}

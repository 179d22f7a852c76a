use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::types::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_path_style: bool,
    pub upload_url_expiry_secs: u32,
    pub allowed_extensions: Vec<String>,
}

// Keeps the secret key out of startup logs.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_access_key_id", &self.s3_access_key_id)
            .field("s3_secret_access_key", &self.s3_secret_access_key.as_ref().map(|_| "***"))
            .field("s3_endpoint", &self.s3_endpoint)
            .field("s3_path_style", &self.s3_path_style)
            .field("upload_url_expiry_secs", &self.upload_url_expiry_secs)
            .field("allowed_extensions", &self.allowed_extensions)
            .finish()
    }
}

pub const DEFAULT_PORT: u16 = 2000;
pub const DEFAULT_S3_REGION: &str = "ap-southeast-2";
pub const DEFAULT_UPLOAD_URL_EXPIRY_SECS: u32 = 3600;
/// SigV4 presigned URLs are valid for at most one week.
pub const MAX_UPLOAD_URL_EXPIRY_SECS: u32 = 604_800;
pub const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp,avif";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so tests don't
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let upload_url_expiry_secs: u32 = var_or(
            "UPLOAD_URL_EXPIRY_SECS",
            &DEFAULT_UPLOAD_URL_EXPIRY_SECS.to_string(),
        )
        .parse()
        .context("UPLOAD_URL_EXPIRY_SECS must be an integer")?;
        if !(1..=MAX_UPLOAD_URL_EXPIRY_SECS).contains(&upload_url_expiry_secs) {
            return Err(AppError::Config(format!(
                "UPLOAD_URL_EXPIRY_SECS must be between 1 and {}, got {}",
                MAX_UPLOAD_URL_EXPIRY_SECS, upload_url_expiry_secs
            ))
            .into());
        }

        Ok(Self {
            server: ServerConfig {
                port: var_or("PORT", &DEFAULT_PORT.to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var_or("HOST", "0.0.0.0"),
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: var_or("DB_MAX_CONNECTIONS", "10")
                    .parse()
                    .context("DB_MAX_CONNECTIONS must be an integer")?,
                min_connections: var_or("DB_MIN_CONNECTIONS", "1")
                    .parse()
                    .context("DB_MIN_CONNECTIONS must be an integer")?,
            },
            storage: StorageConfig {
                s3_bucket: required("S3_BUCKET_NAME")?,
                s3_region: var_or("S3_REGION", DEFAULT_S3_REGION),
                s3_access_key_id: lookup("AWS_ACCESS_KEY"),
                s3_secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
                s3_endpoint: lookup("S3_ENDPOINT").filter(|v| !v.is_empty()),
                s3_path_style: var_or("S3_PATH_STYLE", "false")
                    .parse()
                    .context("S3_PATH_STYLE must be true or false")?,
                upload_url_expiry_secs,
                allowed_extensions: var_or("UPLOAD_ALLOWED_EXTENSIONS", DEFAULT_ALLOWED_EXTENSIONS)
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        })
    }
}

//! Configuration module
//!
//! This module provides the configuration structure for the service,
//! including platform credentials, storage roots, per-category size
//! ceilings, and staging reaper settings.

use std::env;

use crate::media::MediaCategory;

// Defaults
const SERVER_PORT: u16 = 3001;
const MAX_IMAGE_SIZE_MB: u64 = 1;
const MAX_VIDEO_SIZE_MB: u64 = 50;
const MAX_FILE_SIZE_MB: u64 = 20;
const MAX_DEFAULT_SIZE_MB: u64 = 10;
const STAGING_MAX_AGE_MINUTES: u64 = 5;
const REAPER_INTERVAL_SECS: u64 = 120;
const CONTENT_API_BASE: &str = "https://api-data.line.me/v2/bot/message";

/// Application configuration, constructed once at startup and threaded
/// through component constructors.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Shared secret used to verify webhook signatures.
    pub channel_secret: String,
    /// Bearer credential for the platform content API.
    pub channel_access_token: String,
    /// Base URL of the platform content API.
    pub content_api_base: String,
    /// Path the platform delivers webhook events to.
    pub webhook_path: String,
    /// Root directory for staged downloads.
    pub staging_root: String,
    /// Root directory for promoted, per-entity attachments.
    pub storage_root: String,
    pub max_image_size_bytes: u64,
    pub max_video_size_bytes: u64,
    pub max_file_size_bytes: u64,
    pub max_default_size_bytes: u64,
    /// Staged files older than this are reclaimed by the reaper.
    pub staging_max_age_minutes: u64,
    pub reaper_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_image_size_mb = env::var("MAX_IMAGE_SIZE_MB")
            .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let max_default_size_mb = env::var("MAX_DEFAULT_SIZE_MB")
            .unwrap_or_else(|_| MAX_DEFAULT_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_DEFAULT_SIZE_MB);

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            channel_secret: env::var("CHANNEL_SECRET").map_err(|_| {
                anyhow::anyhow!("CHANNEL_SECRET must be set for webhook verification")
            })?,
            channel_access_token: env::var("CHANNEL_ACCESS_TOKEN").map_err(|_| {
                anyhow::anyhow!("CHANNEL_ACCESS_TOKEN must be set for content retrieval")
            })?,
            content_api_base: env::var("CONTENT_API_BASE")
                .unwrap_or_else(|_| CONTENT_API_BASE.to_string()),
            webhook_path: env::var("WEBHOOK_PATH").unwrap_or_else(|_| "/webhook".to_string()),
            staging_root: env::var("STAGING_ROOT").unwrap_or_else(|_| "temp".to_string()),
            storage_root: env::var("STORAGE_ROOT").unwrap_or_else(|_| "uploads".to_string()),
            max_image_size_bytes: max_image_size_mb * 1024 * 1024,
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_default_size_bytes: max_default_size_mb * 1024 * 1024,
            staging_max_age_minutes: env::var("STAGING_MAX_AGE_MINUTES")
                .unwrap_or_else(|_| STAGING_MAX_AGE_MINUTES.to_string())
                .parse()
                .unwrap_or(STAGING_MAX_AGE_MINUTES),
            reaper_interval_secs: env::var("REAPER_INTERVAL_SECS")
                .unwrap_or_else(|_| REAPER_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(REAPER_INTERVAL_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.channel_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("CHANNEL_SECRET must not be empty"));
        }
        if self.channel_access_token.trim().is_empty() {
            return Err(anyhow::anyhow!("CHANNEL_ACCESS_TOKEN must not be empty"));
        }
        if self.staging_root.trim().is_empty() || self.storage_root.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "STAGING_ROOT and STORAGE_ROOT must not be empty"
            ));
        }
        if !self.webhook_path.starts_with('/') {
            return Err(anyhow::anyhow!("WEBHOOK_PATH must start with '/'"));
        }
        for (name, limit) in [
            ("MAX_IMAGE_SIZE_MB", self.max_image_size_bytes),
            ("MAX_VIDEO_SIZE_MB", self.max_video_size_bytes),
            ("MAX_FILE_SIZE_MB", self.max_file_size_bytes),
            ("MAX_DEFAULT_SIZE_MB", self.max_default_size_bytes),
        ] {
            if limit == 0 {
                return Err(anyhow::anyhow!("{} must be greater than zero", name));
            }
        }
        if self.staging_max_age_minutes == 0 {
            return Err(anyhow::anyhow!(
                "STAGING_MAX_AGE_MINUTES must be greater than zero"
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Byte ceiling for a media category.
    pub fn limit_for(&self, category: MediaCategory) -> u64 {
        match category {
            MediaCategory::Image => self.max_image_size_bytes,
            MediaCategory::Video => self.max_video_size_bytes,
            MediaCategory::File => self.max_file_size_bytes,
            MediaCategory::Others => self.max_default_size_bytes,
        }
    }
}

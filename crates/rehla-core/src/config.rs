//! Configuration module
//!
//! This module provides the configuration for the admin toolkit: API
//! endpoint, credentials, and upload limits. The source of truth is the
//! environment (with `.env` support); everything downstream receives an
//! explicit `AdminConfig` rather than reading ambient state.

use std::env;

// Common constants
const HTTP_TIMEOUT_SECS: u64 = 60;
const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_GALLERY_ITEMS: usize = 20;

/// Admin toolkit configuration
#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub api_version: String,
    pub environment: String,
    pub http_timeout_seconds: u64,
    // Gallery upload limits
    pub max_image_size_bytes: usize,
    pub max_gallery_items: usize,
    pub allowed_image_extensions: Vec<String>,
    pub allowed_image_content_types: Vec<String>,
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_image_size_mb = env::var("MAX_IMAGE_SIZE_MB")
            .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let allowed_image_extensions = env::var("ALLOWED_IMAGE_EXTENSIONS")
            .unwrap_or_else(|_| "jpg,jpeg,png,gif,webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let allowed_image_content_types = env::var("ALLOWED_IMAGE_CONTENT_TYPES")
            .unwrap_or_else(|_| "image/jpeg,image/png,image/gif,image/webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let config = AdminConfig {
            api_base_url: env::var("REHLA_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or_else(|_| "http://localhost:4000".to_string())
                .trim_end_matches('/')
                .to_string(),
            api_token: env::var("REHLA_API_TOKEN")
                .or_else(|_| env::var("API_TOKEN"))
                .map_err(|_| {
                    anyhow::anyhow!("Missing API token. Set REHLA_API_TOKEN or API_TOKEN")
                })?,
            api_version: env::var("REHLA_API_VERSION").unwrap_or_else(|_| "v1".to_string()),
            environment,
            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            max_image_size_bytes: max_image_size_mb * 1024 * 1024,
            max_gallery_items: env::var("MAX_GALLERY_ITEMS")
                .unwrap_or_else(|_| MAX_GALLERY_ITEMS.to_string())
                .parse()
                .unwrap_or(MAX_GALLERY_ITEMS),
            allowed_image_extensions,
            allowed_image_content_types,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the toolkit is pointed at a production backend
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "REHLA_API_URL must start with http:// or https://"
            ));
        }

        if self.api_token.trim().is_empty() {
            return Err(anyhow::anyhow!("REHLA_API_TOKEN cannot be empty"));
        }

        if self.max_gallery_items == 0 {
            return Err(anyhow::anyhow!("MAX_GALLERY_ITEMS must be at least 1"));
        }

        Ok(())
    }

    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }
}

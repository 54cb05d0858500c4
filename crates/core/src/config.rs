//! Configuration loading.
//!
//! Values come from the environment (a `.env` file is honoured). Only the
//! API key is mandatory; its absence is the one fatal startup condition.

use crate::error::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_IMAGEN_MODEL: &str = "imagen-4.0-generate-001";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    /// Model used for quotes and hashtags.
    pub model_name: String,
    /// Model used for image edits.
    pub image_model_name: String,
    /// Model used for text-to-image generation.
    pub imagen_model_name: String,
    pub base_url: Url,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .map_err(|_| AppError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let mut builder = Self::builder().with_api_key(api_key);
        if let Ok(model) = env::var("GEMINI_MODEL") {
            builder = builder.with_model(model);
        }
        if let Ok(model) = env::var("GEMINI_IMAGE_MODEL") {
            builder = builder.with_image_model(model);
        }
        if let Ok(model) = env::var("IMAGEN_MODEL") {
            builder = builder.with_imagen_model(model);
        }
        if let Ok(url) = env::var("GEMINI_BASE_URL") {
            builder = builder.with_base_url(url);
        }
        builder.build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Programmatic construction of a [`Config`], used by tests and CLI overrides.
#[derive(Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    model: Option<String>,
    image_model: Option<String>,
    imagen_model: Option<String>,
    base_url: Option<String>,
}

impl ConfigBuilder {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    pub fn with_imagen_model(mut self, model: impl Into<String>) -> Self {
        self.imagen_model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<Config> {
        let gemini_api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let raw_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Url::join drops the last segment unless the base ends with a slash
        let raw_url = if raw_url.ends_with('/') {
            raw_url
        } else {
            format!("{raw_url}/")
        };
        let base_url = Url::parse(&raw_url)
            .map_err(|e| AppError::config(format!("Invalid base URL '{}': {}", raw_url, e)))?;

        Ok(Config {
            gemini_api_key,
            model_name: self.model.unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model_name: self
                .image_model
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            imagen_model_name: self
                .imagen_model
                .unwrap_or_else(|| DEFAULT_IMAGEN_MODEL.to_string()),
            base_url,
        })
    }
}

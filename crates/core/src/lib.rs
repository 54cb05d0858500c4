//! AI-Post Core Library
//!
//! This library provides the core functionality for the AI-Post studio:
//! turning a photo into a share-ready social post with Gemini.
//!
//! # Overview
//!
//! A session starts from an uploaded photo or an AI-generated one. The user
//! can then ask for a motivational quote, style it, add a watermark, have
//! the image model render everything into the picture, and finally request
//! hashtags. The library handles:
//!
//! - **Workflow**: Session state machine and stage transitions via [`workflow`]
//! - **AI Integration**: Image generation, edits, quotes and hashtags via [`gemini`]
//! - **Prompts**: Edit instruction composition via [`prompt`]
//! - **User Interface**: The desktop studio via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use ai_post_core::AiPost;
//!
//! let app = AiPost::new()?;
//! app.run_interactive(std::env::current_dir()?)?;
//! ```
//!
//! # Module Structure
//!
//! - [`catalog`]: Fonts, colors, placements and aspect ratios
//! - [`config`]: Configuration loading and management
//! - [`encoding`]: Base64 image payloads and MIME detection
//! - [`error`]: Error types and result aliases
//! - [`export`]: Saving the post and formatting hashtags
//! - [`gateway`]: The backend trait the workflow talks to
//! - [`gemini`]: Gemini implementation of the gateway
//! - [`prompt`]: Prompt text and composition
//! - [`ui`]: User interface components
//! - [`workflow`]: Session state and request execution

pub mod catalog;
pub mod config;
pub mod encoding;
pub mod error;
pub mod export;
pub mod gateway;
pub mod gemini;
pub mod prompt;
pub mod ui;
pub mod workflow;

// Re-export primary types for convenience
pub use catalog::{AspectRatio, ColorPalette, Font, QuotePlacement, StyleSelection};
pub use config::Config;
pub use encoding::EncodedImage;
pub use error::{AppError, Result};
pub use gateway::{Gateway, SharedGateway};
pub use gemini::GeminiClient;
pub use workflow::{Phase, Session, Workflow};

use std::path::PathBuf;
use std::sync::Arc;

/// Main entry point for the AI-Post application.
///
/// Owns the configuration and the Gemini-backed gateway, and hands out
/// workflows or launches the studio.
pub struct AiPost {
    config: Config,
    gateway: SharedGateway,
}

impl AiPost {
    /// Creates an instance from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingEnvVar`] when no API key is set.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::load()?)
    }

    /// Creates an instance with custom configuration, such as a model
    /// override from the command line.
    pub fn with_config(config: Config) -> Result<Self> {
        let gateway: SharedGateway = Arc::new(GeminiClient::new(&config)?);
        Ok(Self { config, gateway })
    }

    /// Starts a fresh headless workflow backed by Gemini.
    pub fn workflow(&self) -> Workflow {
        Workflow::new(self.gateway.clone())
    }

    /// Launches the desktop studio.
    ///
    /// # Arguments
    /// * `download_dir` - Directory the finished post is saved into
    pub fn run_interactive(&self, download_dir: PathBuf) -> Result<()> {
        ui::run_studio(self.gateway.clone(), download_dir)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before loading configuration.
pub fn init() {
    let _ = dotenvy::dotenv();
}

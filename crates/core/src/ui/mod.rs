//! Desktop studio for building a post.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: View-only state and the intents rendering produces
//! - [`rendering`]: Drawing helpers for cards, swatches and image frames
//! - [`studio`]: Main application logic
//!
//! # Usage
//!
//! ```ignore
//! use ai_post_core::{Config, GeminiClient, ui};
//! use std::sync::Arc;
//!
//! let config = Config::load()?;
//! let gateway = Arc::new(GeminiClient::new(&config)?);
//! ui::run_studio(gateway, std::env::current_dir()?)?;
//! ```

mod rendering;
mod state;
mod studio;

pub use state::{COPIED_FLASH, CopiedFlag, Intent};
pub use studio::PostStudio;

use crate::error::Result;
use crate::gateway::SharedGateway;
use std::path::PathBuf;

/// Opens the studio window and blocks until the user closes it.
///
/// # Arguments
/// * `gateway` - Backend used for generation, edits, quotes and hashtags
/// * `download_dir` - Where "Download Post" writes `ai-generated-post.png`
pub fn run_studio(gateway: SharedGateway, download_dir: PathBuf) -> Result<()> {
    studio::run(gateway, download_dir)
}

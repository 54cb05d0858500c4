//! Request/response contract with the generative-AI backend.
//!
//! The workflow only talks to the backend through [`Gateway`], which keeps
//! the controller testable with an in-memory implementation.

use crate::catalog::AspectRatio;
use crate::encoding::EncodedImage;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The four backend operations. Each call is single shot: no retries and no
/// timeout beyond what the transport imposes.
///
/// Uses `async_trait` so the controller can hold an `Arc<dyn Gateway>`.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generates one image for `prompt` at the given aspect ratio.
    ///
    /// Fails with [`AppError::Generation`](crate::AppError::Generation) when
    /// the response carries no image.
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio)
    -> Result<EncodedImage>;

    /// Sends `image` with a natural-language instruction and returns the
    /// modified image.
    ///
    /// Fails with [`AppError::Edit`](crate::AppError::Edit) when the
    /// response carries no image.
    async fn edit_image(&self, image: &EncodedImage, instruction: &str) -> Result<EncodedImage>;

    /// Returns a short motivational quote, trimmed.
    async fn generate_quote(&self) -> Result<String>;

    /// Returns hashtags (without `#`) for `context`, in backend order.
    ///
    /// A response without a `hashtags` field yields an empty list.
    async fn generate_hashtags(&self, context: &str) -> Result<Vec<String>>;
}

pub type SharedGateway = Arc<dyn Gateway>;

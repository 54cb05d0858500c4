//! Error types for the ai-post-core library.
//!
//! Every workflow stage has its own failure variant so that the controller
//! can map a failure to the banner message shown for that stage.

use thiserror::Error;

/// Errors that can occur within the ai-post-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid values, bad URLs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required environment variable was not found.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// The backend returned no image for a generation request.
    #[error("Image generation failed: {0}")]
    Generation(String),

    /// The backend returned no image for an edit request.
    #[error("Image edit failed: {0}")]
    Edit(String),

    /// Quote generation failed at the transport or response level.
    #[error("Quote generation failed: {0}")]
    Quote(String),

    /// The hashtag response could not be obtained or parsed.
    #[error("Hashtag generation failed: {0}")]
    Hashtag(String),

    /// The user triggered a stage whose inputs are not available yet.
    #[error("{0}")]
    Precondition(String),

    /// Image decoding or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// HTTP transport error outside of the Gemini client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a precondition error with the given message.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Human-readable message for the session's error banner.
    ///
    /// Stage failures collapse to a fixed message per stage; precondition
    /// errors carry their own wording.
    pub fn banner(&self) -> String {
        match self {
            Self::Precondition(msg) => msg.clone(),
            Self::Generation(_) => {
                "Failed to generate the image. Please try a different prompt.".to_string()
            }
            Self::Edit(_) => "Failed to edit the image. The model may be unable to process this \
                              request. Please try a different prompt or image."
                .to_string(),
            Self::Quote(_) => "Could not generate a quote. Please try again.".to_string(),
            Self::Hashtag(_) => "Could not generate hashtags. Please try again.".to_string(),
            Self::Io(_) | Self::ImageProcessing(_) => {
                "Failed to load image. Please try another file.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_banner_is_the_message_itself() {
        let err = AppError::precondition("Please upload or generate an image first.");
        assert_eq!(err.banner(), "Please upload or generate an image first.");
        assert_eq!(err.to_string(), "Please upload or generate an image first.");
    }

    #[test]
    fn stage_banners_hide_backend_details() {
        let err = AppError::Hashtag("expected value at line 1 column 1".into());
        assert_eq!(err.banner(), "Could not generate hashtags. Please try again.");

        let err = AppError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.banner(), "Failed to load image. Please try another file.");
    }
}

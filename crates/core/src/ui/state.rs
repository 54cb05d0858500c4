//! View-only state and the intents the view forwards to the controller.
//!
//! Everything that matters to the workflow lives in the session; what is
//! kept here is input the session does not own (the generation prompt and
//! aspect ratio), cached textures and the short-lived "copied" flag.

use crate::catalog::AspectRatio;
use crate::encoding::EncodedImage;
use crate::workflow::Mode;
use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long the "Copied!" acknowledgment stays visible.
pub const COPIED_FLASH: Duration = Duration::from_millis(2500);

/// A user action produced while rendering a frame.
///
/// Intents are collected during rendering and applied afterwards so the
/// render code never holds a mutable borrow of the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    SelectMode(Mode),
    Upload(PathBuf),
    Generate,
    Edit,
    GenerateQuote,
    GenerateHashtags,
    EditAgain,
    Download,
    CopyHashtags,
    StartOver,
    DismissError,
}

/// Acknowledgment flag that clears itself after [`COPIED_FLASH`].
#[derive(Default)]
pub struct CopiedFlag {
    since: Option<Instant>,
}

impl CopiedFlag {
    pub fn raise(&mut self) {
        self.since = Some(Instant::now());
    }

    /// Returns whether the flag is up, clearing it once it has expired.
    pub fn is_up(&mut self, now: Instant) -> bool {
        match self.since {
            Some(since) if now.duration_since(since) < COPIED_FLASH => true,
            Some(_) => {
                self.since = None;
                false
            }
            None => false,
        }
    }

    /// Time left before the flag clears, used to schedule a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.since
            .map(|since| COPIED_FLASH.saturating_sub(now.duration_since(since)))
    }
}

/// A texture uploaded for a specific encoded image.
pub struct TextureSlot {
    pub source: EncodedImage,
    pub handle: Option<egui::TextureHandle>,
}

pub struct ViewState {
    pub generation_prompt: String,
    pub aspect_ratio: AspectRatio,
    pub upload_path: String,
    pub download_dir: PathBuf,
    pub notice: Option<String>,
    pub copied: CopiedFlag,
    pub source_texture: Option<TextureSlot>,
    pub result_texture: Option<TextureSlot>,
}

impl ViewState {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            generation_prompt: String::new(),
            aspect_ratio: AspectRatio::default(),
            upload_path: String::new(),
            download_dir,
            notice: None,
            copied: CopiedFlag::default(),
            source_texture: None,
            result_texture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copied_flag_clears_after_flash() {
        let mut flag = CopiedFlag::default();
        let start = Instant::now();
        assert!(!flag.is_up(start));

        flag.raise();
        let raised = Instant::now();
        assert!(flag.is_up(raised));
        assert!(flag.remaining(raised).unwrap() <= COPIED_FLASH);

        assert!(!flag.is_up(raised + COPIED_FLASH + Duration::from_millis(1)));
        assert!(flag.remaining(raised).is_none());
    }
}

//! Output artifacts: the downloadable post image and the hashtag line.

use crate::encoding::EncodedImage;
use crate::error::{AppError, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// File name of the downloaded post.
pub const POST_FILE_NAME: &str = "ai-generated-post.png";

/// Writes the edited image into `dir` as a PNG named [`POST_FILE_NAME`].
///
/// Only an edited result can be downloaded; pass `None` and you get a
/// precondition error.
pub fn save_post(edited: Option<&EncodedImage>, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let edited = edited.ok_or_else(|| {
        AppError::precondition("Generate a post before downloading it.")
    })?;

    let path = dir.as_ref().join(POST_FILE_NAME);
    save_png(edited, &path)?;
    Ok(path)
}

/// Decodes `image` and writes it to `path` as a PNG.
pub fn save_png(image: &EncodedImage, path: &Path) -> Result<()> {
    image
        .to_image()?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| AppError::image(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), "Saved image");
    Ok(())
}

/// Formats hashtags for the clipboard: `#a #b #c`.
pub fn hashtag_line(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::png_bytes;

    #[test]
    fn saves_png_with_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let edited = EncodedImage::from_bytes(&png_bytes(5, 3));

        let path = save_post(Some(&edited), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), POST_FILE_NAME);

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (5, 3));
    }

    #[test]
    fn download_requires_edited_result() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_post(None, dir.path());
        assert!(matches!(result, Err(AppError::Precondition(_))));
        assert!(!dir.path().join(POST_FILE_NAME).exists());
    }

    #[test]
    fn save_png_reencodes_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut jpeg = Vec::new();
        image::DynamicImage::new_rgb8(6, 2)
            .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        let path = dir.path().join("out.png");

        save_png(&EncodedImage::from_bytes(&jpeg), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn hashtag_line_prefixes_each_tag() {
        let tags = vec!["travel".to_string(), "nature".to_string()];
        assert_eq!(hashtag_line(&tags), "#travel #nature");
        assert_eq!(hashtag_line(&[]), "");
    }
}

//! Image encoding utilities.
//!
//! Images cross the gateway boundary as base64 text plus a MIME type. This
//! module turns user files into that form and back into raster images for
//! display and export.

use crate::error::{AppError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, ImageFormat};
use std::path::Path;

/// MIME type assumed when neither the content nor the extension tells us.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// A base64-encoded image together with its MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Standard base64 of the raw file bytes.
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encodes raw bytes. The MIME type is sniffed from the content.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime_type = sniff_mime(bytes).unwrap_or(FALLBACK_MIME);
        Self::new(BASE64.encode(bytes), mime_type)
    }

    /// Decodes the base64 payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| AppError::image(format!("Invalid base64 payload: {}", e)))
    }

    /// Decodes the payload into a raster image.
    pub fn to_image(&self) -> Result<DynamicImage> {
        let bytes = self.decode()?;
        image::load_from_memory(&bytes)
            .map_err(|e| AppError::image(format!("Failed to decode image: {}", e)))
    }

    /// Returns a `data:` URL for the image.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Reads a user-supplied file and encodes it for transmission.
///
/// # Errors
///
/// Returns [`AppError::Io`] if the file cannot be read. No size or type
/// validation is performed.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedImage> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;

    let mime_type = sniff_mime(&bytes)
        .or_else(|| mime_from_extension(path))
        .unwrap_or(FALLBACK_MIME);

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        mime = mime_type,
        "Encoded image file"
    );

    Ok(EncodedImage::new(BASE64.encode(&bytes), mime_type))
}

/// Detects the MIME type from the file's magic bytes.
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn encode_file_detects_png_from_content() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&png_bytes(3, 2)).unwrap();

        let encoded = encode_file(file.path()).await.unwrap();
        assert_eq!(encoded.mime_type, "image/png");

        let img = encoded.to_image().unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[tokio::test]
    async fn unknown_content_falls_back_to_extension_then_jpeg() {
        let mut webp = tempfile::Builder::new().suffix(".webp").tempfile().unwrap();
        webp.write_all(b"not really an image").unwrap();
        assert_eq!(encode_file(webp.path()).await.unwrap().mime_type, "image/webp");

        let mut bare = tempfile::NamedTempFile::new().unwrap();
        bare.write_all(b"opaque").unwrap();
        let encoded = encode_file(bare.path()).await.unwrap();
        assert_eq!(encoded.mime_type, FALLBACK_MIME);
        assert_eq!(encoded.decode().unwrap(), b"opaque");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = encode_file(dir.path().join("missing.png")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn corrupt_payload_reports_image_error() {
        let encoded = EncodedImage::new("***", "image/png");
        assert!(matches!(encoded.decode(), Err(AppError::ImageProcessing(_))));
    }

    #[test]
    fn data_url_carries_mime() {
        let encoded = EncodedImage::new("AAAA", "image/png");
        assert_eq!(encoded.data_url(), "data:image/png;base64,AAAA");
    }
}

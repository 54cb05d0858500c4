use crate::catalog::AspectRatio;
use crate::config::Config;
use crate::encoding::EncodedImage;
use crate::error::{AppError, Result};
use crate::gateway::Gateway;
use crate::prompt::{QUOTE_REQUEST, hashtag_request};
use async_trait::async_trait;
use gemini_rust::{Blob, Content, Gemini, Message, Part, Role};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

/// Gemini-backed [`Gateway`].
///
/// Text and image edits go through `generateContent`; text-to-image uses the
/// Imagen `:predict` endpoint, which the Gemini client does not cover.
pub struct GeminiClient {
    text: Gemini,
    image: Gemini,
    http: reqwest::Client,
    predict_url: Url,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let text = model_client(config, &config.model_name)?;
        let image = model_client(config, &config.image_model_name)?;

        let predict_url = config
            .base_url
            .join(&format!("{}:predict", model_path(&config.imagen_model_name)))
            .map_err(|e| AppError::config(format!("Invalid Imagen URL: {}", e)))?;

        Ok(Self {
            text,
            image,
            http: reqwest::Client::new(),
            predict_url,
            api_key: config.gemini_api_key.clone(),
        })
    }
}

/// Builds a client bound to one model, explicitly setting the base URL to
/// avoid a BadScheme error.
fn model_client(config: &Config, model_name: &str) -> Result<Gemini> {
    let model_url = format!("{}{}", config.base_url, model_path(model_name));
    Gemini::with_model_and_base_url(&config.gemini_api_key, model_url, config.base_url.clone())
        .map_err(|e| AppError::config(format!("Failed to create Gemini client: {}", e)))
}

fn model_path(model_name: &str) -> String {
    if model_name.starts_with("models/") {
        model_name.to_string()
    } else {
        format!("models/{}", model_name)
    }
}

fn user_message(parts: Vec<Part>) -> Message {
    Message {
        role: Role::User,
        content: Content {
            role: Some(Role::User),
            parts: Some(parts),
        },
    }
}

fn text_part(text: impl Into<String>) -> Part {
    Part::Text {
        text: text.into(),
        thought: None,
        thought_signature: None,
    }
}

/// Concatenates the answer text, skipping thought parts.
fn answer_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text, thought, .. } if *thought != Some(true) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// First inline image among the parts. A blank MIME type inherits `fallback_mime`.
fn first_inline_image(parts: &[Part], fallback_mime: &str) -> Option<EncodedImage> {
    parts.iter().find_map(|part| match part {
        Part::InlineData { inline_data, .. } if !inline_data.data.is_empty() => {
            let mime = if inline_data.mime_type.trim().is_empty() {
                fallback_mime
            } else {
                inline_data.mime_type.as_str()
            };
            Some(EncodedImage::new(inline_data.data.clone(), mime))
        }
        _ => None,
    })
}

#[derive(Deserialize)]
struct HashtagPayload {
    #[serde(default)]
    hashtags: Option<Vec<String>>,
}

/// Parses the structured hashtag response.
///
/// A missing or null `hashtags` field yields an empty list; anything that is
/// not a JSON object of that shape is a [`AppError::Hashtag`].
pub fn parse_hashtags(raw: &str) -> Result<Vec<String>> {
    let payload: HashtagPayload = serde_json::from_str(raw.trim())
        .map_err(|e| AppError::Hashtag(format!("Malformed hashtag response: {}", e)))?;

    Ok(payload
        .hashtags
        .unwrap_or_default()
        .into_iter()
        .map(|tag| tag.trim().trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest<'a> {
    instances: [PredictInstance<'a>; 1],
    parameters: PredictParameters<'a>,
}

#[derive(Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_mime_type: &'a str,
}

#[derive(Deserialize, Default)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

fn first_prediction(response: PredictResponse) -> Option<EncodedImage> {
    response.predictions.into_iter().find_map(|p| {
        let data = p.bytes_base64_encoded.filter(|d| !d.is_empty())?;
        let mime = p.mime_type.unwrap_or_else(|| "image/jpeg".to_string());
        Some(EncodedImage::new(data, mime))
    })
}

#[async_trait]
impl Gateway for GeminiClient {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<EncodedImage> {
        let body = PredictRequest {
            instances: [PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.value(),
                output_mime_type: "image/jpeg",
            },
        };

        tracing::debug!(url = %self.predict_url, aspect_ratio = %aspect_ratio, "Requesting image generation");

        let response = self
            .http
            .post(self.predict_url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Generation(format!("API request failed: {}", e)))?;

        let payload: PredictResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Unreadable response: {}", e)))?;

        first_prediction(payload)
            .ok_or_else(|| AppError::Generation("No image data in response".to_string()))
    }

    async fn edit_image(&self, image: &EncodedImage, instruction: &str) -> Result<EncodedImage> {
        let image_part = Part::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
            media_resolution: None,
        };

        tracing::debug!(
            mime = %image.mime_type,
            prompt_len = instruction.len(),
            "Requesting image edit"
        );

        let response = self
            .image
            .generate_content()
            .with_messages(vec![user_message(vec![image_part, text_part(instruction)])])
            .execute()
            .await
            .map_err(|e| AppError::Edit(format!("API request failed: {:?}", e)))?;

        let parts = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.clone())
            .unwrap_or_default();

        first_inline_image(&parts, &image.mime_type)
            .ok_or_else(|| AppError::Edit("No image data in response".to_string()))
    }

    async fn generate_quote(&self) -> Result<String> {
        let response = self
            .text
            .generate_content()
            .with_messages(vec![user_message(vec![text_part(QUOTE_REQUEST)])])
            .execute()
            .await
            .map_err(|e| AppError::Quote(format!("API request failed: {:?}", e)))?;

        let parts = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.clone())
            .unwrap_or_default();

        let quote = answer_text(&parts).trim().to_string();
        if quote.is_empty() {
            return Err(AppError::Quote(
                "No text response received from Gemini".to_string(),
            ));
        }
        Ok(quote)
    }

    async fn generate_hashtags(&self, context: &str) -> Result<Vec<String>> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "hashtags": {
                    "type": "ARRAY",
                    "items": {
                        "type": "STRING",
                        "description": "A trending Instagram hashtag without the # symbol."
                    }
                }
            }
        });

        let response = self
            .text
            .generate_content()
            .with_messages(vec![user_message(vec![text_part(hashtag_request(
                context,
            ))])])
            .with_response_mime_type("application/json")
            .with_response_schema(schema)
            .execute()
            .await
            .map_err(|e| AppError::Hashtag(format!("API request failed: {:?}", e)))?;

        let parts = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.clone())
            .unwrap_or_default();

        parse_hashtags(&answer_text(&parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashtags_keep_backend_order() {
        let tags = parse_hashtags(r#"{ "hashtags": ["travel", "nature"] }"#).unwrap();
        assert_eq!(tags, vec!["travel", "nature"]);
    }

    #[test]
    fn missing_hashtags_field_is_empty_not_error() {
        assert!(parse_hashtags("{}").unwrap().is_empty());
        assert!(parse_hashtags(r#"{"hashtags": null}"#).unwrap().is_empty());
    }

    #[test]
    fn unparsable_hashtags_are_an_error() {
        assert!(matches!(
            parse_hashtags("travel, nature"),
            Err(AppError::Hashtag(_))
        ));
        assert!(matches!(
            parse_hashtags(r#"["travel"]"#),
            Err(AppError::Hashtag(_))
        ));
    }

    #[test]
    fn stray_hash_symbols_are_stripped() {
        let tags = parse_hashtags(r##"{"hashtags": ["#wanderlust", " hiking ", ""]}"##).unwrap();
        assert_eq!(tags, vec!["wanderlust", "hiking"]);
    }

    #[test]
    fn answer_text_skips_thoughts() {
        let parts = vec![
            Part::Text {
                text: "thinking...".into(),
                thought: Some(true),
                thought_signature: None,
            },
            text_part("  Go further together. "),
        ];
        assert_eq!(answer_text(&parts).trim(), "Go further together.");
    }

    #[test]
    fn inline_image_is_found_after_text() {
        let parts = vec![
            text_part("Here is your image"),
            Part::InlineData {
                inline_data: Blob {
                    mime_type: String::new(),
                    data: "iVBOR".into(),
                },
                media_resolution: None,
            },
        ];
        let image = first_inline_image(&parts, "image/png").unwrap();
        assert_eq!(image, EncodedImage::new("iVBOR", "image/png"));
        assert!(first_inline_image(&parts[..1], "image/png").is_none());
    }

    #[test]
    fn prediction_without_bytes_yields_nothing() {
        let empty: PredictResponse = serde_json::from_str(r#"{"predictions": [{}]}"#).unwrap();
        assert!(first_prediction(empty).is_none());

        let body = r#"{"predictions": [{"bytesBase64Encoded": "AAAA", "mimeType": "image/jpeg"}]}"#;
        let full: PredictResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            first_prediction(full),
            Some(EncodedImage::new("AAAA", "image/jpeg"))
        );
        assert!(first_prediction(PredictResponse::default()).is_none());
    }

    #[test]
    fn predict_request_uses_wire_names() {
        let body = PredictRequest {
            instances: [PredictInstance { prompt: "a lake" }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: AspectRatio::Story.value(),
                output_mime_type: "image/jpeg",
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["instances"][0]["prompt"], "a lake");
        assert_eq!(value["parameters"]["sampleCount"], 1);
        assert_eq!(value["parameters"]["aspectRatio"], "9:16");
        assert_eq!(value["parameters"]["outputMimeType"], "image/jpeg");
    }

    #[test]
    fn client_targets_predict_endpoint() {
        let config = Config::builder()
            .with_api_key("key")
            .with_imagen_model("models/imagen-test")
            .build()
            .unwrap();
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.predict_url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/imagen-test:predict"
        );
    }
}

//! Prompt assembly for the backend.
//!
//! The image model is prompt-sensitive, so the section headers and numbered
//! rules below are kept stable across releases.

use crate::catalog::StyleSelection;

/// Instruction used when the user asked for nothing specific.
pub const DEFAULT_EDIT_INSTRUCTION: &str = "Subtly enhance the colors and lighting to make the image more vibrant and appealing for social media.";

pub const QUOTE_REQUEST: &str = "Generate a short, motivational quote about travel with friends, stepping into the outdoors, and connecting with nature. The quote should be inspiring and concise, perfect for an Instagram post. No quotation marks.";

/// Hashtag context used when an edited image exists but no quote does.
pub const HASHTAG_FALLBACK_CONTEXT: &str = "a stunning travel photo featuring nature and friends";

/// Number of hashtags requested from the backend. Not enforced on return.
pub const HASHTAG_COUNT: usize = 10;

/// A canned edit instruction offered next to the free-text field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresetPrompt {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const PRESET_PROMPTS: &[PresetPrompt] = &[
    PresetPrompt {
        name: "Retro Filter",
        prompt: "Apply a warm, grainy retro filter to the image, reminiscent of a vintage photograph.",
    },
    PresetPrompt {
        name: "Nature Enhance",
        prompt: "Enhance the natural elements. Make the greens more lush, the sky more blue, and add a soft, sunny glow.",
    },
    PresetPrompt {
        name: "Dramatic B&W",
        prompt: "Convert the image to a high-contrast, dramatic black and white.",
    },
    PresetPrompt {
        name: "Remove Background",
        prompt: "Remove the background, leaving only the main subject with a clean, transparent background.",
    },
];

/// Everything the user chose for one edit request.
#[derive(Clone, Copy, Debug, Default)]
pub struct EditPromptInput<'a> {
    pub instruction: &'a str,
    pub quote: &'a str,
    pub style: StyleSelection,
    pub watermark: &'a str,
}

/// Merges the edit instruction, quote overlay and watermark into one prompt.
///
/// Blocks appear in the order instruction, quote, watermark. Blank fields
/// are treated as absent; when all three are blank the default instruction
/// is used on its own.
pub fn compose_edit_prompt(input: &EditPromptInput<'_>) -> String {
    let instruction = input.instruction.trim();
    let quote = input.quote.trim();
    let watermark = input.watermark.trim();

    let mut prompt = if instruction.is_empty() && quote.is_empty() && watermark.is_empty() {
        DEFAULT_EDIT_INSTRUCTION.to_string()
    } else {
        instruction.to_string()
    };

    if !quote.is_empty() {
        let style = input.style;
        prompt.push_str("\n\n--- TEXT OVERLAY INSTRUCTIONS ---\n");
        prompt.push_str(
            "Please add the following text to the image, following these rules precisely:\n",
        );
        prompt.push_str(&format!("1. EXACT TEXT: \"{}\"\n", quote));
        prompt.push_str(&format!(
            "2. FONT: Use a font that strongly resembles '{}'.\n",
            style.font.family()
        ));
        prompt.push_str(&format!(
            "3. COLOR & STYLE: The text color must be {}. Apply {}.\n",
            style.palette.text_color(),
            style.palette.shadow()
        ));
        prompt.push_str(&format!(
            "4. PLACEMENT: Position the text block in the {} area of the image. It must be aesthetically pleasing and not cover any key subjects.\n",
            style.placement.value()
        ));
    }

    if !watermark.is_empty() {
        prompt.push_str("\n--- WATERMARK INSTRUCTIONS ---\n");
        prompt.push_str(&format!(
            "Add a discreet watermark with the text \"{}\" in the bottom-right corner. It should be small and semi-transparent.\n",
            watermark
        ));
    }

    prompt
}

/// Hashtag request sent to the text model for the given context.
pub fn hashtag_request(context: &str) -> String {
    format!(
        "Based on the quote \"{}\", generate an array of {} trending and relevant Instagram hashtags to maximize reach.",
        context, HASHTAG_COUNT
    )
}

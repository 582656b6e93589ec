// src/captions/prompt.rs
// Caption instruction text and the structured output contract

use serde_json::{Value, json};

use crate::llm::{InlineImage, StructuredRequest};
use crate::photo::{EmojiSelection, PhotoData};

/// Number of captions the model is asked for
pub const REQUESTED_CAPTIONS: usize = 5;

pub fn caption_prompt(emojis: &EmojiSelection) -> String {
    format!(
        "Analyze the person's expression in the image and these emojis: {}. \
         Generate an array of {} short, witty, and viral-style meme captions \
         suitable for social media.",
        emojis.symbols_joined(),
        REQUESTED_CAPTIONS
    )
}

/// `{ captions: string[] }` in Gemini's OpenAPI-subset schema dialect
pub fn caption_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "captions": {
                "type": "ARRAY",
                "description": format!("An array of {} meme captions.", REQUESTED_CAPTIONS),
                "items": {
                    "type": "STRING",
                    "description": "A witty meme caption."
                }
            }
        }
    })
}

pub fn build_request(photo: &PhotoData, emojis: &EmojiSelection) -> StructuredRequest {
    StructuredRequest {
        image: InlineImage {
            media_type: photo.media_type().to_string(),
            data: photo.payload().to_string(),
        },
        prompt: caption_prompt(emojis),
        response_schema: caption_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::EmojiPlacement;

    #[test]
    fn test_prompt_mentions_emojis_and_count() {
        let emojis: EmojiSelection = ["😂", "🔥"].into_iter().map(EmojiPlacement::new).collect();
        let prompt = caption_prompt(&emojis);
        assert!(prompt.contains("these emojis: 😂 🔥."));
        assert!(prompt.contains("array of 5 short, witty"));
    }

    #[test]
    fn test_schema_requires_caption_strings() {
        let schema = caption_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["captions"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["captions"]["items"]["type"], "STRING");
    }

    #[test]
    fn test_build_request_strips_data_url_header() {
        let photo = PhotoData::from_data_url("data:image/webp;base64,UklGRg==").unwrap();
        let request = build_request(&photo, &EmojiSelection::default());
        assert_eq!(request.image.media_type, "image/webp");
        assert_eq!(request.image.data, "UklGRg==");
    }
}

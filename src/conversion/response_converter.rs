//! Upstream response to text conversion

use crate::models::gemini::GeminiResponse;
use crate::models::openai::OpenAIChatCompletionResponse;

/// Extract the reply text from a Gemini response
///
/// Text parts of the first candidate are concatenated. Returns `None` when
/// there is no candidate or the text is blank (e.g. a safety block).
pub fn convert_gemini_to_text(response: &GeminiResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    non_blank(text)
}

/// Extract the reply text from an OpenAI chat completion
pub fn convert_openai_to_text(response: &OpenAIChatCompletionResponse) -> Option<String> {
    let text = response.choices.first()?.message.content.clone()?;
    non_blank(text)
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gemini_parts_are_joined() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Ikkat is "}, {"text": "resist-dyed."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 5, "totalTokenCount": 9}
        }))
        .unwrap();

        assert_eq!(
            convert_gemini_to_text(&response).as_deref(),
            Some("Ikkat is resist-dyed.")
        );
    }

    #[test]
    fn test_gemini_blocked_candidate_has_no_text() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert_eq!(convert_gemini_to_text(&response), None);

        let empty: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(convert_gemini_to_text(&empty), None);
    }

    #[test]
    fn test_openai_first_choice() {
        let response: OpenAIChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": " Try a Kalamkari dupatta. "},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        assert_eq!(
            convert_openai_to_text(&response).as_deref(),
            Some("Try a Kalamkari dupatta.")
        );
    }

    #[test]
    fn test_openai_null_content() {
        let response: OpenAIChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(convert_openai_to_text(&response), None);
    }
}

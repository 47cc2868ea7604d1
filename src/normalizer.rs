//! Extraction of candidate text from generation API responses.
//!
//! Providers return the generated text in different envelopes. Each known
//! envelope is a [`Strategy`]; strategies are tried in a fixed order and the
//! first one that yields any non-blank text wins. Results of different
//! strategies are never merged.

use serde::{Deserialize, Deserializer};

// Fields absent or explicitly `null` both read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseEnvelope {
    #[serde(deserialize_with = "null_as_default")]
    candidates: Vec<Candidate>,
    #[serde(deserialize_with = "null_as_default")]
    output_text: String,
    #[serde(deserialize_with = "null_as_default")]
    output: Vec<OutputItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    #[serde(deserialize_with = "null_as_default")]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    #[serde(deserialize_with = "null_as_default")]
    parts: Vec<TextPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputItem {
    #[serde(deserialize_with = "null_as_default")]
    text: String,
    #[serde(deserialize_with = "null_as_default")]
    content: Vec<TextPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextPart {
    #[serde(deserialize_with = "null_as_default")]
    text: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Known response shapes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `candidates[].content.parts[].text`
    Candidates,
    /// top-level `output_text`
    OutputText,
    /// `output[].text`, falling back to `output[].content[].text`
    OutputItems,
}

pub const STRATEGIES: [Strategy; 3] = [
    Strategy::Candidates,
    Strategy::OutputText,
    Strategy::OutputItems,
];

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

impl Strategy {
    fn apply(self, envelope: &ResponseEnvelope) -> Vec<String> {
        match self {
            Strategy::Candidates => envelope
                .candidates
                .iter()
                .flat_map(|c| c.content.parts.iter())
                .filter(|p| !is_blank(&p.text))
                .map(|p| p.text.clone())
                .collect(),
            Strategy::OutputText => {
                if is_blank(&envelope.output_text) {
                    Vec::new()
                } else {
                    vec![envelope.output_text.clone()]
                }
            }
            Strategy::OutputItems => {
                let mut out = Vec::new();
                for item in &envelope.output {
                    if !is_blank(&item.text) {
                        out.push(item.text.clone());
                    } else {
                        out.extend(
                            item.content
                                .iter()
                                .filter(|p| !is_blank(&p.text))
                                .map(|p| p.text.clone()),
                        );
                    }
                }
                out
            }
        }
    }
}

/// Extracts candidate strings from a raw response body.
///
/// Returns an empty list when the payload decodes but carries no text, and
/// an error when it does not decode at all.
pub fn extract(raw: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let envelope: ResponseEnvelope = serde_json::from_slice(raw)?;
    Ok(extract_from(&envelope))
}

fn extract_from(envelope: &ResponseEnvelope) -> Vec<String> {
    for strategy in STRATEGIES {
        let candidates = strategy.apply(envelope);
        if !candidates.is_empty() {
            return candidates;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract_json(value: serde_json::Value) -> Vec<String> {
        extract(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_candidates_parts_in_document_order() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "ls -la"}, {"text": "  "}, {"text": "ls -a"}]}},
                {"content": {"parts": [{"text": "find . -type f"}]}}
            ]
        });
        assert_eq!(extract_json(body), vec!["ls -la", "ls -a", "find . -type f"]);
    }

    #[test]
    fn test_candidates_take_precedence_over_output_text() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "du -sh *"}]}}],
            "output_text": "ls -la"
        });
        assert_eq!(extract_json(body), vec!["du -sh *"]);
    }

    #[test]
    fn test_output_text_used_when_candidates_blank() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "   "}]}}],
            "output_text": "ls -la",
            "output": [{"text": "pwd"}]
        });
        assert_eq!(extract_json(body), vec!["ls -la"]);
    }

    #[test]
    fn test_output_items_direct_text_and_nested_content() {
        let body = json!({
            "id": "resp_1",
            "object": "response",
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "ls -la"},
                    {"type": "output_text", "text": ""}
                ]},
                {"type": "message", "text": "pwd", "content": [{"text": "ignored"}]}
            ]
        });
        assert_eq!(extract_json(body), vec!["ls -la", "pwd"]);
    }

    #[test]
    fn test_blank_output_text_is_not_a_candidate() {
        let body = json!({"output_text": " \n "});
        assert!(extract_json(body).is_empty());
    }

    #[test]
    fn test_empty_object_yields_no_candidates() {
        assert!(extract(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_undecodable_payload_is_an_error() {
        assert!(extract(b"<html>Bad Gateway</html>").is_err());
        assert!(extract(b"").is_err());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let body = json!({
            "candidates": null,
            "output_text": null,
            "output": [{"text": null, "content": [{"type": "output_text", "text": "uname -a"}]}]
        });
        assert_eq!(extract_json(body), vec!["uname -a"]);
    }

    #[test]
    fn test_wrong_field_type_is_an_error() {
        assert!(extract(br#"{"output_text": 7}"#).is_err());
    }
}

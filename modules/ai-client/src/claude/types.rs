use serde::{Deserialize, Serialize};

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

// =============================================================================
// Chat Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 4096,
            messages: Vec::new(),
            temperature: None,
        }
    }

    pub fn message(mut self, message: WireMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

// =============================================================================
// Chat Response
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub content: Vec<ContentBlock>,
    #[allow(dead_code)]
    pub stop_reason: Option<String>,
}

impl ChatResponse {
    /// All text blocks joined in order.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();
        (!parts.is_empty()).then(|| parts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_sampling_parameters() {
        let request = ChatRequest::new("claude-haiku-4-5-20251001")
            .message(WireMessage::user("hello"))
            .max_tokens(600)
            .temperature(0.5);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 600);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.5);
    }

    #[test]
    fn response_text_skips_non_text_blocks() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"content":[
                {"type":"thinking","thinking":"..."},
                {"type":"text","text":"Robotics"}
            ],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Robotics"));
    }

    #[test]
    fn response_without_text_is_none() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"content":[],"stop_reason":"max_tokens"}"#).unwrap();
        assert!(response.text().is_none());
    }
}

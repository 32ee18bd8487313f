use serde::{Deserialize, Serialize};

/// Generation parameters for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Completion result; may legitimately carry zero content parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub parts: Vec<String>,
}

impl ModelResponse {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Concatenated text of all parts, `None` when there are no parts
    pub fn text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.parts.concat())
        }
    }
}

// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Broad failure categories surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration, fatal at startup
    Configuration,
    /// Malformed input such as an unrecognized video URL
    InvalidInput,
    /// Network failure or retrieval infrastructure failure
    SourceUnavailable,
    /// The source exists but has no usable content (e.g. transcripts disabled)
    ContentUnavailable,
    /// The completion call failed
    Model,
    /// The model answered without any content
    EmptyResponse,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::InvalidInput => write!(f, "invalid_input"),
            ErrorKind::SourceUnavailable => write!(f, "source_unavailable"),
            ErrorKind::ContentUnavailable => write!(f, "content_unavailable"),
            ErrorKind::Model => write!(f, "model"),
            ErrorKind::EmptyResponse => write!(f, "empty_response"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {env} is not set; the model API key is required")]
    MissingApiKey { env: String },
    #[error("knowledge.max_tokens must be greater than zero")]
    InvalidBudget,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// Failure of a single source extraction. Extraction never yields partial text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("transcripts are disabled for this video")]
    TranscriptsDisabled,
    #[error("no transcript in {requested:?} (available: {available:?})")]
    TranscriptUnavailable {
        requested: Vec<String>,
        available: Vec<String>,
    },
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("failed to parse source: {0}")]
    Parse(String),
    #[error("failed to decode text: {0}")]
    Decode(String),
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::InvalidUrl(_) | ExtractionError::Decode(_) => ErrorKind::InvalidInput,
            ExtractionError::TranscriptsDisabled | ExtractionError::TranscriptUnavailable { .. } => {
                ErrorKind::ContentUnavailable
            }
            ExtractionError::SourceUnavailable(_) | ExtractionError::Parse(_) => {
                ErrorKind::SourceUnavailable
            }
        }
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        ExtractionError::SourceUnavailable(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected model response: {0}")]
    Decode(String),
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Model
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ModelError::Decode(err.to_string())
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

/// Failure of one conversational turn. Both variants are recoverable.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("the model returned an empty response, please try again")]
    EmptyResponse,
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::EmptyResponse => ErrorKind::EmptyResponse,
            ChatError::Model(e) => e.kind(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("failed to summarize content: {0}")]
    Summary(#[source] ModelError),
    #[error("the model returned an empty summary")]
    EmptySummary,
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::Extraction(e) => e.kind(),
            IngestError::Summary(e) => e.kind(),
            IngestError::EmptySummary => ErrorKind::EmptyResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_kinds() {
        assert_eq!(
            ExtractionError::InvalidUrl("not a url".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ExtractionError::TranscriptsDisabled.kind(),
            ErrorKind::ContentUnavailable
        );
        assert_eq!(
            ExtractionError::SourceUnavailable("timeout".into()).kind(),
            ErrorKind::SourceUnavailable
        );
    }

    #[test]
    fn test_chat_error_kinds() {
        assert_eq!(ChatError::EmptyResponse.kind(), ErrorKind::EmptyResponse);
        let err: ChatError = ModelError::Transport("refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::Model);
    }

    #[test]
    fn test_ingest_error_keeps_extraction_kind() {
        let err: IngestError = ExtractionError::TranscriptsDisabled.into();
        assert_eq!(err.kind(), ErrorKind::ContentUnavailable);
        assert_eq!(err.to_string(), "transcripts are disabled for this video");
    }
}

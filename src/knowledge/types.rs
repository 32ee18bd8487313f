use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingestible source, dispatched through a single extraction entry point
#[derive(Debug, Clone)]
pub enum SourceDescriptor {
    /// Paginated document (PDF) bytes
    Document { name: String, bytes: Vec<u8> },
    /// UTF-8 text bytes
    PlainText { name: String, bytes: Vec<u8> },
    WebPage { url: String },
    /// Video URL plus an optional credential forwarded as a session cookie
    VideoTranscript {
        url: String,
        credential: Option<String>,
    },
}

impl SourceDescriptor {
    /// Build a file source, choosing `Document` for PDFs and `PlainText` otherwise
    pub fn from_file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let is_pdf = name.to_ascii_lowercase().ends_with(".pdf") || bytes.starts_with(b"%PDF-");
        if is_pdf {
            SourceDescriptor::Document { name, bytes }
        } else {
            SourceDescriptor::PlainText { name, bytes }
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceDescriptor::Document { .. } => SourceKind::Document,
            SourceDescriptor::PlainText { .. } => SourceKind::PlainText,
            SourceDescriptor::WebPage { .. } => SourceKind::WebPage,
            SourceDescriptor::VideoTranscript { .. } => SourceKind::VideoTranscript,
        }
    }

    /// Human readable label: file name or URL
    pub fn label(&self) -> &str {
        match self {
            SourceDescriptor::Document { name, .. } | SourceDescriptor::PlainText { name, .. } => {
                name
            }
            SourceDescriptor::WebPage { url } | SourceDescriptor::VideoTranscript { url, .. } => {
                url
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Document,
    PlainText,
    WebPage,
    VideoTranscript,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Document => write!(f, "document"),
            SourceKind::PlainText => write!(f, "text"),
            SourceKind::WebPage => write!(f, "web"),
            SourceKind::VideoTranscript => write!(f, "video"),
        }
    }
}

/// Timestamped caption line as delivered by the transcript source
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub text: String,
    /// Seconds from the start of the video
    pub start: f64,
    pub duration: f64,
}

/// A caption track advertised for a video
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub base_url: String,
    /// Speech-recognition track rather than a manually created one
    pub is_generated: bool,
}

/// Ledger entry for a successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub kind: SourceKind,
    pub label: String,
    /// Whitespace tokens contributed before bounding
    pub tokens: usize,
    pub summarized: bool,
    pub ingested_at: DateTime<Utc>,
}

/// Result of an ingestion
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub record: SourceRecord,
    /// Tokens dropped from the front of the knowledge base by the bounding policy
    pub tokens_discarded: usize,
    /// Knowledge base size after bounding
    pub knowledge_tokens: usize,
}

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

//! Source extractors. Each one turns a raw input into normalized plain text
//! or a typed failure; none of them touches session state.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pdf_extract::{Document, PlainTextOutput};
use tracing::{debug, warn};

use crate::config::KnowledgeConfig;
use crate::constants::HTML_WRAP_WIDTH;
use crate::error::ExtractionError;
use crate::knowledge::transcript::{TranscriptSource, VideoTranscriptExtractor, YoutubeTranscripts};
use crate::knowledge::types::SourceDescriptor;

pub struct SourceExtractor {
    client: reqwest::Client,
    video: VideoTranscriptExtractor,
}

impl SourceExtractor {
    /// Extractor backed by the live web and video transcript services
    pub fn new(config: &KnowledgeConfig) -> Result<Self, ExtractionError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.fetch_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        let transcripts = Arc::new(YoutubeTranscripts::new(client.clone()));
        Ok(Self::with_transcripts(client, transcripts, config))
    }

    pub fn with_transcripts(
        client: reqwest::Client,
        transcripts: Arc<dyn TranscriptSource>,
        config: &KnowledgeConfig,
    ) -> Self {
        Self {
            client,
            video: VideoTranscriptExtractor::new(
                transcripts,
                config.transcript_languages.clone(),
                config.transcript_batch_size,
            ),
        }
    }

    /// Single entry point for every source kind
    pub async fn extract(&self, source: &SourceDescriptor) -> Result<String, ExtractionError> {
        debug!(kind = %source.kind(), source = %source.label(), "Extracting source");
        match source {
            SourceDescriptor::Document { bytes, .. } => extract_document(bytes),
            SourceDescriptor::PlainText { bytes, .. } => extract_plain_text(bytes),
            SourceDescriptor::WebPage { url } => {
                let html = self.fetch_page(url).await?;
                html_to_text(&html)
            }
            SourceDescriptor::VideoTranscript { url, credential } => {
                self.video.extract(url, credential.as_deref()).await
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ExtractionError> {
        let trimmed = url.trim();
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ExtractionError::InvalidUrl(format!(
                "must start with http:// or https://, got: {}",
                trimmed
            )));
        }

        let response = self.client.get(trimmed).send().await?;

        if !response.status().is_success() {
            return Err(ExtractionError::SourceUnavailable(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

/// Text of every page, each followed by a newline. A page the parser cannot
/// handle contributes an empty string; only a document that fails to load is
/// an error. A document without pages yields an empty string.
pub fn extract_document(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut doc = without_panic_output(|| Document::load_mem(bytes))
        .map_err(|message| {
            ExtractionError::Parse(format!("document parser crashed: {}", message))
        })?
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        doc.decrypt("")
            .map_err(|e| ExtractionError::Parse(format!("encrypted document: {}", e)))?;
    }

    let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
    let mut text = String::new();

    for page in page_numbers {
        match extract_page(&doc, page) {
            Ok(page_text) => text.push_str(&page_text),
            Err(reason) => warn!(page, reason = %reason, "Skipping unreadable document page"),
        }
        text.push('\n');
    }

    Ok(text)
}

fn extract_page(doc: &Document, page: u32) -> Result<String, String> {
    without_panic_output(|| {
        let mut page_text = String::new();
        let rendered = {
            let mut output = PlainTextOutput::new(&mut page_text);
            pdf_extract::output_doc_page(doc, &mut output, page)
        };
        rendered.map(|()| page_text)
    })?
    .map_err(|e| e.to_string())
}

// Serializes swaps of the process-wide panic hook
static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f`, turning a panic into its message. The PDF parser reports many
/// malformed structures by panicking; the default hook would print those
/// straight into the terminal.
fn without_panic_output<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    let _guard = PANIC_HOOK_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);

    result.map_err(|payload| {
        if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown parser failure".to_string()
        }
    })
}

pub fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Decode(e.to_string()))
}

/// Visible text of an HTML document; markup, scripts and styles are dropped
pub fn html_to_text(html: &str) -> Result<String, ExtractionError> {
    html2text::config::plain()
        .raw_mode(true)
        .no_link_wrapping()
        .string_from_read(html.as_bytes(), HTML_WRAP_WIDTH)
        .map_err(|e| ExtractionError::Parse(e.to_string()))
}

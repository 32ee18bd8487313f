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

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::knowledge::chunker::TranscriptChunker;
use crate::knowledge::types::{CaptionTrack, TranscriptEntry};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const VISITOR_COOKIE: &str = "VISITOR_INFO1_LIVE";

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern is valid")
});

/// Extract the 11-character video id from a watch or short URL
pub fn parse_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Where caption tracks and their timed text come from
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the caption tracks advertised for a video
    async fn list_tracks(
        &self,
        video_id: &str,
        credential: Option<&str>,
    ) -> Result<Vec<CaptionTrack>, ExtractionError>;

    /// Download and parse one track
    async fn fetch(
        &self,
        track: &CaptionTrack,
        credential: Option<&str>,
    ) -> Result<Vec<TranscriptEntry>, ExtractionError>;
}

/// Pick the first track matching the candidate languages in order,
/// preferring manually created tracks over generated ones for each language
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let candidates = || tracks.iter().filter(move |t| &t.language_code == lang);
        candidates()
            .find(|t| !t.is_generated)
            .or_else(|| candidates().next())
    })
}

/// Video transcript extractor: id validation, language fallback, reassembly
pub struct VideoTranscriptExtractor {
    source: Arc<dyn TranscriptSource>,
    languages: Vec<String>,
    chunker: TranscriptChunker,
}

impl VideoTranscriptExtractor {
    pub fn new(source: Arc<dyn TranscriptSource>, languages: Vec<String>, batch_size: usize) -> Self {
        Self {
            source,
            languages,
            chunker: TranscriptChunker::new(batch_size),
        }
    }

    pub async fn extract(
        &self,
        url: &str,
        credential: Option<&str>,
    ) -> Result<String, ExtractionError> {
        let video_id =
            parse_video_id(url).ok_or_else(|| ExtractionError::InvalidUrl(url.to_string()))?;
        let credential = credential.filter(|c| !c.trim().is_empty());

        let tracks = self.source.list_tracks(video_id, credential).await?;
        debug!(
            video_id,
            tracks = tracks.len(),
            "Caption tracks listed"
        );

        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            ExtractionError::TranscriptUnavailable {
                requested: self.languages.clone(),
                available: tracks.iter().map(|t| t.language_code.clone()).collect(),
            }
        })?;

        let entries = self.source.fetch(track, credential).await?;
        let covered_secs = entries
            .last()
            .map(|e| e.start + e.duration)
            .unwrap_or_default();
        info!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated,
            entries = entries.len(),
            covered_secs,
            "Transcript retrieved"
        );

        Ok(self.chunker.reassemble(&entries).trim().to_string())
    }
}

/// Transcript retrieval from the public watch page and its timed-text tracks
pub struct YoutubeTranscripts {
    client: reqwest::Client,
}

impl YoutubeTranscripts {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn get(&self, url: &str, credential: Option<&str>) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9,en;q=0.8");
        match credential {
            Some(value) => request.header(
                reqwest::header::COOKIE,
                format!("{}={}", VISITOR_COOKIE, value),
            ),
            None => request,
        }
    }

    async fn fetch_text(&self, url: &str, credential: Option<&str>) -> Result<String, ExtractionError> {
        let response = self.get(url, credential).send().await?;
        if !response.status().is_success() {
            return Err(ExtractionError::SourceUnavailable(format!(
                "HTTP error: {}",
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    async fn list_tracks(
        &self,
        video_id: &str,
        credential: Option<&str>,
    ) -> Result<Vec<CaptionTrack>, ExtractionError> {
        let html = self
            .fetch_text(&format!("{}{}", WATCH_URL, video_id), credential)
            .await?;
        parse_caption_tracks(&html)
    }

    async fn fetch(
        &self,
        track: &CaptionTrack,
        credential: Option<&str>,
    ) -> Result<Vec<TranscriptEntry>, ExtractionError> {
        let url = track.base_url.replace("&fmt=srv3", "");
        let xml = self.fetch_text(&url, credential).await?;
        parse_timed_text(&xml)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsJson {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawTrack>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

/// Read the caption track list embedded in a watch page
pub fn parse_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, ExtractionError> {
    let Some((_, captions)) = html.split_once("\"captions\":") else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(ExtractionError::SourceUnavailable(
                "too many requests, the video page requires a captcha".to_string(),
            ));
        }
        if !html.contains("\"playabilityStatus\":") {
            return Err(ExtractionError::SourceUnavailable(
                "video is unavailable".to_string(),
            ));
        }
        return Err(ExtractionError::TranscriptsDisabled);
    };

    // Only the first JSON value matters, the rest of the page is ignored
    let mut deserializer = serde_json::Deserializer::from_str(captions);
    let parsed = CaptionsJson::deserialize(&mut deserializer)
        .map_err(|e| ExtractionError::Parse(format!("caption metadata: {}", e)))?;

    let tracks: Vec<CaptionTrack> = parsed
        .player_captions_tracklist_renderer
        .map(|r| r.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(|raw| CaptionTrack {
            is_generated: raw.kind.as_deref() == Some("asr"),
            language_code: raw.language_code,
            base_url: raw.base_url,
        })
        .collect();

    if tracks.is_empty() {
        return Err(ExtractionError::TranscriptsDisabled);
    }
    Ok(tracks)
}

/// Parse a timed-text XML document into entries, skipping blank lines
pub fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptEntry>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                let mut start = 0.0;
                let mut duration = 0.0;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.as_ref() {
                        b"start" => start = value.parse().unwrap_or(0.0),
                        b"dur" => duration = value.parse().unwrap_or(0.0),
                        _ => {}
                    }
                }
                current = Some((start, duration, String::new()));
            }
            Ok(Event::Text(t)) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    raw.push('&');
                    raw.push_str(&String::from_utf8_lossy(&r));
                    raw.push(';');
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let text = unescape_caption(&raw);
                    if !text.trim().is_empty() {
                        entries.push(TranscriptEntry {
                            text,
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Parse(format!("timed text: {}", e))),
            _ => {}
        }
    }

    Ok(entries)
}

/// Caption text arrives XML-escaped around HTML-escaped content
fn unescape_caption(raw: &str) -> String {
    let once = unescape_or_raw(raw);
    unescape_or_raw(&once).replace('\n', " ")
}

fn unescape_or_raw(text: &str) -> String {
    quick_xml::escape::unescape(text)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

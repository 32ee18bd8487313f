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

/// Whitespace-token ceiling for the accumulated knowledge base
pub const DEFAULT_MAX_KNOWLEDGE_TOKENS: usize = 100_000;

/// Number of transcript entries joined per batch
pub const DEFAULT_TRANSCRIPT_BATCH_SIZE: usize = 1000;

/// Output bound handed to the summarizer when none is configured
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 1000;

/// Transcript languages tried in order
pub const DEFAULT_TRANSCRIPT_LANGUAGES: &[&str] = &["pt", "pt-BR"];

pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_MODEL_NAME: &str = "gemini-1.5-pro";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_USER_AGENT: &str = "kbchat/0.1";

/// Glyph the model likes to emit for bullets; rendered as a markdown asterisk
pub const BULLET_GLYPH: char = '•';
pub const BLOCKQUOTE_PREFIX: &str = "> ";

/// Width used when rendering HTML to plain text. Wide enough that paragraphs
/// and long words such as URLs are never broken across lines.
pub const HTML_WRAP_WIDTH: usize = 10_000;

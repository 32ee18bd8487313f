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

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::chat::Session;
use crate::commands::{read_file_source, FileFormat, Runtime};
use crate::formatting;
use crate::knowledge::SourceDescriptor;

const HELP: &str = "\
Commands:
  /pdf <path>               add a PDF document to the knowledge base
  /text <path>              add a plain text file
  /url <url>                add the visible text of a web page
  /video <url> [credential] add a video transcript
  /summarize on|off         summarize video transcripts before adding them
  /sources                  list ingested sources
  /kb                       knowledge base statistics
  /history                  show the conversation
  /reset                    clear the conversation and the knowledge base
  /help                     show this help
  /quit                     leave
Anything else is sent to the assistant.";

#[derive(Debug, PartialEq)]
pub enum ReplCommand {
    Empty,
    Message(String),
    Pdf(PathBuf),
    Text(PathBuf),
    Url(String),
    Video {
        url: String,
        credential: Option<String>,
    },
    Summarize(bool),
    Sources,
    Knowledge,
    History,
    Reset,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Message(line.to_string());
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match (name, args) {
        ("pdf", path) if !path.is_empty() => ReplCommand::Pdf(PathBuf::from(path)),
        ("text", path) if !path.is_empty() => ReplCommand::Text(PathBuf::from(path)),
        ("url", url) if !url.is_empty() => ReplCommand::Url(url.to_string()),
        ("video", args) if !args.is_empty() => {
            let mut parts = args.split_whitespace();
            let url = parts.next().unwrap_or_default().to_string();
            let credential = parts.next().map(String::from);
            ReplCommand::Video { url, credential }
        }
        ("summarize", "on") => ReplCommand::Summarize(true),
        ("summarize", "off") => ReplCommand::Summarize(false),
        ("sources", _) => ReplCommand::Sources,
        ("kb", _) => ReplCommand::Knowledge,
        ("history", _) => ReplCommand::History,
        ("reset", _) => ReplCommand::Reset,
        ("help", _) => ReplCommand::Help,
        ("quit", _) | ("exit", _) => ReplCommand::Quit,
        _ => ReplCommand::Invalid(line.to_string()),
    }
}

/// Interactive chat bound to one session
pub struct Repl {
    runtime: Runtime,
    session: Session,
    summarize_videos: bool,
}

impl Repl {
    pub fn new(runtime: Runtime, summarize_videos: bool) -> Self {
        let session = runtime.new_session();
        Self {
            runtime,
            session,
            summarize_videos,
        }
    }

    /// Ingest a source and print the outcome; failures never end the session
    pub async fn ingest(&mut self, source: &SourceDescriptor, summarize: bool) {
        match self
            .runtime
            .ingestor
            .ingest(&mut self.session, source, summarize)
            .await
        {
            Ok(report) => println!("{}", formatting::format_ingest_report(&report)),
            Err(e) => println!(
                "{}",
                formatting::format_error(&format!("Failed to process {}", source.label()), &e)
            ),
        }
    }

    async fn ingest_file(&mut self, path: &Path, format: FileFormat) {
        match read_file_source(path, format).await {
            Ok(source) => self.ingest(&source, false).await,
            Err(e) => println!("{}", formatting::format_error("Failed to read file", &e)),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut reader = BufReader::new(stdin());
        let mut out = stdout();
        let mut line = String::new();

        info!(session = %self.session.id(), "Chat session started");
        println!(
            "{}",
            "kbchat: type a message, or /help for commands".bold()
        );

        loop {
            out.write_all(b"\n> ").await?;
            out.flush().await?;

            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                debug!("EOF received, leaving chat");
                break;
            }

            if !self.handle(parse_command(&line)).await? {
                break;
            }
        }

        info!(session = %self.session.id(), "Chat session ended");
        Ok(())
    }

    /// Returns false when the user asked to leave
    async fn handle(&mut self, command: ReplCommand) -> Result<bool> {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Message(message) => {
                match self.runtime.engine.send(&mut self.session, &message).await {
                    Ok(reply) => println!("\n{}", reply),
                    Err(e) => println!(
                        "{}",
                        formatting::format_error("Failed to generate a response", &e)
                    ),
                }
            }
            ReplCommand::Pdf(path) => self.ingest_file(&path, FileFormat::Pdf).await,
            ReplCommand::Text(path) => self.ingest_file(&path, FileFormat::Text).await,
            ReplCommand::Url(url) => {
                self.ingest(&SourceDescriptor::WebPage { url }, false).await;
            }
            ReplCommand::Video { url, credential } => {
                let summarize = self.summarize_videos;
                self.ingest(&SourceDescriptor::VideoTranscript { url, credential }, summarize)
                    .await;
            }
            ReplCommand::Summarize(enabled) => {
                self.summarize_videos = enabled;
                println!(
                    "Video summarization {}",
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            ReplCommand::Sources => {
                println!("{}", formatting::format_source_list(self.session.sources()))
            }
            ReplCommand::Knowledge => {
                println!("{}", formatting::format_knowledge_stats(&self.session))
            }
            ReplCommand::History => println!("{}", formatting::format_history(&self.session)),
            ReplCommand::Reset => {
                self.session.reset();
                info!(session = %self.session.id(), "Session reset");
                println!("Conversation and knowledge base cleared");
            }
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Invalid(input) => {
                println!("Unrecognized command: {} (try /help)", input)
            }
        }
        Ok(true)
    }
}

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

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::chat::{ChatEngine, Session};
use crate::cli::{Commands, ExtractSource, SourceArgs};
use crate::config::Config;
use crate::formatting;
use crate::knowledge::{Ingestor, KnowledgeBudget, SourceDescriptor, SourceExtractor, Summarizer};
use crate::model::{GeminiClient, ModelClient};
use crate::repl::Repl;

/// Everything a session needs to ingest sources and run turns
pub struct Runtime {
    pub ingestor: Ingestor,
    pub engine: ChatEngine,
    pub budget: KnowledgeBudget,
}

impl Runtime {
    /// Fails when the model API key is missing; callers treat that as fatal
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        let budget = KnowledgeBudget::new(config.knowledge.max_tokens)?;

        let model: Arc<dyn ModelClient> = Arc::new(
            GeminiClient::new(&config.model, api_key).context("Failed to create model client")?,
        );
        let extractor = SourceExtractor::new(&config.knowledge)
            .context("Failed to create HTTP client for extraction")?;
        let summarizer = Summarizer::new(model.clone(), config.summary.clone());

        Ok(Self {
            ingestor: Ingestor::new(extractor, summarizer),
            engine: ChatEngine::new(model, &config.chat),
            budget,
        })
    }

    pub fn new_session(&self) -> Session {
        Session::new(self.budget)
    }
}

pub async fn execute(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Chat { sources } => {
            let runtime = Runtime::new(config)?;
            let mut repl = Repl::new(runtime, sources.summarize);
            for (source, summarize) in collect_sources(&sources).await? {
                repl.ingest(&source, summarize).await;
            }
            repl.run().await
        }
        Commands::Ask { message, sources } => {
            let runtime = Runtime::new(config)?;
            let mut session = runtime.new_session();

            for (source, summarize) in collect_sources(&sources).await? {
                match runtime.ingestor.ingest(&mut session, &source, summarize).await {
                    Ok(report) => eprintln!("{}", formatting::format_ingest_report(&report)),
                    Err(e) => eprintln!("{}", formatting::format_error(source.label(), &e)),
                }
            }

            let reply = runtime.engine.send(&mut session, &message).await?;
            println!("{}", reply);
            Ok(())
        }
        Commands::Extract { source } => {
            let extractor = SourceExtractor::new(&config.knowledge)?;
            let descriptor = match source {
                ExtractSource::File { path } => {
                    read_file_source(&path, FileFormat::Detect).await?
                }
                ExtractSource::Url { url } => SourceDescriptor::WebPage { url },
                ExtractSource::Video { url, credential } => {
                    SourceDescriptor::VideoTranscript { url, credential }
                }
            };
            let text = extractor.extract(&descriptor).await?;
            println!("{}", text);
            Ok(())
        }
        Commands::Config => {
            println!("# {}", Config::default_path()?.display());
            println!("{}", toml::to_string_pretty(config)?);
            match config.api_key() {
                Ok(_) => println!("# API key: set via ${}", config.model.api_key_env),
                Err(e) => println!("# API key ({}): {}", e.kind(), e),
            }
            Ok(())
        }
    }
}

/// Sources from the command line, paired with whether to summarize them.
/// Only video transcripts honour `--summarize`.
async fn collect_sources(args: &SourceArgs) -> Result<Vec<(SourceDescriptor, bool)>> {
    let mut sources = Vec::new();

    for path in &args.files {
        sources.push((read_file_source(path, FileFormat::Detect).await?, false));
    }
    for path in &args.pdfs {
        sources.push((read_file_source(path, FileFormat::Pdf).await?, false));
    }
    for path in &args.texts {
        sources.push((read_file_source(path, FileFormat::Text).await?, false));
    }
    for url in &args.urls {
        sources.push((SourceDescriptor::WebPage { url: url.clone() }, false));
    }
    for url in &args.videos {
        sources.push((
            SourceDescriptor::VideoTranscript {
                url: url.clone(),
                credential: args.credential.clone(),
            },
            args.summarize,
        ));
    }

    Ok(sources)
}

/// How the bytes of a file source are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Decide from the `.pdf` extension or the `%PDF-` header
    Detect,
    Pdf,
    Text,
}

pub async fn read_file_source(path: &Path, format: FileFormat) -> Result<SourceDescriptor> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(match format {
        FileFormat::Detect => SourceDescriptor::from_file(name, bytes),
        FileFormat::Pdf => SourceDescriptor::Document { name, bytes },
        FileFormat::Text => SourceDescriptor::PlainText { name, bytes },
    })
}

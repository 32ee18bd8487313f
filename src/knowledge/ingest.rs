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

use chrono::Utc;
use tracing::{info, warn};

use crate::chat::session::Session;
use crate::error::IngestError;
use crate::knowledge::budget::KnowledgeBudget;
use crate::knowledge::extractor::SourceExtractor;
use crate::knowledge::summarizer::Summarizer;
use crate::knowledge::types::{IngestReport, SourceDescriptor, SourceRecord};

/// Extraction, optional summarization, append and bounding in one step
pub struct Ingestor {
    extractor: SourceExtractor,
    summarizer: Summarizer,
}

impl Ingestor {
    pub fn new(extractor: SourceExtractor, summarizer: Summarizer) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Ingest one source into the session's knowledge base.
    /// On any failure the session is left untouched.
    pub async fn ingest(
        &self,
        session: &mut Session,
        source: &SourceDescriptor,
        summarize: bool,
    ) -> Result<IngestReport, IngestError> {
        let extracted = self.extractor.extract(source).await.map_err(|e| {
            warn!(source = %source.label(), kind = %e.kind(), error = %e, "Extraction failed");
            e
        })?;

        let content = if summarize {
            self.summarizer
                .summarize(&extracted, self.summarizer.default_max_tokens())
                .await?
        } else {
            extracted
        };

        let record = SourceRecord {
            kind: source.kind(),
            label: source.label().to_string(),
            tokens: KnowledgeBudget::count_tokens(&content),
            summarized: summarize,
            ingested_at: Utc::now(),
        };

        let tokens_discarded = session.add_knowledge(record.clone(), &content);
        let knowledge_tokens = session.knowledge_base().token_count();

        if tokens_discarded > 0 {
            warn!(
                session = %session.id(),
                discarded = tokens_discarded,
                budget = session.knowledge_base().budget().max_tokens(),
                "Knowledge base over budget, oldest content dropped"
            );
        }
        info!(
            session = %session.id(),
            source = %record.label,
            kind = %record.kind,
            tokens = record.tokens,
            summarized = record.summarized,
            knowledge_tokens,
            "Source ingested"
        );

        Ok(IngestReport {
            record,
            tokens_discarded,
            knowledge_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KnowledgeConfig, SummaryConfig};
    use crate::error::{ExtractionError, ModelError};
    use crate::knowledge::types::SourceKind;
    use crate::model::testing::ScriptedModel;
    use std::sync::Arc;

    fn ingestor(model: ScriptedModel) -> Ingestor {
        let extractor = SourceExtractor::new(&KnowledgeConfig::default()).unwrap();
        let summarizer = Summarizer::new(Arc::new(model), SummaryConfig::default());
        Ingestor::new(extractor, summarizer)
    }

    fn text(name: &str, body: &str) -> SourceDescriptor {
        SourceDescriptor::PlainText {
            name: name.to_string(),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_ingest_appends_and_records() {
        let ingestor = ingestor(ScriptedModel::new());
        let mut session = Session::new(KnowledgeBudget::new(100).unwrap());

        let report = ingestor
            .ingest(&mut session, &text("a.txt", "alpha beta gamma"), false)
            .await
            .unwrap();

        assert_eq!(report.record.kind, SourceKind::PlainText);
        assert_eq!(report.record.tokens, 3);
        assert!(!report.record.summarized);
        assert_eq!(report.tokens_discarded, 0);
        assert_eq!(report.knowledge_tokens, 3);
        assert_eq!(session.knowledge_base().as_str(), "alpha beta gamma");
        assert_eq!(session.sources().len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_bounds_knowledge() {
        let ingestor = ingestor(ScriptedModel::new());
        let mut session = Session::new(KnowledgeBudget::new(4).unwrap());

        ingestor
            .ingest(&mut session, &text("a.txt", "one two three"), false)
            .await
            .unwrap();
        let report = ingestor
            .ingest(&mut session, &text("b.txt", "four five six"), false)
            .await
            .unwrap();

        assert_eq!(report.tokens_discarded, 2);
        assert_eq!(session.knowledge_base().as_str(), "three four five six");
    }

    #[tokio::test]
    async fn test_ingest_with_summary() {
        let ingestor = ingestor(ScriptedModel::new().reply("resumo"));
        let mut session = Session::new(KnowledgeBudget::new(100).unwrap());

        let report = ingestor
            .ingest(&mut session, &text("long.txt", "muito texto aqui"), true)
            .await
            .unwrap();

        assert!(report.record.summarized);
        assert_eq!(session.knowledge_base().as_str(), "resumo");
    }

    #[tokio::test]
    async fn test_failed_extraction_leaves_session_unchanged() {
        let ingestor = ingestor(ScriptedModel::new());
        let mut session = Session::new(KnowledgeBudget::new(100).unwrap());
        ingestor
            .ingest(&mut session, &text("a.txt", "existing knowledge"), false)
            .await
            .unwrap();

        let video = SourceDescriptor::VideoTranscript {
            url: "not a url".to_string(),
            credential: None,
        };
        let err = ingestor.ingest(&mut session, &video, false).await.unwrap_err();

        assert!(matches!(
            err,
            IngestError::Extraction(ExtractionError::InvalidUrl(_))
        ));
        assert_eq!(session.knowledge_base().as_str(), "existing knowledge");
        assert_eq!(session.sources().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_summary_leaves_session_unchanged() {
        let ingestor = ingestor(
            ScriptedModel::new().fail(ModelError::Transport("connection reset".into())),
        );
        let mut session = Session::new(KnowledgeBudget::new(100).unwrap());

        let err = ingestor
            .ingest(&mut session, &text("a.txt", "content"), true)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Summary(_)));
        assert!(session.knowledge_base().is_empty());
        assert!(session.sources().is_empty());
    }
}

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SummaryConfig;
use crate::error::IngestError;
use crate::model::ModelClient;

/// Condenses extracted text through the model, keeping the most salient facts
pub struct Summarizer {
    model: Arc<dyn ModelClient>,
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(model: Arc<dyn ModelClient>, config: SummaryConfig) -> Self {
        Self { model, config }
    }

    pub fn default_max_tokens(&self) -> u32 {
        self.config.max_tokens
    }

    /// Summarize `content` within `max_tokens` model tokens.
    /// Failures are returned as errors, never as summary text.
    pub async fn summarize(&self, content: &str, max_tokens: u32) -> Result<String, IngestError> {
        let prompt = summary_prompt(content, max_tokens);
        let sampling = self.config.sampling(max_tokens);

        let response = self
            .model
            .generate(&prompt, &sampling)
            .await
            .map_err(|e| {
                warn!(error = %e, "Summarization failed");
                IngestError::Summary(e)
            })?;

        let summary = response.text().ok_or(IngestError::EmptySummary)?;
        debug!(
            input_chars = content.len(),
            summary_chars = summary.len(),
            "Content summarized"
        );
        Ok(summary)
    }
}

fn summary_prompt(content: &str, max_tokens: u32) -> String {
    format!(
        "Resuma o seguinte texto em no máximo {} tokens, mantendo as informações mais importantes:\n\n{}",
        max_tokens, content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model::testing::ScriptedModel;

    #[tokio::test]
    async fn test_summary_uses_fixed_sampling() {
        let model = Arc::new(ScriptedModel::new().reply("resumo curto"));
        let summarizer = Summarizer::new(model.clone(), SummaryConfig::default());

        let summary = summarizer.summarize("texto longo", 1000).await.unwrap();
        assert_eq!(summary, "resumo curto");

        let sampling = model.last_sampling().unwrap();
        assert_eq!(sampling.temperature, 0.5);
        assert_eq!(sampling.top_p, 0.95);
        assert_eq!(sampling.top_k, 40);
        assert_eq!(sampling.max_output_tokens, 1000);

        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("1000 tokens"));
        assert!(prompt.ends_with("\n\ntexto longo"));
    }

    #[tokio::test]
    async fn test_model_failure_is_an_error_not_text() {
        let model = Arc::new(ScriptedModel::new().fail(ModelError::Api {
            status: 429,
            message: "quota".into(),
        }));
        let summarizer = Summarizer::new(model, SummaryConfig::default());

        let err = summarizer.summarize("texto", 200).await.unwrap_err();
        assert!(matches!(err, IngestError::Summary(ModelError::Api { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let model = Arc::new(ScriptedModel::new().empty());
        let summarizer = Summarizer::new(model, SummaryConfig::default());

        assert!(matches!(
            summarizer.summarize("texto", 200).await,
            Err(IngestError::EmptySummary)
        ));
    }
}

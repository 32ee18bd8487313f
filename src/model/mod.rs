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

pub mod gemini;
pub mod types;

pub use gemini::GeminiClient;
pub use types::{ModelResponse, SamplingConfig};

use async_trait::async_trait;

use crate::error::ModelError;

/// Text-completion service consumed by the summarizer and the chat engine
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(
        &self,
        prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<ModelResponse, ModelError>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted model returning queued outcomes and recording prompts
    #[derive(Default)]
    pub struct ScriptedModel {
        outcomes: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
        pub prompts: Mutex<Vec<(String, SamplingConfig)>>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.push(Ok(ModelResponse::from_text(text)))
        }

        pub fn empty(self) -> Self {
            self.push(Ok(ModelResponse::default()))
        }

        pub fn fail(self, err: ModelError) -> Self {
            self.push(Err(err))
        }

        fn push(self, outcome: Result<ModelResponse, ModelError>) -> Self {
            self.outcomes.lock().unwrap().push_back(outcome);
            self
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().map(|(p, _)| p.clone())
        }

        pub fn last_sampling(&self) -> Option<SamplingConfig> {
            self.prompts.lock().unwrap().last().map(|(_, s)| s.clone())
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn generate(
            &self,
            prompt: &str,
            sampling: &SamplingConfig,
        ) -> Result<ModelResponse, ModelError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), sampling.clone()));
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::Transport("no scripted response".into())))
        }
    }
}

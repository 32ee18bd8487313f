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

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chat::assembler::{format_reply, PromptAssembler};
use crate::chat::session::{ConversationTurn, Session};
use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::model::{ModelClient, SamplingConfig};

/// Phases of a single conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    UserMessageReceived,
    PromptAssembled,
    ModelInvoked,
    ResponseAccepted,
    ResponseEmpty,
    ModelError,
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnState::Idle => write!(f, "idle"),
            TurnState::UserMessageReceived => write!(f, "user_message_received"),
            TurnState::PromptAssembled => write!(f, "prompt_assembled"),
            TurnState::ModelInvoked => write!(f, "model_invoked"),
            TurnState::ResponseAccepted => write!(f, "response_accepted"),
            TurnState::ResponseEmpty => write!(f, "response_empty"),
            TurnState::ModelError => write!(f, "model_error"),
        }
    }
}

/// Runs conversational turns against the model
pub struct ChatEngine {
    model: Arc<dyn ModelClient>,
    assembler: PromptAssembler,
    sampling: SamplingConfig,
}

impl ChatEngine {
    pub fn new(model: Arc<dyn ModelClient>, config: &ChatConfig) -> Self {
        Self {
            model,
            assembler: PromptAssembler::new(config),
            sampling: config.sampling(),
        }
    }

    /// Run one turn and return the display-ready assistant reply.
    ///
    /// The user turn is logged before the model is called. On an empty
    /// response or a model failure the log keeps only that user turn and the
    /// error is returned; the session stays usable.
    pub async fn send(&self, session: &mut Session, message: &str) -> Result<String, ChatError> {
        let session_id = session.id();
        let mut state = TurnState::Idle;
        let mut advance = |next: TurnState| {
            debug!(session = %session_id, from = %state, to = %next, "Turn state");
            state = next;
        };

        session.push_turn(ConversationTurn::user(message));
        advance(TurnState::UserMessageReceived);

        let prompt = self.assembler.build_prompt(
            session.knowledge_base().as_str(),
            session.messages(),
            message,
        );
        advance(TurnState::PromptAssembled);

        advance(TurnState::ModelInvoked);
        let response = match self.model.generate(&prompt, &self.sampling).await {
            Ok(response) => response,
            Err(e) => {
                advance(TurnState::ModelError);
                let err = ChatError::Model(e);
                warn!(session = %session_id, kind = %err.kind(), error = %err, "Model call failed");
                return Err(err);
            }
        };

        let Some(text) = response.text() else {
            advance(TurnState::ResponseEmpty);
            warn!(session = %session_id, "Model returned no content");
            return Err(ChatError::EmptyResponse);
        };

        let reply = format_reply(&text);
        session.push_turn(ConversationTurn::assistant(reply.clone()));
        advance(TurnState::ResponseAccepted);

        info!(
            session = %session_id,
            turns = session.messages().len(),
            prompt_chars = prompt.len(),
            reply_chars = reply.len(),
            "Turn completed"
        );
        Ok(reply)
    }
}

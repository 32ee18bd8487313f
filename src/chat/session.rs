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

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::knowledge::budget::{KnowledgeBase, KnowledgeBudget};
use crate::knowledge::types::SourceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-session state: turn log, knowledge base and ingestion ledger.
/// Every concurrent session owns its own instance.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    messages: Vec<ConversationTurn>,
    knowledge_base: KnowledgeBase,
    sources: Vec<SourceRecord>,
}

impl Session {
    pub fn new(budget: KnowledgeBudget) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            knowledge_base: KnowledgeBase::new(budget),
            sources: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ConversationTurn] {
        &self.messages
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    /// Turns are only ever appended; the log is never reordered
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.messages.push(turn);
    }

    /// Append extracted content to the knowledge base and record its source.
    /// Returns the number of tokens the bounding policy discarded.
    pub fn add_knowledge(&mut self, record: SourceRecord, content: &str) -> usize {
        let discarded = self.knowledge_base.append(content);
        self.sources.push(record);
        discarded
    }

    /// Return the turn log, knowledge base and ledger to their empty defaults
    pub fn reset(&mut self) {
        self.messages.clear();
        self.knowledge_base.clear();
        self.sources.clear();
    }
}

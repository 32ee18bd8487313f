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

#[cfg(test)]
mod tests {
    use super::super::engine::ChatEngine;
    use super::super::session::{ConversationTurn, Role, Session};
    use crate::config::ChatConfig;
    use crate::error::{ChatError, ModelError};
    use crate::knowledge::budget::KnowledgeBudget;
    use crate::knowledge::types::{SourceKind, SourceRecord};
    use crate::model::testing::ScriptedModel;
    use chrono::Utc;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(KnowledgeBudget::new(100_000).unwrap())
    }

    fn engine(model: &Arc<ScriptedModel>) -> ChatEngine {
        ChatEngine::new(model.clone(), &ChatConfig::default())
    }

    #[tokio::test]
    async fn test_end_to_end_turn() {
        let model = Arc::new(ScriptedModel::new().reply("Oi! • Tudo bem?"));
        let mut session = session();

        let reply = engine(&model).send(&mut session, "Olá").await.unwrap();

        assert_eq!(reply, "> Oi! * Tudo bem?");
        assert_eq!(
            session.messages(),
            &[
                ConversationTurn::user("Olá"),
                ConversationTurn::assistant("> Oi! * Tudo bem?"),
            ]
        );
        assert!(session.knowledge_base().is_empty());
    }

    #[tokio::test]
    async fn test_chat_sampling() {
        let model = Arc::new(ScriptedModel::new().reply("ok"));
        let mut session = session();

        engine(&model).send(&mut session, "Olá").await.unwrap();

        let sampling = model.last_sampling().unwrap();
        assert_eq!(sampling.temperature, 0.8);
        assert_eq!(sampling.top_p, 0.95);
        assert_eq!(sampling.top_k, 40);
        assert_eq!(sampling.max_output_tokens, 8192);
    }

    #[tokio::test]
    async fn test_empty_response_keeps_only_user_turn() {
        let model = Arc::new(ScriptedModel::new().empty());
        let mut session = session();

        let err = engine(&model).send(&mut session, "Olá").await.unwrap_err();

        assert!(matches!(err, ChatError::EmptyResponse));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_model_error_keeps_only_user_turn() {
        let model = Arc::new(ScriptedModel::new().fail(ModelError::Api {
            status: 500,
            message: "internal".into(),
        }));
        let mut session = session();

        let err = engine(&model).send(&mut session, "Olá").await.unwrap_err();

        assert!(matches!(err, ChatError::Model(ModelError::Api { status: 500, .. })));
        assert_eq!(session.messages(), &[ConversationTurn::user("Olá")]);
    }

    #[tokio::test]
    async fn test_session_usable_after_failure() {
        let model = Arc::new(ScriptedModel::new().empty().reply("Agora sim"));
        let engine = engine(&model);
        let mut session = session();

        assert!(engine.send(&mut session, "primeira").await.is_err());
        let reply = engine.send(&mut session, "segunda").await.unwrap();

        assert_eq!(reply, "> Agora sim");
        assert_eq!(session.messages().len(), 3);
        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("user: primeira\nuser: segunda"));
    }

    #[tokio::test]
    async fn test_prompt_contains_knowledge_and_history() {
        let model = Arc::new(ScriptedModel::new().reply("primeira").reply("segunda"));
        let engine = engine(&model);
        let mut session = session();
        session.add_knowledge(
            SourceRecord {
                kind: SourceKind::WebPage,
                label: "https://example.com".to_string(),
                tokens: 4,
                summarized: false,
                ingested_at: Utc::now(),
            },
            "O céu é azul.",
        );

        engine.send(&mut session, "De que cor é o céu?").await.unwrap();
        engine.send(&mut session, "E o mar?").await.unwrap();

        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("Conhecimento Adicional:\nO céu é azul.\n\n"));
        assert!(prompt.contains(
            "Histórico da conversa:\nuser: De que cor é o céu?\nassistant: > primeira\nuser: E o mar?\n\n"
        ));
        assert!(prompt.ends_with("Usuário: E o mar?\nAssistente:"));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_turn_does_not_touch_knowledge() {
        let model = Arc::new(ScriptedModel::new().reply("ok"));
        let mut session = session();
        session.add_knowledge(
            SourceRecord {
                kind: SourceKind::PlainText,
                label: "notes.txt".to_string(),
                tokens: 2,
                summarized: false,
                ingested_at: Utc::now(),
            },
            "fixed knowledge",
        );

        engine(&model).send(&mut session, "Olá").await.unwrap();
        assert_eq!(session.knowledge_base().as_str(), "fixed knowledge");
    }
}

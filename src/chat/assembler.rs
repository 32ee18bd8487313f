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

use crate::chat::session::ConversationTurn;
use crate::config::ChatConfig;
use crate::constants::{BLOCKQUOTE_PREFIX, BULLET_GLYPH};

/// Builds the single prompt sent to the model for a conversational turn
pub struct PromptAssembler {
    system_instruction: String,
    knowledge_label: String,
    history_label: String,
    user_label: String,
    assistant_label: String,
}

impl PromptAssembler {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            system_instruction: config.system_instruction.clone(),
            knowledge_label: config.knowledge_label.clone(),
            history_label: config.history_label.clone(),
            user_label: config.user_label.clone(),
            assistant_label: config.assistant_label.clone(),
        }
    }

    /// Layout:
    ///
    /// ```text
    /// <system instruction>
    ///
    /// <knowledge label>:
    /// <knowledge base>
    ///
    /// <history label>:
    /// user: ...
    /// assistant: ...
    ///
    /// <user label>: <message>
    /// <assistant label>:
    /// ```
    pub fn build_prompt(
        &self,
        knowledge: &str,
        history: &[ConversationTurn],
        user_message: &str,
    ) -> String {
        let history = render_history(history);
        format!(
            "{}\n\n{}:\n{}\n\n{}:\n{}\n\n{}: {}\n{}:",
            self.system_instruction,
            self.knowledge_label,
            knowledge,
            self.history_label,
            history,
            self.user_label,
            user_message,
            self.assistant_label
        )
    }
}

/// One `role: content` line per turn, in chronological order
pub fn render_history(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display form of a model reply: bullet glyphs become asterisks and every
/// line, blank ones included, is blockquoted
pub fn format_reply(text: &str) -> String {
    text.replace(BULLET_GLYPH, "*")
        .split_inclusive('\n')
        .map(|line| format!("{}{}", BLOCKQUOTE_PREFIX, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(&ChatConfig {
            system_instruction: "SYSTEM".to_string(),
            knowledge_label: "Knowledge".to_string(),
            history_label: "History".to_string(),
            user_label: "User".to_string(),
            assistant_label: "Assistant".to_string(),
            ..ChatConfig::default()
        })
    }

    #[test]
    fn test_prompt_layout() {
        let history = vec![
            ConversationTurn::user("Oi"),
            ConversationTurn::assistant("> Olá!"),
            ConversationTurn::user("Qual a capital?"),
        ];
        let prompt = assembler().build_prompt("Brasília é a capital.", &history, "Qual a capital?");

        assert_eq!(
            prompt,
            "SYSTEM\n\nKnowledge:\nBrasília é a capital.\n\nHistory:\nuser: Oi\nassistant: > Olá!\nuser: Qual a capital?\n\nUser: Qual a capital?\nAssistant:"
        );
    }

    #[test]
    fn test_prompt_with_empty_state() {
        let prompt = assembler().build_prompt("", &[], "Olá");
        assert_eq!(
            prompt,
            "SYSTEM\n\nKnowledge:\n\n\nHistory:\n\n\nUser: Olá\nAssistant:"
        );
    }

    #[test]
    fn test_default_labels() {
        let prompt = PromptAssembler::new(&ChatConfig::default()).build_prompt("kb", &[], "Olá");
        assert!(prompt.starts_with("Você é um assistente AI amigável."));
        assert!(prompt.contains("\n\nConhecimento Adicional:\nkb\n\n"));
        assert!(prompt.contains("Histórico da conversa:\n"));
        assert!(prompt.ends_with("Usuário: Olá\nAssistente:"));
    }

    #[test]
    fn test_format_reply_single_line() {
        assert_eq!(format_reply("Oi! • Tudo bem?"), "> Oi! * Tudo bem?");
    }

    #[test]
    fn test_format_reply_multiline_and_blank_lines() {
        assert_eq!(
            format_reply("Lista:\n\n• um\n• dois\n"),
            "> Lista:\n> \n> * um\n> * dois\n"
        );
    }

    #[test]
    fn test_format_reply_empty() {
        assert_eq!(format_reply(""), "");
    }
}

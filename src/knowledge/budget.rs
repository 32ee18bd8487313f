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

//! Knowledge base size bounding.
//!
//! Tokens are whitespace-delimited words. When the knowledge base grows past
//! the budget only the trailing `max_tokens` words are retained, rejoined with
//! single spaces. Text already within budget is left byte-for-byte unchanged,
//! which makes the policy idempotent.

use std::borrow::Cow;

use crate::error::ConfigError;

/// Trailing-window retention policy over whitespace tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeBudget {
    max_tokens: usize,
}

impl KnowledgeBudget {
    pub fn new(max_tokens: usize) -> Result<Self, ConfigError> {
        if max_tokens == 0 {
            return Err(ConfigError::InvalidBudget);
        }
        Ok(Self { max_tokens })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn count_tokens(text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// Keep only the most recent `max_tokens` tokens
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() <= self.max_tokens {
            return Cow::Borrowed(text);
        }
        Cow::Owned(tokens[tokens.len() - self.max_tokens..].join(" "))
    }
}

/// Accumulated knowledge text; never exceeds its budget after a mutation
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    text: String,
    budget: KnowledgeBudget,
}

impl KnowledgeBase {
    pub fn new(budget: KnowledgeBudget) -> Self {
        Self {
            text: String::new(),
            budget,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn token_count(&self) -> usize {
        KnowledgeBudget::count_tokens(&self.text)
    }

    pub fn budget(&self) -> KnowledgeBudget {
        self.budget
    }

    /// Append content and re-apply the budget.
    /// Returns the number of tokens discarded from the front.
    pub fn append(&mut self, content: &str) -> usize {
        if content.is_empty() {
            return 0;
        }
        // Keep the last old token and the first new token apart
        let needs_separator = self
            .text
            .chars()
            .last()
            .is_some_and(|c| !c.is_whitespace())
            && !content.starts_with(char::is_whitespace);
        if needs_separator {
            self.text.push('\n');
        }
        self.text.push_str(content);

        let before = self.token_count();
        if let Cow::Owned(bounded) = self.budget.apply(&self.text) {
            self.text = bounded;
            before - self.budget.max_tokens
        } else {
            0
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(n: usize) -> KnowledgeBudget {
        KnowledgeBudget::new(n).unwrap()
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(matches!(
            KnowledgeBudget::new(0),
            Err(ConfigError::InvalidBudget)
        ));
    }

    #[test]
    fn test_within_budget_unchanged() {
        let text = "  keep\n all   of this  ";
        let bounded = budget(10).apply(text);
        assert!(matches!(bounded, Cow::Borrowed(_)));
        assert_eq!(bounded, text);
    }

    #[test]
    fn test_trailing_window() {
        let tokens: Vec<String> = (1..=20).map(|i| format!("t{}", i)).collect();
        let text = tokens.join("\n\t ");
        let bounded = budget(5).apply(&text);
        assert_eq!(bounded, "t16 t17 t18 t19 t20");
    }

    #[test]
    fn test_idempotent() {
        let text = "one two three four five six seven";
        let policy = budget(4);
        let once = policy.apply(text).into_owned();
        let twice = policy.apply(&once).into_owned();
        assert_eq!(once, twice);
        assert_eq!(once, "four five six seven");
    }

    #[test]
    fn test_exactly_at_budget() {
        assert_eq!(budget(3).apply("a b c"), "a b c");
    }

    #[test]
    fn test_append_inserts_separator() {
        let mut kb = KnowledgeBase::new(budget(100));
        kb.append("first document");
        kb.append("second document");
        assert_eq!(kb.as_str(), "first document\nsecond document");
        assert_eq!(kb.token_count(), 4);
    }

    #[test]
    fn test_append_keeps_existing_whitespace() {
        let mut kb = KnowledgeBase::new(budget(100));
        kb.append("page one\n");
        kb.append("page two\n");
        assert_eq!(kb.as_str(), "page one\npage two\n");
    }

    #[test]
    fn test_append_bounds_and_reports_discarded() {
        let mut kb = KnowledgeBase::new(budget(3));
        assert_eq!(kb.append("a b"), 0);
        assert_eq!(kb.append("c d e"), 2);
        assert_eq!(kb.as_str(), "c d e");
        assert!(kb.token_count() <= kb.budget().max_tokens());
    }

    #[test]
    fn test_token_count_never_exceeds_budget() {
        let mut kb = KnowledgeBase::new(budget(50));
        for i in 0..40 {
            kb.append(&format!("chunk {} has a few words", i));
            assert!(kb.token_count() <= 50);
        }
        assert!(kb.as_str().ends_with("chunk 39 has a few words"));
    }

    #[test]
    fn test_clear() {
        let mut kb = KnowledgeBase::new(budget(10));
        kb.append("something");
        kb.clear();
        assert!(kb.is_empty());
        assert_eq!(kb.token_count(), 0);
    }
}

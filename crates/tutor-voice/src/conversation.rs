//! Append-only conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// How a user turn was entered. Decides whether its answer is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Typed,
    Spoken,
}

/// One exchange unit. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Set on user turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    pub at: DateTime<Utc>,
    /// Assistant message standing in for a failed completion.
    #[serde(default)]
    pub is_error: bool,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>, origin: Origin) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            origin: Some(origin),
            at: Utc::now(),
            is_error: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            origin: None,
            at: Utc::now(),
            is_error: false,
        }
    }

    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(content)
        }
    }
}

/// Single-writer log owned by the turn controller; readers get shared slices.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_only_on_user_turns() {
        let user = ConversationTurn::user("Explain democracy", Origin::Typed);
        let answer = ConversationTurn::assistant("Democracy is rule by the people.");
        assert_eq!(user.origin, Some(Origin::Typed));
        assert_eq!(answer.origin, None);
        assert!(!answer.is_error);
        assert!(ConversationTurn::assistant_error("Service unavailable").is_error);
    }

    #[test]
    fn log_appends_in_order() {
        let mut log = ConversationLog::new();
        log.append(ConversationTurn::user("Q1", Origin::Spoken));
        log.append(ConversationTurn::assistant("A1"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[0].content, "Q1");
        assert_eq!(log.last().unwrap().role, Role::Assistant);
    }

    #[test]
    fn turns_serialize_for_the_ui() {
        let turn = ConversationTurn::user("What is photosynthesis", Origin::Spoken);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["origin"], "spoken");

        let answer = serde_json::to_value(ConversationTurn::assistant("Sunlight.")).unwrap();
        assert!(answer.get("origin").is_none());
    }
}

//! Conversation turns and the caller-owned transcript.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
///
/// Callers may only submit `user` and `assistant` turns; the system slot is
/// reserved for the persona and never accepted from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A single immutable exchange entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered transcript replayed to the provider on every request.
///
/// The gateway keeps no copy between requests; the caller re-sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory(Vec<ConversationTurn>);

impl ConversationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn, preserving insertion order.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.0.push(turn);
    }

    /// Builder-style append.
    pub fn with_turn(mut self, turn: ConversationTurn) -> Self {
        self.push(turn);
        self
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Content of the most recent user turn, if any.
    pub fn latest_user_content(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::User)
            .map(|turn| turn.content.as_str())
    }
}

impl From<Vec<ConversationTurn>> for ConversationHistory {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self(turns)
    }
}

impl IntoIterator for ConversationHistory {
    type Item = ConversationTurn;
    type IntoIter = std::vec::IntoIter<ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

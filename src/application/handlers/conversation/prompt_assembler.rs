//! Prompt assembly: persona + caller input -> provider transcript.
//!
//! The transcript shape depends on the *provider*, not the flow. Backends
//! with a native system role get the persona as a leading `system` message;
//! backends without one get an opening exchange in which the persona is the
//! first user turn and the model acknowledges it.
//!
//! Caller history is transcribed verbatim: no turn is dropped, reordered or
//! re-tagged.

use crate::domain::conversation::{ConversationHistory, FlowSpec, HistoryPolicy};
use crate::domain::foundation::Timestamp;
use crate::ports::{Message, ProviderInfo, SystemRoleSupport};

/// What the caller sent, already decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowInput {
    /// A lone message (`{message}` or `{idea}`).
    Message(String),
    /// A full transcript (`{messages}`).
    History(ConversationHistory),
}

impl FlowInput {
    /// Number of caller turns carried.
    pub fn turn_count(&self) -> usize {
        match self {
            FlowInput::Message(_) => 1,
            FlowInput::History(history) => history.len(),
        }
    }

    /// Latest user-authored text, empty when there is none.
    pub fn latest_user_text(&self) -> &str {
        match self {
            FlowInput::Message(text) => text,
            FlowInput::History(history) => history.latest_user_content().unwrap_or(""),
        }
    }
}

/// Builds provider transcripts for one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptAssembler {
    system_role: SystemRoleSupport,
}

impl PromptAssembler {
    pub fn new(system_role: SystemRoleSupport) -> Self {
        Self { system_role }
    }

    /// Assembler matching a provider's system role handling.
    pub fn for_provider(info: &ProviderInfo) -> Self {
        Self::new(info.system_role)
    }

    /// Ordered transcript for `spec`, persona first.
    pub fn build(&self, spec: &FlowSpec, input: &FlowInput, today: &Timestamp) -> Vec<Message> {
        let persona = spec.persona.render(today);
        let mut messages = match self.system_role {
            SystemRoleSupport::Native => vec![Message::system(persona)],
            SystemRoleSupport::Simulated => vec![
                Message::user(persona),
                Message::assistant(spec.persona.acknowledgement),
            ],
        };

        match (spec.history_policy, input) {
            (HistoryPolicy::SingleMessage, input) => {
                messages.push(Message::user(input.latest_user_text()));
            }
            (HistoryPolicy::FullHistory, FlowInput::Message(text)) => {
                messages.push(Message::user(text.as_str()));
            }
            (HistoryPolicy::FullHistory, FlowInput::History(history)) => {
                messages.extend(
                    history
                        .turns()
                        .iter()
                        .map(|turn| Message::new(turn.role.into(), turn.content.as_str())),
                );
            }
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{ConversationTurn, ADVOCATE, STRATEGIST};
    use crate::ports::MessageRole;

    fn today() -> Timestamp {
        Timestamp::from_unix_secs(1_718_841_600) // 2024-06-20
    }

    fn five_turns() -> ConversationHistory {
        ConversationHistory::new()
            .with_turn(ConversationTurn::user("I want to build X"))
            .with_turn(ConversationTurn::assistant("Who pays for X?"))
            .with_turn(ConversationTurn::user("Hospitals"))
            .with_turn(ConversationTurn::assistant("How big is the budget?"))
            .with_turn(ConversationTurn::user("Large"))
    }

    // ─── Advocate ────────────────────────────────────────────────────

    #[test]
    fn advocate_native_is_system_then_user() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Native);
        let messages = assembler.build(
            &FlowSpec::advocate(),
            &FlowInput::Message("Is he any good?".into()),
            &today(),
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, ADVOCATE.instructions.trim());
        assert_eq!(messages[1], Message::user("Is he any good?"));
    }

    #[test]
    fn advocate_simulated_opens_with_persona_exchange() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Simulated);
        let messages = assembler.build(
            &FlowSpec::advocate(),
            &FlowInput::Message("Hi".into()),
            &today(),
        );

        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert_eq!(messages[1].content, ADVOCATE.acknowledgement);
        assert!(messages.iter().all(|m| m.role != MessageRole::System));
    }

    #[test]
    fn single_message_policy_uses_latest_user_turn_of_a_history() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Native);
        let messages = assembler.build(
            &FlowSpec::advocate(),
            &FlowInput::History(five_turns()),
            &today(),
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "Large");
    }

    #[test]
    fn empty_message_is_forwarded_as_empty() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Native);
        let messages = assembler.build(
            &FlowSpec::advocate(),
            &FlowInput::Message(String::new()),
            &today(),
        );

        assert_eq!(messages[1], Message::user(""));
    }

    // ─── Strategist ──────────────────────────────────────────────────

    #[test]
    fn history_is_transcribed_verbatim_after_persona() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Native);
        let history = five_turns();
        let messages = assembler.build(
            &FlowSpec::strategist_conversation(),
            &FlowInput::History(history.clone()),
            &today(),
        );

        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0].role, MessageRole::System);
        for (message, turn) in messages[1..].iter().zip(history.turns()) {
            assert_eq!(message.role, MessageRole::from(turn.role));
            assert_eq!(message.content, turn.content);
        }
    }

    #[test]
    fn simulated_history_keeps_order_after_acknowledgement() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Simulated);
        let messages = assembler.build(
            &FlowSpec::strategist_conversation(),
            &FlowInput::History(five_turns()),
            &today(),
        );

        assert_eq!(messages.len(), 7);
        assert_eq!(messages[1].content, STRATEGIST.acknowledgement);
        assert_eq!(messages[2].content, "I want to build X");
        assert_eq!(messages[6].content, "Large");
    }

    #[test]
    fn strategist_persona_is_dated() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Native);
        let messages = assembler.build(
            &FlowSpec::strategist_conversation(),
            &FlowInput::History(five_turns()),
            &today(),
        );

        assert!(messages[0].content.contains("6/20/2024"));
        assert!(!messages[0].content.contains("{{memo_date}}"));
    }

    #[test]
    fn full_history_policy_wraps_a_lone_message() {
        let assembler = PromptAssembler::new(SystemRoleSupport::Native);
        let messages = assembler.build(
            &FlowSpec::strategist_conversation(),
            &FlowInput::Message("idea".into()),
            &today(),
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], Message::user("idea"));
    }

    #[test]
    fn assembler_follows_provider_info() {
        let info = ProviderInfo::new("gemini", "gemini-1.5-flash")
            .with_system_role(SystemRoleSupport::Simulated);
        assert_eq!(
            PromptAssembler::for_provider(&info),
            PromptAssembler::new(SystemRoleSupport::Simulated)
        );
    }

    #[test]
    fn flow_input_reports_turns_and_latest_text() {
        assert_eq!(FlowInput::Message("x".into()).turn_count(), 1);
        let input = FlowInput::History(five_turns());
        assert_eq!(input.turn_count(), 5);
        assert_eq!(input.latest_user_text(), "Large");
        assert_eq!(
            FlowInput::History(ConversationHistory::new()).latest_user_text(),
            ""
        );
    }
}

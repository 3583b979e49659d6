//! Flow definitions: one generic parameter set per conversational endpoint.
//!
//! A [`FlowSpec`] bundles everything that distinguishes the advocate and
//! strategist endpoints (persona, history policy, generation constants,
//! response field names and user-facing copy) so a single controller can
//! serve both.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::persona::{PersonaContext, ADVOCATE, STRATEGIST, STRATEGIST_SINGLE_SHOT};

/// The two independent endpoints. Each owns its own quota registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Advocate,
    Strategist,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Advocate => "advocate",
            FlowKind::Strategist => "strategist",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployed request/response shape.
///
/// The strategist endpoint runs exactly one of its two variants per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVariant {
    /// `{message}` in, `{reply}` out on every path.
    Advocate,
    /// `{messages}` in, `{content}` out on every path.
    StrategistConversation,
    /// `{idea}` in, `{strategy}` out on success and quota paths, `{error}` otherwise.
    StrategistSingleShot,
}

/// How caller input becomes the provider transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Persona plus exactly one user message; context-free per call.
    SingleMessage,
    /// Persona plus the caller's full transcript, verbatim and in order.
    FullHistory,
}

/// Fixed generation constants for a flow. Never caller-controlled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// JSON field names used by a variant's response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFields {
    /// Field on 200 and 429 responses.
    pub success: &'static str,
    /// Field on 4xx (other than 429) and 5xx responses.
    pub failure: &'static str,
}

impl FlowVariant {
    pub fn kind(&self) -> FlowKind {
        match self {
            FlowVariant::Advocate => FlowKind::Advocate,
            FlowVariant::StrategistConversation | FlowVariant::StrategistSingleShot => {
                FlowKind::Strategist
            }
        }
    }

    pub fn response_fields(&self) -> ResponseFields {
        match self {
            FlowVariant::Advocate => ResponseFields {
                success: "reply",
                failure: "reply",
            },
            FlowVariant::StrategistConversation => ResponseFields {
                success: "content",
                failure: "content",
            },
            FlowVariant::StrategistSingleShot => ResponseFields {
                success: "strategy",
                failure: "error",
            },
        }
    }

    /// Quota-exceeded copy. Always names the numeric limit.
    pub fn rate_limited_message(&self, limit: u32, window_secs: u64) -> String {
        let period = period_label(window_secs);
        match self {
            FlowVariant::Advocate => {
                let heading = if window_secs == 86_400 {
                    "Daily Limit Reached."
                } else {
                    "Message Limit Reached."
                };
                format!(
                    "🔒 **{heading}**\n\nTo prevent bot abuse, I am limited to {limit} messages per visitor per {period}.\n\nPlease email Curtis directly if you have more questions!"
                )
            }
            FlowVariant::StrategistConversation => format!(
                "### 🔒 Access Limit Reached\n\nTo ensure fair access, strategy sessions are limited to **{limit} turns per {period}**."
            ),
            FlowVariant::StrategistSingleShot => format!(
                "### 🔒 Access Limit Reached\n\nTo ensure fair access for all recruiters and visitors, this demo is restricted to **{limit} analyses per {period}**.\n\nPlease feel free to explore the rest of my portfolio or reach out via email for a deeper discussion!"
            ),
        }
    }

    /// Copy used when the quota registry itself is saturated.
    pub fn capacity_message(&self) -> String {
        match self {
            FlowVariant::Advocate => {
                "🔒 **Temporarily Unavailable.**\n\nToo many visitors right now. Please try again later.".to_string()
            }
            FlowVariant::StrategistConversation | FlowVariant::StrategistSingleShot => {
                "### 🔒 Temporarily Unavailable\n\nToo many strategy sessions are active right now. Please try again later.".to_string()
            }
        }
    }

    /// Copy for a missing provider credential. Always mentions the API Key.
    pub fn config_error_message(&self) -> String {
        match self {
            FlowVariant::Advocate => {
                "⚠️ System Error: My brain is missing an API Key. Please tell the developer.".to_string()
            }
            FlowVariant::StrategistConversation => {
                "### ⚠️ System Error\n\nMy brain is missing an API Key. Please tell the developer.".to_string()
            }
            FlowVariant::StrategistSingleShot => {
                "Failed to generate strategy: missing API Key".to_string()
            }
        }
    }

    /// Copy for an upstream failure, forwarding the provider's message.
    pub fn provider_error_message(&self, detail: &str) -> String {
        let detail = detail.trim();
        match self {
            FlowVariant::Advocate => {
                let detail = if detail.is_empty() {
                    "Something went wrong."
                } else {
                    detail
                };
                format!("⚠️ Error: {detail}")
            }
            FlowVariant::StrategistConversation => {
                let detail = if detail.is_empty() {
                    "the strategy engine did not respond"
                } else {
                    detail
                };
                format!("### ⚠️ Error\n\nFailed to generate strategy: {detail}")
            }
            FlowVariant::StrategistSingleShot => {
                if detail.is_empty() {
                    "Failed to generate strategy".to_string()
                } else {
                    format!("Failed to generate strategy: {detail}")
                }
            }
        }
    }

    /// Copy for input the gateway refuses to forward.
    pub fn malformed_input_message(&self, reason: &str) -> String {
        match self {
            FlowVariant::Advocate => format!("⚠️ Invalid request: {reason}"),
            FlowVariant::StrategistConversation => {
                format!("### ⚠️ Invalid Request\n\n{reason}")
            }
            FlowVariant::StrategistSingleShot => format!("Invalid request: {reason}"),
        }
    }

    /// Substituted when the provider succeeds with an empty completion.
    pub fn empty_completion_fallback(&self) -> &'static str {
        match self {
            FlowVariant::Advocate => "No response.",
            FlowVariant::StrategistConversation | FlowVariant::StrategistSingleShot => {
                "Analysis failed to generate."
            }
        }
    }
}

/// Complete parameterisation of one flow.
///
/// Build with one of the variant constructors and adjust with the `with_*`
/// methods:
///
/// ```ignore
/// let spec = FlowSpec::strategist_conversation().with_max_history_turns(Some(40));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSpec {
    pub variant: FlowVariant,
    pub persona: &'static PersonaContext,
    pub history_policy: HistoryPolicy,
    pub generation: GenerationParams,
    /// Upper bound on caller-supplied transcript length.
    pub max_history_turns: Option<usize>,
}

impl FlowSpec {
    /// Advocate chat: one message, short answers.
    pub fn advocate() -> Self {
        Self {
            variant: FlowVariant::Advocate,
            persona: &ADVOCATE,
            history_policy: HistoryPolicy::SingleMessage,
            generation: GenerationParams {
                temperature: 0.7,
                max_tokens: Some(500),
            },
            max_history_turns: None,
        }
    }

    /// Multi-turn strategist with the phase-gated persona.
    pub fn strategist_conversation() -> Self {
        Self {
            variant: FlowVariant::StrategistConversation,
            persona: &STRATEGIST,
            history_policy: HistoryPolicy::FullHistory,
            generation: GenerationParams {
                temperature: 0.6,
                max_tokens: None,
            },
            max_history_turns: Some(40),
        }
    }

    /// One-shot strategist: a single idea in, a full analysis out.
    pub fn strategist_single_shot() -> Self {
        Self {
            variant: FlowVariant::StrategistSingleShot,
            persona: &STRATEGIST_SINGLE_SHOT,
            history_policy: HistoryPolicy::SingleMessage,
            generation: GenerationParams {
                temperature: 0.6,
                max_tokens: None,
            },
            max_history_turns: None,
        }
    }

    /// Spec for a variant with its default constants.
    pub fn for_variant(variant: FlowVariant) -> Self {
        match variant {
            FlowVariant::Advocate => Self::advocate(),
            FlowVariant::StrategistConversation => Self::strategist_conversation(),
            FlowVariant::StrategistSingleShot => Self::strategist_single_shot(),
        }
    }

    /// Sets the transcript cap. `None` disables it.
    pub fn with_max_history_turns(mut self, max: Option<usize>) -> Self {
        self.max_history_turns = max;
        self
    }

    pub fn kind(&self) -> FlowKind {
        self.variant.kind()
    }
}

/// Human wording for a window length ("day", "2 hours", ...).
pub fn period_label(window_secs: u64) -> String {
    const DAY: u64 = 86_400;
    const HOUR: u64 = 3_600;
    const MINUTE: u64 = 60;

    match window_secs {
        DAY => "day".to_string(),
        s if s > 0 && s % DAY == 0 => format!("{} days", s / DAY),
        HOUR => "hour".to_string(),
        s if s > 0 && s % HOUR == 0 => format!("{} hours", s / HOUR),
        MINUTE => "minute".to_string(),
        s if s > 0 && s % MINUTE == 0 => format!("{} minutes", s / MINUTE),
        s => format!("{s} seconds"),
    }
}

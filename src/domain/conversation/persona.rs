//! Fixed persona contexts.
//!
//! Persona text is data, kept under `personas/` and embedded at build time.
//! The strategist's four-phase audit/clarify/evaluate/verdict protocol lives
//! entirely in its instructions; the gateway only transcribes them.

use crate::domain::foundation::Timestamp;

/// Placeholder replaced with the request date when a persona is rendered.
pub const MEMO_DATE_PLACEHOLDER: &str = "{{memo_date}}";

/// Immutable instruction block that frames every request of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaContext {
    /// Short identifier used in logs.
    pub name: &'static str,
    /// Instruction text sent in the system slot.
    pub instructions: &'static str,
    /// Model-side reply used when a backend has no system role and the
    /// persona has to be replayed as a prior exchange.
    pub acknowledgement: &'static str,
}

impl PersonaContext {
    /// Returns the instructions with the memo date filled in.
    pub fn render(&self, today: &Timestamp) -> String {
        self.instructions
            .trim()
            .replace(MEMO_DATE_PLACEHOLDER, &today.short_date())
    }
}

/// Competence advocate persona for the portfolio chat widget.
pub static ADVOCATE: PersonaContext = PersonaContext {
    name: "advocate",
    instructions: include_str!("../../../personas/advocate.md"),
    acknowledgement: "Understood. I am ready to represent Curtis.",
};

/// Venture strategist persona for multi-turn pitch sessions.
pub static STRATEGIST: PersonaContext = PersonaContext {
    name: "strategist",
    instructions: include_str!("../../../personas/strategist.md"),
    acknowledgement: "Understood. Share the pitch and I will run the four-phase protocol.",
};

/// Venture strategist persona for one-shot idea analysis.
pub static STRATEGIST_SINGLE_SHOT: PersonaContext = PersonaContext {
    name: "strategist_single_shot",
    instructions: include_str!("../../../personas/strategist_single_shot.md"),
    acknowledgement: "Understood. Share the concept and I will deliver the analysis.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advocate_persona_carries_velvet_rope_refusal() {
        assert!(ADVOCATE.instructions.contains("Velvet Rope"));
        assert!(ADVOCATE.instructions.contains("STRICTLY refuse"));
        assert!(ADVOCATE.instructions.contains("KNOWLEDGE BASE"));
    }

    #[test]
    fn strategist_persona_lists_all_four_phases() {
        for header in [
            "PHASE 1: THE AUDIT",
            "PHASE 2: THE ANALYSIS",
            "PHASE 3: THE EVALUATION",
            "PHASE 4: THE VERDICT",
        ] {
            assert!(
                STRATEGIST.instructions.contains(header),
                "missing phase header {header}"
            );
        }
    }

    #[test]
    fn strategist_persona_carries_off_topic_refusal() {
        assert!(STRATEGIST
            .instructions
            .contains("My system is calibrated exclusively for Venture Strategy."));
    }

    #[test]
    fn strategist_personas_gate_the_verdict_on_clarification() {
        for persona in [&STRATEGIST, &STRATEGIST_SINGLE_SHOT] {
            assert!(persona.instructions.contains("INTERACTION GATE"));
            assert!(persona.instructions.contains("Ask 3 sharp, specific clarifying questions"));
            assert!(persona.instructions.contains("The Shark's Verdict"));
        }
    }

    #[test]
    fn render_fills_memo_date() {
        let today = Timestamp::from_unix_secs(1705276800);
        let rendered = STRATEGIST.render(&today);

        assert!(rendered.contains("**Date:** 1/15/2024"));
        assert!(!rendered.contains(MEMO_DATE_PLACEHOLDER));
    }

    #[test]
    fn render_leaves_advocate_text_intact() {
        let rendered = ADVOCATE.render(&Timestamp::now());
        assert_eq!(rendered, ADVOCATE.instructions.trim());
    }
}

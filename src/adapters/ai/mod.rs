//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GroqProvider` - Groq's OpenAI-compatible chat completions (native system role)
//! - `GeminiProvider` - Google Gemini generateContent (simulated system role)
//! - `MockAIProvider` - Configurable mock for testing

mod gemini_provider;
mod groq_provider;
mod mock_provider;
mod upstream;

pub use gemini_provider::{GeminiConfig, GeminiProvider, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
pub use groq_provider::{GroqConfig, GroqProvider, GROQ_BASE_URL, GROQ_DEFAULT_MODEL};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};

//! Persona Gateway - rate-limited conversational proxy to hosted LLMs.
//!
//! Two JSON endpoints front a hosted language model with a fixed persona:
//! an advocate chat (`POST /api/chat`) and a startup strategist
//! (`POST /api/strategy`). Each endpoint owns an in-memory per-client quota,
//! assembles a persona-first transcript for the configured provider and
//! normalizes every outcome into a single-field JSON body.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

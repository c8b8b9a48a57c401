//! LLM provider implementations.

pub mod openrouter;

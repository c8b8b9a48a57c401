//! LLM provider abstraction.

pub mod provider;

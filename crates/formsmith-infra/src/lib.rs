//! Infrastructure implementations for Formsmith.
//!
//! Concrete adapters for the ports defined in `formsmith-core`: SQLite
//! repositories (sqlx, WAL, split reader/writer pools) and the OpenRouter
//! LLM provider (reqwest).

pub mod config;
pub mod llm;
pub mod sqlite;

//! Shared domain types for Formsmith.
//!
//! This crate contains the core domain types used across the Formsmith
//! platform: the form bundle (schema + UI hints), form and version records,
//! LLM request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, indexmap, uuid, chrono,
//! thiserror.

pub mod bundle;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;

//! Business logic and repository trait definitions for Formsmith.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the generation/refinement engine
//! itself. It depends only on `formsmith-types` -- never on
//! `formsmith-infra` or any database/IO crate.

pub mod engine;
pub mod llm;
pub mod repository;
pub mod service;

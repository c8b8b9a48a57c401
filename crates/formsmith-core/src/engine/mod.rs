//! The generation & refinement engine.
//!
//! Data flow: caller text -> [`orchestrator::SchemaEngine`] -> provider ->
//! raw text -> [`extract`] -> bundle, with [`heuristic`] as the availability
//! floor for generation.

pub mod extract;
pub mod heuristic;
pub mod orchestrator;
pub mod prompt;

pub use orchestrator::SchemaEngine;

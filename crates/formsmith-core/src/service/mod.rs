//! Service layer orchestrating the engine and repositories.

pub mod form;

//! SQLite persistence implementations.

pub mod form;
pub mod pool;
pub mod response;
pub mod version;

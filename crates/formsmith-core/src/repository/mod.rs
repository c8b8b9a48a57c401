//! Persistence port traits implemented by formsmith-infra.

pub mod form;
pub mod response;
pub mod version;

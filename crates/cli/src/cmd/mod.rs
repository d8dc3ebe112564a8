//! CLI command implementations

pub mod clone;
pub mod delete;
pub mod gather;
pub mod init;
pub mod log;
pub mod reset;
pub mod status;
pub mod throw;

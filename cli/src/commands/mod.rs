//! Command implementations

pub mod check;
pub mod config;
pub mod delete;
pub mod init;
pub mod list;
pub mod resolve;
pub mod restore;

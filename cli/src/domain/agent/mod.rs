//! Domain logic for agent definitions: pure functions, no I/O, no async.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.

pub mod definition;

pub use definition::{
    YamlBlock, agent_dependencies, find_yaml_block, references, remove_dependency,
    resource_dependencies,
};

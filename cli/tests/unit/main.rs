//! Unit tests for the lcagents CLI
//!
//! These tests drive the application services against temporary `.lcagents`
//! trees through the real `LocalFs` adapter (or a fault-injecting wrapper).

mod dependency_check;
mod layer_resolver;

//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod backup_store;
pub mod config_service;
pub mod dependency_check;
pub mod layer_resolver;
pub mod layer_structure;
pub mod safe_delete;

pub use layer_resolver::LayerResolver;

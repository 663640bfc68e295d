//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod agent;
pub mod backup;
pub mod config;
pub mod error;
pub mod layer;
pub mod resource;

pub use backup::{BackupMetadata, BackupSummary};
pub use config::{CoreSystemConfig, LcagentsConfig};
pub use error::{ConfigError, ResourceError};
pub use layer::{Layer, LayerLayout, ResourceType};
pub use resource::{
    AgentDefinition, AgentResolution, AgentResolutionPath, DependencyCheckResult, DependencyKind,
    ResourceDependency, ResourceMetadata, ResourceWithSource,
};

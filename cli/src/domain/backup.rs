//! Backup metadata document and naming rules.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::layer::ResourceType;
use crate::domain::resource::ResourceDependency;

/// Name of the metadata document inside a backup directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Metadata persisted next to a backed-up resource; enough to reverse the
/// deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    /// Filesystem-safe ISO 8601 timestamp (see [`backup_timestamp`]).
    pub timestamp: String,
    pub resource_name: String,
    pub resource_type: ResourceType,
    /// Dependents recorded at the time of deletion.
    #[serde(default)]
    pub dependencies: Vec<ResourceDependency>,
    pub original_path: PathBuf,
    /// Basename of the copied entry; older backups fall back to the
    /// original path's file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_name: Option<String>,
    /// SHA-256 of the copied file. Absent for directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl BackupMetadata {
    /// Basename of the backed-up entry inside the backup directory.
    #[must_use]
    pub fn entry_name(&self) -> Option<String> {
        self.entry_name.clone().or_else(|| {
            self.original_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }
}

/// A backup found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupSummary {
    /// Directory name under the backups root.
    pub name: String,
    pub path: PathBuf,
    pub metadata: BackupMetadata,
}

/// RFC 3339 UTC timestamp with `:` and `.` replaced by `-`.
///
/// `2024-05-01T10:20:30.123Z` becomes `2024-05-01T10-20-30-123Z`.
#[must_use]
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// `<resource_name>-<timestamp>`.
#[must_use]
pub fn backup_dir_name(resource_name: &str, timestamp: &str) -> String {
    format!("{resource_name}-{timestamp}")
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

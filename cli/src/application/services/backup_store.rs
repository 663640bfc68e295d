//! Application service: snapshot a resource before deletion and restore
//! it afterwards.
//!
//! Backups live in `<backups>/<name>-<timestamp>/` next to a
//! `metadata.json`. Nothing here ever deletes a backup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::application::ports::{CoreSystemRegistry, ResourceFs};
use crate::application::services::layer_resolver::LayerResolver;
use crate::domain::backup::{
    BackupMetadata, BackupSummary, METADATA_FILE, backup_dir_name, backup_timestamp, sha256_hex,
};
use crate::domain::error::ResourceError;
use crate::domain::layer::ResourceType;
use crate::domain::resource::ResourceDependency;

/// Pick a backup directory that does not exist yet. Two backups of the same
/// resource within one millisecond get a numeric suffix.
async fn unique_backup_dir(fs: &impl ResourceFs, backups: &Path, base: &str) -> PathBuf {
    let mut candidate = backups.join(base);
    let mut attempt = 1u32;
    while fs.exists(&candidate).await {
        candidate = backups.join(format!("{base}-{attempt}"));
        attempt += 1;
    }
    candidate
}

/// Snapshot the effective copy of a resource.
///
/// Steps:
/// 1. Resolve the resource (it must exist)
/// 2. Copy the file or directory tree into a fresh backup directory
/// 3. Write `metadata.json` with the original path and dependents
///
/// # Errors
///
/// Returns `ResourceError::NotFound` if the resource does not resolve, or an
/// I/O error if the copy or metadata write fails.
pub async fn create_backup<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    resource_name: &str,
    resource_type: ResourceType,
    dependencies: &[ResourceDependency],
) -> Result<PathBuf> {
    let fs = resolver.fs();
    let original_path = resolver
        .resource_path(resource_type, resource_name)
        .await?
        .ok_or_else(|| ResourceError::not_found(resource_type, resource_name))?;
    let entry_name = original_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ResourceError::InvalidArgument(format!(
                "resource path {} has no file name",
                original_path.display()
            ))
        })?;

    let timestamp = backup_timestamp(Utc::now());
    let backups = resolver.layout().backups_dir();
    let backup_dir =
        unique_backup_dir(fs, backups, &backup_dir_name(resource_name, &timestamp)).await;
    fs.create_dir_all(&backup_dir).await?;

    fs.copy_recursive(&original_path, &backup_dir.join(&entry_name))
        .await
        .with_context(|| format!("backing up {}", original_path.display()))?;

    let checksum = if fs.is_dir(&original_path).await {
        None
    } else {
        Some(sha256_hex(&fs.read(&original_path).await?))
    };

    let metadata = BackupMetadata {
        timestamp,
        resource_name: resource_name.to_string(),
        resource_type,
        dependencies: dependencies.to_vec(),
        original_path,
        entry_name: Some(entry_name),
        checksum,
    };
    let json = serde_json::to_string_pretty(&metadata).context("serializing backup metadata")?;
    fs.write(&backup_dir.join(METADATA_FILE), json.as_bytes())
        .await?;

    tracing::info!(resource = resource_name, backup = %backup_dir.display(), "backup created");
    Ok(backup_dir)
}

/// Read and parse `<backup_path>/metadata.json`.
///
/// # Errors
///
/// Returns `ResourceError::InvalidBackup` if the document is missing or
/// unparseable.
pub async fn read_metadata(fs: &impl ResourceFs, backup_path: &Path) -> Result<BackupMetadata> {
    let invalid = |reason: String| ResourceError::InvalidBackup {
        path: backup_path.to_path_buf(),
        reason,
    };
    let metadata_path = backup_path.join(METADATA_FILE);
    if !fs.exists(&metadata_path).await {
        return Err(invalid(format!("missing {METADATA_FILE}")).into());
    }
    let raw = fs
        .read_to_string(&metadata_path)
        .await
        .map_err(|err| invalid(format!("unreadable {METADATA_FILE}: {err:#}")))?;
    let metadata = serde_json::from_str(&raw)
        .map_err(|err| invalid(format!("malformed {METADATA_FILE}: {err}")))?;
    Ok(metadata)
}

/// Copy a backed-up resource back to its original path, replacing whatever
/// is there now.
///
/// # Errors
///
/// Returns `ResourceError::InvalidBackup` if the metadata or the backed-up
/// entry is missing or fails its checksum, `ResourceError::StaleLocation`
/// if the original parent directory is gone, or an I/O error.
pub async fn restore_backup<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    backup_path: &Path,
) -> Result<BackupMetadata> {
    let fs = resolver.fs();
    let metadata = read_metadata(fs, backup_path).await?;
    let invalid = |reason: String| ResourceError::InvalidBackup {
        path: backup_path.to_path_buf(),
        reason,
    };

    let entry_name = metadata
        .entry_name()
        .ok_or_else(|| invalid("metadata has no original file name".to_string()))?;
    let source = backup_path.join(&entry_name);
    if !fs.exists(&source).await {
        return Err(invalid(format!("backed-up entry '{entry_name}' is missing")).into());
    }

    let target = &metadata.original_path;
    let parent_exists = match target.parent() {
        Some(parent) => fs.is_dir(parent).await,
        None => false,
    };
    if !parent_exists {
        return Err(ResourceError::StaleLocation {
            path: target.clone(),
        }
        .into());
    }

    if let Some(expected) = &metadata.checksum {
        let actual = sha256_hex(&fs.read(&source).await?);
        if &actual != expected {
            return Err(invalid(format!("checksum mismatch for '{entry_name}'")).into());
        }
    }

    if fs.is_dir(target).await {
        fs.remove_dir_all(target).await?;
    } else if fs.exists(target).await {
        fs.remove_file(target).await?;
    }
    fs.copy_recursive(&source, target)
        .await
        .with_context(|| format!("restoring {}", target.display()))?;

    tracing::info!(resource = %metadata.resource_name, path = %target.display(), "backup restored");
    Ok(metadata)
}

/// Turn a backup reference into a directory path. A bare name is looked up
/// under the backups directory; anything with a path separator is used as
/// given.
///
/// # Errors
///
/// Returns `ResourceError::NotFound` if the directory does not exist.
pub async fn resolve_backup<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    reference: &str,
) -> Result<PathBuf> {
    let given = Path::new(reference);
    let path = if given.components().count() > 1 || given.is_absolute() {
        given.to_path_buf()
    } else {
        resolver.layout().backups_dir().join(reference)
    };
    if reference.is_empty() || !resolver.fs().is_dir(&path).await {
        return Err(ResourceError::backup_not_found(reference).into());
    }
    Ok(path)
}

/// Every readable backup, newest first. Directories without valid metadata
/// are logged and left out.
///
/// # Errors
///
/// Returns an error if the backups directory exists but cannot be listed.
pub async fn list_backups<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
) -> Result<Vec<BackupSummary>> {
    let fs = resolver.fs();
    let backups = resolver.layout().backups_dir();
    if !fs.is_dir(backups).await {
        return Ok(Vec::new());
    }
    let mut summaries = Vec::new();
    for entry in fs.read_dir(backups).await? {
        if !entry.is_dir {
            continue;
        }
        match read_metadata(fs, &entry.path).await {
            Ok(metadata) => summaries.push(BackupSummary {
                name: entry.name,
                path: entry.path,
                metadata,
            }),
            Err(err) => {
                tracing::warn!(backup = %entry.path.display(), error = %err, "ignoring invalid backup");
            }
        }
    }
    summaries.sort_by(|a, b| {
        b.metadata
            .timestamp
            .cmp(&a.metadata.timestamp)
            .then_with(|| b.name.cmp(&a.name))
    });
    Ok(summaries)
}

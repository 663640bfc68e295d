//! Filesystem infrastructure: implements the `ResourceFs` port on the
//! local disk.
//!
//! Single-file operations use `tokio::fs`; tree copies walk the source with
//! `walkdir` inside `spawn_blocking` to avoid blocking the async runtime.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::application::ports::{DirEntryInfo, ResourceFs};

/// Production filesystem implementation of `ResourceFs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ResourceFs for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_dir())
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading file {}", path.display()))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("reading file {}", path.display()))
    }

    async fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("writing file {}", path.display()))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("creating directory {}", path.display()))
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("removing file {}", path.display()))
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_dir_all(path)
            .await
            .with_context(|| format!("removing directory {}", path.display()))
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let mut reader = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("listing directory {}", path.display()))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .with_context(|| format!("listing directory {}", path.display()))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|ty| ty.is_dir());
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                is_dir,
            });
        }
        Ok(entries)
    }

    async fn copy_recursive(&self, from: &Path, to: &Path) -> Result<()> {
        let from = from.to_path_buf();
        let to = to.to_path_buf();
        tokio::task::spawn_blocking(move || copy_tree(&from, &to))
            .await
            .context("spawn_blocking for copy_recursive")?
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            self.create_dir_all(parent).await?;
        }
        tokio::fs::rename(from, to)
            .await
            .with_context(|| format!("moving {} to {}", from.display(), to.display()))
    }
}

/// Copy a file or directory tree, creating `to`'s parents as needed.
///
/// # Errors
///
/// Returns an error if the source cannot be walked or any entry cannot be
/// copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.with_context(|| format!("walking {}", from.display()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .with_context(|| format!("resolving {} under {}", entry.path().display(), from.display()))?;
        let dest: PathBuf = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest)
                .with_context(|| format!("creating directory {}", dest.display()))?;
        } else {
            std::fs::copy(entry.path(), &dest).with_context(|| {
                format!("copying {} to {}", entry.path().display(), dest.display())
            })?;
        }
    }
    Ok(())
}

//! Source file discovery.
//!
//! Expands command-line inputs (files and directories) into a flat,
//! deterministic list of `SourceFile`s. Directories are listed in name
//! order; with `recursive` set, subdirectories are walked depth-first.

use super::records::SourceFile;
use super::BatchError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Options for expanding inputs.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// File name prefix of previous outputs; matching files are skipped.
    pub skip_prefix: Option<String>,
}

/// Expand `inputs` into source files.
///
/// A missing input or an unreadable directory fails the whole discovery.
pub async fn discover(
    inputs: &[PathBuf],
    options: &DiscoveryOptions,
) -> Result<Vec<SourceFile>, BatchError> {
    let mut found = Vec::new();

    for input in inputs {
        let metadata = tokio::fs::metadata(input)
            .await
            .map_err(|e| BatchError::Discovery(format!("{}: {}", input.display(), e)))?;

        if metadata.is_dir() {
            walk_directory(input, options, &mut found).await?;
        } else if !is_skipped(input, options) {
            found.push(SourceFile::from_path(input.clone()));
        }
    }

    tracing::debug!(inputs = inputs.len(), files = found.len(), "Discovery finished");
    Ok(found)
}

async fn walk_directory(
    root: &Path,
    options: &DiscoveryOptions,
    found: &mut Vec<SourceFile>,
) -> Result<(), BatchError> {
    let mut pending = vec![root.to_path_buf()];
    let mut visited = HashSet::new();

    while let Some(dir) = pending.pop() {
        // Symlinked directories can form cycles
        let canonical = tokio::fs::canonicalize(&dir)
            .await
            .map_err(|e| BatchError::Discovery(format!("{}: {}", dir.display(), e)))?;
        if !visited.insert(canonical) {
            tracing::debug!(path = %dir.display(), "Directory already visited");
            continue;
        }

        let (files, subdirs) = list_directory(&dir).await?;

        found.extend(
            files
                .into_iter()
                .filter(|p| !is_skipped(p, options))
                .map(SourceFile::from_path),
        );

        if options.recursive {
            // Reverse so the first subdirectory is popped first
            pending.extend(subdirs.into_iter().rev());
        }
    }

    Ok(())
}

async fn list_directory(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), BatchError> {
    let discovery_err = |e: std::io::Error| BatchError::Discovery(format!("{}: {}", dir.display(), e));

    let mut entries = tokio::fs::read_dir(dir).await.map_err(discovery_err)?;
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(discovery_err)? {
        let path = entry.path();
        // Follows symlinks, so a linked image or directory counts as its target
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if metadata.is_dir() {
            subdirs.push(path);
        } else if metadata.is_file() {
            files.push(path);
        } else {
            tracing::debug!(path = %path.display(), "Skipping special file");
        }
    }

    files.sort();
    subdirs.sort();
    Ok((files, subdirs))
}

fn is_skipped(path: &Path, options: &DiscoveryOptions) -> bool {
    match (&options.skip_prefix, path.file_name().and_then(|n| n.to_str())) {
        (Some(prefix), Some(name)) => !prefix.is_empty() && name.starts_with(prefix.as_str()),
        _ => false,
    }
}

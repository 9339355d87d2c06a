//! File writer for generated artifacts.
//!
//! Writes generated files below an output root, with dry-run support, and
//! compares existing files against freshly generated ones for `validate`.

use std::path::{Path, PathBuf};

use dtgen_codegen::generator::strip_provenance;
use dtgen_codegen::GeneratedCode;

use crate::error::{CliResult, WriteError};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// State of one expected output file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Matches the generated content, ignoring provenance.
    UpToDate(PathBuf),
    /// Exists with different content.
    Stale(PathBuf),
    /// Does not exist.
    Missing(PathBuf),
}

impl FileStatus {
    /// Path of the checked file.
    pub fn path(&self) -> &Path {
        match self {
            Self::UpToDate(path) | Self::Stale(path) | Self::Missing(path) => path,
        }
    }

    /// Check if the file matches.
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate(_))
    }
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    root: PathBuf,
    dry_run: bool,
}

impl FileWriter {
    /// Create a writer placing files below `root`.
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Absolute location of a generated file.
    pub fn target(&self, file: &GeneratedCode) -> PathBuf {
        self.root.join(&file.path)
    }

    /// Write one generated file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, file: &GeneratedCode) -> CliResult<WriteResult> {
        let path = self.target(file);
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: file.code.clone(),
                path,
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(&path, &file.code).map_err(|e| WriteError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path,
            bytes: file.code.len(),
        })
    }

    /// Write every file, stopping at the first failure.
    pub fn write_all<'a>(
        &self,
        files: impl IntoIterator<Item = &'a GeneratedCode>,
    ) -> CliResult<Vec<WriteResult>> {
        files.into_iter().map(|file| self.write(file)).collect()
    }

    /// Compare the file on disk with `expected`.
    ///
    /// `expected` must have been generated without a provenance block; the
    /// block of the existing file is stripped before comparing.
    pub fn status(&self, expected: &GeneratedCode) -> CliResult<FileStatus> {
        let path = self.target(expected);
        if !path.exists() {
            return Ok(FileStatus::Missing(path));
        }
        let existing = std::fs::read_to_string(&path)?;
        if strip_provenance(&existing) == expected.code {
            Ok(FileStatus::UpToDate(path))
        } else {
            Ok(FileStatus::Stale(path))
        }
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::DryRun { .. } => 0,
        }
    }
}

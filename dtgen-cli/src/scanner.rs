//! Descriptor file scanner.
//!
//! Recursively discovers `*.json` descriptor documents below a root
//! directory, respecting `.gitignore` patterns and an optional glob filter.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{CliError, CliResult, ScanError};

/// Extension of descriptor documents.
pub const DESCRIPTOR_EXTENSION: &str = "json";

/// A discovered descriptor file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering descriptor files.
#[derive(Debug)]
pub struct DescriptorScanner {
    root: PathBuf,
    respect_gitignore: bool,
    filter: Option<glob::Pattern>,
}

impl DescriptorScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            filter: None,
        }
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter matched against paths relative to the root.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan the directory and return every descriptor file, sorted by path.
    ///
    /// Sorting keeps batch order, and with it the output order, independent
    /// of directory iteration order.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .require_git(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if path
                .extension()
                .map_or(true, |ext| ext != DESCRIPTOR_EXTENSION)
            {
                continue;
            }

            let relative = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative) {
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path: relative,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_descriptors(self.root.clone()).into());
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<SourceFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(CliError::Scan(ScanError::NoDescriptors { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

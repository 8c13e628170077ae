/*
 * probe.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filesystem existence checks used by the editor.
 *
 * The editor never reads or writes supporting files; it only needs to know
 * whether they exist and what their absolute path is. Keeping that behind a
 * trait lets callers observe or fake the filesystem.
 */

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Type of filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Existence checks against a filesystem.
pub trait FileProbe: fmt::Debug + Send + Sync {
    /// Check if path exists, optionally filtering by type.
    ///
    /// A path of the wrong kind (a directory where a file is expected) does
    /// not exist for the purposes of this check.
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool>;

    /// Check if path exists and is a file.
    fn is_file(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, Some(PathKind::File))
    }

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        self.path_exists(path, Some(PathKind::Directory))
    }

    /// Make a path absolute without touching the filesystem.
    ///
    /// Relative paths are joined to the current directory; symlinks are not
    /// resolved.
    fn absolute(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProbe;

impl NativeProbe {
    pub fn new() -> Self {
        Self
    }
}

impl FileProbe for NativeProbe {
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> io::Result<bool> {
        if !path.try_exists()? {
            return Ok(false);
        }

        Ok(match kind {
            None => true,
            Some(PathKind::File) => path.is_file(),
            Some(PathKind::Directory) => path.is_dir(),
        })
    }

    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        std::path::absolute(path)
    }
}

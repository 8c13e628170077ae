/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error type for project descriptor editing.
 */

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stylecop-project operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Error type for project descriptor editing.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The project XML could not be parsed
    #[error("Failed to parse project XML: {0}")]
    Parse(#[from] stylecop_xml::Error),

    /// The edited document could not be written out
    #[error("Failed to write project XML: {0}")]
    Serialize(#[source] stylecop_xml::Error),

    /// The package directory does not exist
    #[error("Package directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A required supporting file is missing from every candidate location
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The document was parsed without a root element
    #[error("Operation invalid: document has no root element")]
    NoRootElement,

    /// An existence check could not be performed
    #[error("Failed to check {}: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A layout configuration file is invalid or unreadable
    #[error("Invalid layout configuration: {0}")]
    Config(String),
}

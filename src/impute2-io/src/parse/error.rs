use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to create output directory")]
    CreateDirectory(#[source] std::io::Error),

    #[error("'{}' already exists within the output directory. Use '--overwrite' to force, or specify a different output directory with '--output-dir'", path.display())]
    OverwriteDisallowed{path: PathBuf},

    #[error("Output file prefix '{0}' is invalid. Prefixes must be non-empty, and may not contain path separators")]
    InvalidPrefix(String),
}

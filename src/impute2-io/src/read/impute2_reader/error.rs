use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Impute2ReaderError {
    #[error("Failed to open IMPUTE2 file '{}'", path.display())]
    Open{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to read the contents of the IMPUTE2 file")]
    FillBuffer(#[source] std::io::Error),

    #[error("Invalid IMPUTE2 record at line {line}")]
    ParseLine{line: usize, #[source] source: impute2::Impute2Error},
}

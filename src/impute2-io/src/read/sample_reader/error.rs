use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleReaderError {
    #[error("Failed to open sample file '{}'", path.display())]
    Open{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to read the contents of the sample file")]
    FillBuffer(#[source] std::io::Error),

    #[error("Sample file is missing its header line")]
    MissingHeader,

    #[error("Sample file is missing its column type definition line (second line)")]
    MissingTypes,

    #[error("Line {line} of the sample file contains {found} field(s), while the header defines {expected}")]
    FieldCount{line: usize, found: usize, expected: usize},

    #[error("Sample file defines {samples} samples, while the IMPUTE2 file contains {records}")]
    SampleCountMismatch{samples: usize, records: usize},
}

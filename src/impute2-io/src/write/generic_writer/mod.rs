use std::{fmt::Display, fs::File, io::{Write, BufWriter}, path::Path};

use anyhow::Result;
use itertools::Itertools;

use located_error::LocatedError;

mod error;
pub use error::WriterError;

/// THE field separator used for this generic writer.
pub const WRITER_SEPARATOR: &str = "\t";

/// Representation of a missing value within output files.
pub const MISSING_VALUE: &str = "NA";

/// A generic file writer.
/// - source: Boxed `BufWriter` (can either handle file-writing, or stdout).
pub struct GenericWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>
}

impl<'a> GenericWriter<'a>{
    /// Instantiate a new `Writer`, linked to a file, or to the standard output if `path` is `None`.
    ///
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper
    /// UNIX permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<GenericWriter<'a>>{
        let source: Box<dyn Write> = match path {
            Some(path) => Box::new(File::create(path).map_err(WriterError::Create).loc("While creating file")?),
            None       => Box::new(std::io::stdout()),
        };
        Ok(Self::from_writer(source))
    }

    pub fn from_writer(writer: impl Write + 'a) -> Self {
        Self{source: BufWriter::new(Box::new(writer))}
    }

    /// Write a single line, joining each field with [`WRITER_SEPARATOR`].
    /// Contents are buffered: call [`GenericWriter::flush`] once done.
    pub fn write_fields<T, I>(&mut self, fields: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: Display,
    {
        writeln!(self.source, "{}", fields.into_iter().join(WRITER_SEPARATOR))
            .map_err(WriterError::IOError)
            .loc("While writing contents into file")
    }

    /// Write the contents of a generic iterator within a file/stdout, and flush.
    /// one Iteration step = one line.
    ///
    /// # Errors
    /// - If any of the Items within `iter` fails to get written within the file.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: Display,
    {
        for obj in iter {
            writeln!(self.source, "{obj}").map_err(WriterError::IOError).loc("While writing contents into file")?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.source.flush().map_err(WriterError::IOError).loc("While flushing buffer contents of Writer")
    }
}

/// Format an optional float with a fixed number of decimals, or [`MISSING_VALUE`].
#[must_use]
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |value| format!("{value:.precision$}"))
}

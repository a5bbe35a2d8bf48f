use std::{fs::File, io::{BufRead, BufReader, Read}, path::Path};

use gzp::{deflate::Bgzf, par::decompress::ParDecompressBuilder};
use impute2::Impute2Record;
use located_error::LocatedError;
use log::debug;
use anyhow::Result;

mod error;
pub use error::Impute2ReaderError;

/// Line-by-line reader of an IMPUTE2 genotype probability file.
///
/// Accepts plain text files, BGZF compressed files (`.gz`), or any `BufRead` source
/// (e.g. the standard input). Blank lines are skipped. Each remaining line is decoded
/// into an [`Impute2Record`].
///
/// # Fields:
/// - `source` : Boxed `BufRead`
/// - `buf`    : line buffer, reused across iterations.
/// - `line`   : 1-based index of the last line read.
pub struct Impute2Reader<'a> {
    source: Box<dyn BufRead + 'a>,
    buf   : String,
    line  : usize,
}

impl<'a> Impute2Reader<'a> {
    /// Open an IMPUTE2 file, or read from stdin if `path` is `None`.
    ///
    /// # Arguments:
    /// - `path`   : path leading to the `.impute2(.gz)` file.
    /// - `threads`: number of decompression threads (only relevant for BGZF compressed files)
    pub fn new(path: Option<&Path>, threads: usize) -> Result<Impute2Reader<'a>> {
        let Some(path) = path else {
            debug!("Reading IMPUTE2 records from the standard input.");
            return Ok(Self::from_reader(BufReader::new(std::io::stdin())))
        };

        let file = File::open(path)
            .map_err(|source| Impute2ReaderError::Open{path: path.to_path_buf(), source})
            .loc("While attempting to create a new Impute2Reader")?;

        let source: Box<dyn Read> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => {
                debug!("Decompressing {} using {threads} additional thread(s)", path.display());
                ParDecompressBuilder::<Bgzf>::new().maybe_num_threads(threads).maybe_par_from_reader(file)
            },
            _ => Box::new(file),
        };
        Ok(Self::from_reader(BufReader::new(source)))
    }

    pub fn from_reader(reader: impl BufRead + 'a) -> Self {
        Self{source: Box::new(reader), buf: String::new(), line: 0}
    }
}

impl Iterator for Impute2Reader<'_> {
    type Item = Result<Impute2Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let loc_msg = "While reading IMPUTE2 records";
        loop {
            self.buf.clear();
            match self.source.read_line(&mut self.buf) {
                Ok(0)  => return None,
                Ok(_)  => self.line += 1,
                Err(e) => return Some(Err(Impute2ReaderError::FillBuffer(e)).loc(loc_msg)),
            }

            if self.buf.trim().is_empty() {
                continue
            }

            let line = self.line;
            return Some(self.buf.parse::<Impute2Record>()
                .map_err(|source| Impute2ReaderError::ParseLine{line, source})
                .loc(loc_msg)
            )
        }
    }
}

mod impute2_reader;
pub use impute2_reader::{Impute2Reader, Impute2ReaderError};

mod sample_reader;
pub use sample_reader::{SampleReader, SampleReaderError, SampleTag};

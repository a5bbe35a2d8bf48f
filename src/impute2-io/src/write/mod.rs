mod generic_writer;
pub use generic_writer::{format_optional, GenericWriter, WriterError, WRITER_SEPARATOR, MISSING_VALUE};

use std::{fs, path::{Path, PathBuf}};

use located_error::LocatedError;

use log::trace;
use anyhow::Result;

mod error;
pub use error::ParseError;

/// Attempt to create a directory (and its parents, if needed) and return an error if it failed.
pub fn create_directory(dir: &Path) -> Result<()> {
    let loc_msg = || format!("While attempting to create output directory '{}'", dir.display());
    fs::create_dir_all(dir).map_err(ParseError::CreateDirectory).with_loc(loc_msg)
}

/// Check if a given file already exists ; raise an error if such is the case, and the user did not explicitly
/// allow file overwriting.
/// # Errors
/// - If the provided `path` already exists and the user did not specifically allow for file
///   overwrite using the `--overwrite` argument
pub fn can_write_file(overwrite: bool, path: &Path) -> Result<bool> {
    let loc_msg = "While ensuring that file permissions were appropriate";
    if !overwrite && path.exists() {
        return Err(ParseError::OverwriteDisallowed{path: path.to_path_buf()}).loc(loc_msg)
    }
    Ok(true)
}

/// Obtain the path of an output file, following the pattern `{output_dir}/{prefix}.{ext}`.
/// `output_dir` is created if it does not exist.
///
/// # Errors
/// - if `prefix` is empty, or contains a path separator.
/// - if `output_dir` cannot be created.
/// - if the file already exists and `overwrite` is false.
pub fn get_output_file(output_dir: &Path, prefix: &str, ext: &str, overwrite: bool) -> Result<PathBuf> {
    let loc_msg = "While attempting to format the name of an output file";
    if prefix.is_empty() || prefix.contains(std::path::is_separator) {
        return Err(ParseError::InvalidPrefix(prefix.to_string())).loc(loc_msg)
    }
    create_directory(output_dir).loc(loc_msg)?;

    let file = output_dir.join(format!("{prefix}.{ext}"));
    can_write_file(overwrite, &file).loc(loc_msg)?;
    trace!("Output file: {}", file.display());
    Ok(file)
}

/// Default output file prefix: the stem of the input file, stripped from any `.gz` extension.
/// e.g. `chr22.impute2.gz` -> `chr22`.
#[must_use]
pub fn default_prefix(input: Option<&Path>, fallback: &str) -> String {
    let stem = input.and_then(|path| path.file_name())
        .and_then(|name| name.to_str())
        .map(|name| name.trim_end_matches(".gz"))
        .map(|name| name.split_once('.').map_or(name, |(stem, _)| stem))
        .filter(|stem| !stem.is_empty());
    stem.unwrap_or(fallback).to_string()
}

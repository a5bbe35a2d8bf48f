#[cfg(test)]
mod fixture;
pub use fixture::Fixture;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use parser::Cli;

/// Parse a list of command line arguments, the way a user would provide them.
pub fn parse_cli<S: AsRef<str>>(args: &[S]) -> Result<Cli> {
    let args = std::iter::once("impute2-stats").chain(args.iter().map(AsRef::as_ref));
    Ok(Cli::try_parse_from(args)?)
}

/// Parse and run a command line.
pub fn run_cli<S: AsRef<str>>(args: &[S]) -> Result<()> {
    impute2_stats::run(parse_cli(args)?)
}

/// Read an output file, as a vector of lines.
pub fn read_lines(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to open {}", path.display()))
        .lines()
        .map(String::from)
        .collect()
}

/// Borrow a path as a command line argument.
pub fn as_str(path: &Path) -> &str {
    path.to_str().expect("Invalid path (non UTF8 characters ?)")
}

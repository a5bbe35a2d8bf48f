use std::{env, fs, path::{Path, PathBuf}, ops::Deref, fmt::{self, Formatter, Display}};
use tempfile::{self, TempDir};

pub const TEST_DATA_DIR: &str = "./tests/test-data";

/// A copy of a `tests/test-data` file, living within its own temporary directory.
/// Output files of a run can be written alongside, using [`Fixture::dir`].
pub struct Fixture {
    path: PathBuf,
    tempdir: TempDir,
}

impl Fixture {
    pub fn copy(fixture_filename: &str) -> Self {
        let root_dir = env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR");
        let source   = PathBuf::from(root_dir).join(TEST_DATA_DIR).join(fixture_filename);

        let tempdir  = tempfile::tempdir().expect("Failed to generate temp directory");
        let path     = tempdir.path().join(fixture_filename);
        fs::copy(&source, &path)
            .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {e}", source.display()));
        Self{path, tempdir}
    }

    /// Temporary directory holding the fixture.
    pub fn dir(&self) -> &Path {
        self.tempdir.path()
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.path.deref()
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.to_str().expect("Invalid path (non UTF8 characters ?)"))
    }
}

use std::{fs::File, io::{BufRead, BufReader}, path::Path, fmt::{self, Display, Formatter}};

use genome::Sex;
use located_error::LocatedError;
use log::{debug, warn};
use anyhow::Result;

mod error;
pub use error::SampleReaderError;

/// Name of the column carrying sample identifiers.
const ID_COLUMN : &str = "ID_2";
/// Name of the column carrying family identifiers.
const FID_COLUMN: &str = "ID_1";
/// Name of the column carrying the sex of each sample.
const SEX_COLUMN: &str = "sex";

/// Simple Struct representing an input sample, as found within an IMPUTE2 `.sample` file.
/// # Fields
/// - `fid`: family id of the sample (`ID_1`)
/// - `id` : name of the sample (`ID_2`)
/// - `idx`: 0-based index of the sample. Matches the row index of the sample within a probability matrix.
/// - `sex`: sex of the sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTag {
    fid: String,
    id : String,
    idx: usize,
    sex: Sex,
}

impl SampleTag {
    pub fn new(fid: &str, id: &str, idx: usize, sex: Sex) -> Self {
        Self{fid: fid.to_string(), id: id.to_string(), idx, sex}
    }

    /// Return the name of the sample.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the sex of the sample
    #[must_use]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// PLINK `.tfam` representation of this sample: `FID IID PAT MAT SEX PHENO`.
    #[must_use]
    pub fn tfam_line(&self) -> String {
        format!("{} {} 0 0 {} -9", self.fid, self.id, self.sex.code())
    }
}

impl Display for SampleTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.idx)
    }
}

/// IMPUTE2 `.sample` file reader.
/// ### File characteristics:
/// - whitespace separated fields.
/// - line 1: column names. e.g. `ID_1 ID_2 missing sex`
/// - line 2: column types. e.g. `0 0 0 D`
/// - line 3..: one sample per line, in the same order as the probability triplets of the IMPUTE2 file.
///
/// The `sex` column is optional. When absent, every sample is of unknown sex.
#[derive(Debug, Clone)]
pub struct SampleReader {
    samples: Vec<SampleTag>,
}

impl SampleReader {
    /// # Errors
    /// - if `path` cannot be opened.
    /// - if the file is missing its two header lines, or any line does not match the header.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|source| SampleReaderError::Open{path: path.to_path_buf(), source})
            .loc("While attempting to create a new SampleReader")?;
        Self::from_reader(BufReader::new(file))
            .with_loc(|| format!("While parsing sample file '{}'", path.display()))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        use SampleReaderError::{FillBuffer, MissingHeader, MissingTypes, FieldCount};
        let loc_msg = "While parsing samples";
        let mut lines = reader.lines()
            .enumerate()
            .map(|(i, line)| line.map(|line| (i + 1, line)).map_err(FillBuffer));

        let (_, header) = lines.next().transpose().loc(loc_msg)?.ok_or(MissingHeader).loc(loc_msg)?;
        let columns = header.split_whitespace().collect::<Vec<&str>>();
        let find_column = |name: &str| columns.iter().position(|column| column.eq_ignore_ascii_case(name));
        let id_col  = find_column(ID_COLUMN).unwrap_or(0);
        let fid_col = find_column(FID_COLUMN).unwrap_or(id_col);
        let sex_col = find_column(SEX_COLUMN);
        if sex_col.is_none() {
            warn!("Sample file does not contain any '{SEX_COLUMN}' column. All samples are considered of unknown sex");
        }

        let _types = lines.next().transpose().loc(loc_msg)?.ok_or(MissingTypes).loc(loc_msg)?;

        let mut samples = Vec::new();
        for entry in lines {
            let (line, entry) = entry.loc(loc_msg)?;
            let fields = entry.split_whitespace().collect::<Vec<&str>>();
            if fields.is_empty() {
                continue
            }
            if fields.len() != columns.len() {
                return Err(FieldCount{line, found: fields.len(), expected: columns.len()}).loc(loc_msg)
            }

            let sex = sex_col.map_or(Sex::Unknown, |col| fields[col].parse::<Sex>().unwrap_or_default());
            samples.push(SampleTag::new(fields[fid_col], fields[id_col], samples.len(), sex));
        }

        debug!("Found {} samples ({} males, {} females)",
            samples.len(),
            samples.iter().filter(|tag| tag.sex().is_male()).count(),
            samples.iter().filter(|tag| tag.sex().is_female()).count(),
        );
        Ok(Self{samples})
    }

    #[must_use]
    pub fn samples(&self) -> &[SampleTag] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sex of every sample, ordered as in the sample file.
    #[must_use]
    pub fn genders(&self) -> Vec<Sex> {
        self.samples.iter().map(SampleTag::sex).collect()
    }

    /// Ensure the number of samples matches the number of probability triplets of an IMPUTE2 record.
    pub fn check_sample_count(&self, records: usize) -> Result<()> {
        match self.len() == records {
            true  => Ok(()),
            false => Err(SampleReaderError::SampleCountMismatch{samples: self.len(), records})
                .loc("While matching samples against IMPUTE2 records")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const SAMPLE_FILE: &str = "\
ID_1 ID_2 missing father mother sex plink_pheno
0 0 0 D D D B
fam1 ind1 0 0 0 1 -9
fam2 ind2 0 0 0 2 -9

fam3 ind3 0 0 0 0 -9
";

    #[test]
    fn parse_sample_file() -> Result<()> {
        let reader = SampleReader::from_reader(Cursor::new(SAMPLE_FILE))?;
        assert_eq!(reader.len(), 3);
        assert_eq!(reader.genders(), vec![Sex::Male, Sex::Female, Sex::Unknown]);
        assert_eq!(reader.samples()[1], SampleTag::new("fam2", "ind2", 1, Sex::Female));
        assert_eq!(reader.samples()[2].to_string(), "ind3 (2)");
        Ok(())
    }

    #[test]
    fn missing_sex_column() -> Result<()> {
        let reader = SampleReader::from_reader(Cursor::new("ID_1 ID_2 missing\n0 0 0\nfam1 ind1 0\n"))?;
        assert_eq!(reader.genders(), vec![Sex::Unknown]);
        Ok(())
    }

    #[test]
    fn case_insensitive_columns() -> Result<()> {
        let reader = SampleReader::from_reader(Cursor::new("id_1 id_2 SEX\n0 0 D\nfam1 ind1 2\n"))?;
        assert_eq!(reader.samples()[0], SampleTag::new("fam1", "ind1", 0, Sex::Female));
        Ok(())
    }

    #[test]
    fn missing_types_line() {
        let err = SampleReader::from_reader(Cursor::new("ID_1 ID_2 sex\n")).expect_err("Expected an error");
        assert!(matches!(err.downcast_ref::<SampleReaderError>(), Some(SampleReaderError::MissingTypes)));
    }

    #[test]
    fn empty_file() {
        let err = SampleReader::from_reader(Cursor::new("")).expect_err("Expected an error");
        assert!(matches!(err.downcast_ref::<SampleReaderError>(), Some(SampleReaderError::MissingHeader)));
    }

    #[test]
    fn invalid_field_count() {
        let err = SampleReader::from_reader(Cursor::new("ID_1 ID_2 sex\n0 0 D\nfam1 ind1\n")).expect_err("Expected an error");
        assert!(matches!(err.downcast_ref::<SampleReaderError>(), Some(SampleReaderError::FieldCount{line: 3, found: 2, expected: 3})));
    }

    #[test]
    fn sample_count() -> Result<()> {
        let reader = SampleReader::from_reader(Cursor::new(SAMPLE_FILE))?;
        assert!(reader.check_sample_count(3).is_ok());
        let err = reader.check_sample_count(4).expect_err("Expected a mismatch");
        assert!(matches!(err.downcast_ref::<SampleReaderError>(), Some(SampleReaderError::SampleCountMismatch{samples: 3, records: 4})));
        Ok(())
    }

    #[test]
    fn tfam_line() {
        assert_eq!(SampleTag::new("fam1", "ind1", 0, Sex::Male).tfam_line(), "fam1 ind1 0 0 1 -9");
        assert_eq!(SampleTag::new("fam3", "ind3", 2, Sex::Unknown).tfam_line(), "fam3 ind3 0 0 0 -9");
    }

    #[test]
    fn open_file() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path   = tmpdir.path().join("samples.sample");
        File::create(&path)?.write_all(SAMPLE_FILE.as_bytes())?;
        assert_eq!(SampleReader::new(&path)?.len(), 3);
        Ok(())
    }
}

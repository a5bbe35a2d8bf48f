use std::{
    ffi::OsStr,
    fmt::{self, Display, Formatter},
    fs::File,
    io::IsTerminal,
    path::{Path, PathBuf},
};

use located_error::prelude::*;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use log::debug;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="impute2-stats", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// impute2-stats: Summary statistics from IMPUTE2 genotype probabilities
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emmited and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder.
    /// - `from-yaml` runs are never serialized.
    ///
    /// # Errors
    /// - if `serde_yaml` fails to parse `Self` to a string.
    /// - if the output `.yaml` file cannot be written.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let loc_msg = "While serializing command line arguments";
        let (common, name) = match self.commands.common() {
            Some(common) => (common, self.commands.name()),
            None         => return Ok(None),
        };

        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::Serialize)
            .loc(loc_msg)?;
        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file  = common.output_dir.join(format!("{current_time}-{name}.yaml"));

        std::fs::write(&output_file, serialized)
            .map_err(|e| ParserError::YamlIO(output_file.display().to_string(), e))
            .loc(loc_msg)?;
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    /// - if the provided `.yaml` does not exist, or does not carry read permissions.
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let loc_msg = || format!("While deserializing arguments from {}", yaml.display());
        let file = File::open(yaml)
            .map_err(|e| ParserError::YamlIO(yaml.display().to_string(), e))
            .with_loc(loc_msg)?;
        serde_yaml::from_reader(file)
            .map_err(|e| ParserError::Deserialize(yaml.display().to_string(), e))
            .with_loc(loc_msg)
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Compute the minor allele frequency of each site, using confident genotypes only.
    ///
    /// Sites located on any of the `--chr-x` chromosomes are processed in a sex-aware manner,
    /// provided a `--sample` file carrying a 'sex' column.
    Maf {
        #[clap(flatten)]
        common: Common,
    },

    /// Compute the expected minor allele dosage of each sample, at each site.
    Dosage {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        dosage: Dosage,
    },

    /// Convert genotype probabilities into hard genotype calls (PLINK .tped/.tfam)
    HardCalls {
        #[clap(flatten)]
        common: Common,
    },

    /// Run impute2-stats using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a command using the exact same parameters
    /// and arguments.
    FromYaml {
        yaml: PathBuf,
    },
}

impl Commands {
    /// Arguments shared by every statistic. `None` for `from-yaml`.
    #[must_use]
    pub fn common(&self) -> Option<&Common> {
        match self {
            Self::Maf{common} | Self::Dosage{common, ..} | Self::HardCalls{common} => Some(common),
            Self::FromYaml{..} => None,
        }
    }

    /// Name of the subcommand, as typed on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Maf{..}       => "maf",
            Self::Dosage{..}    => "dosage",
            Self::HardCalls{..} => "hard-calls",
            Self::FromYaml{..}  => "from-yaml",
        }
    }
}

#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Common {
    /// Input IMPUTE2 genotype probability file (optionally BGZF-compressed).
    ///
    /// Note that in the absence of an '--impute2' argument, the program may accept a data stream from the standard input. i.e:{n}
    ///
    ///     zcat chr22.impute2.gz | impute2-stats maf [...]{n}
    ///
    #[clap(short='i', long, required(false), parse(try_from_os_str=valid_input_file))]
    pub impute2: Option<PathBuf>,

    /// IMPUTE2 '.sample' file, listing samples in the same order as the input probability triplets.
    ///
    /// Required to compute sex-aware allele frequencies on chromosome X, and to write a PLINK '.tfam' file.
    /// Samples are considered of unknown sex if the file does not carry any 'sex' column.
    #[clap(short='s', long, required(false), parse(try_from_os_str=valid_input_file))]
    pub sample: Option<PathBuf>,

    /// Minimal probability of the most likely genotype.
    ///
    /// Samples whose most likely genotype probability is lower than this treshold are considered
    /// as missing. Value must lie within [0, 1].
    #[clap(short='p', long, default_value("0.9"), parse(try_from_str=parse_probability))]
    pub prob: f64,

    /// Names of the chromosomes considered as sex-linked (X).
    ///
    /// Leading 'chr' prefixes are ignored, and names are case insensitive.
    #[clap(long, multiple_values(true), default_values(&["X", "23"]))]
    pub chr_x: Vec<String>,

    /// Output directory where results will be written.
    ///
    /// Note that the directory is created if it does not exist. Parent directories must exist beforehand.
    #[clap(short, long, default_value("impute2-stats-output"), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: PathBuf,

    /// Prefix of output files.
    ///
    /// Defaults to the file name of the '--impute2' input, stripped of its extensions, or to
    /// 'impute2-stats' when reading from the standard input.
    #[clap(long, required(false))]
    pub prefix: Option<String>,

    /// Overwrite existing output files.
    ///
    /// By default, the program will fail if an output file already exists.
    #[clap(short='w', long)]
    pub overwrite: bool,

    /// Skip sites carrying heterozygous males on chromosome X.
    ///
    /// By default, encountering a heterozygous male on a sex chromosome is considered an unrecoverable error.
    /// Use this flag to emit a warning and skip the offending site instead.
    #[clap(long)]
    pub skip_invalid: bool,

    /// Number of additional parallel decompression threads (BGZF compressed files only).
    #[clap(short='#', long, default_value("0"))]
    pub decompression_threads: usize,
}

impl Common {
    /// Sanity Check: The program should leave if the user did not provide any IMPUTE2 input, either through
    /// `--impute2` or through stdin. Without this, our program would wait indefinitely for the stdin buffer.
    ///
    /// # Errors
    /// - if the user did not provide an input file, neither from stdin, nor through the `--impute2` argument.
    pub fn check_input(&self) -> Result<(), ParserError> {
        if std::io::stdin().is_terminal() && self.impute2.is_none() {
            return Err(ParserError::MissingImpute2Input)
        }
        Ok(())
    }
}

#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Dosage {
    /// Scale of the expected dosage.
    ///
    /// Dosages are computed as '(2 * P(hom. minor) + P(het)) * scale / 2', and thus lie within [0, scale]
    #[clap(long, default_value("2"), parse(try_from_str=parse_scale))]
    pub scale: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(&self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(*self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: &FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(*entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir(s)?;
    }
    assert_filesystem_entity_is_valid(s, &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

fn parse_probability(s: &str) -> Result<f64> {
    use ParserError::ParseRatio;
    const MIN_PROB: f64 = 0.0;
    const MAX_PROB: f64 = 1.0;

    let prob = s.parse::<f64>().with_loc(|| format!("While parsing {s}"))?;
    match (MIN_PROB..=MAX_PROB).contains(&prob) {
        true  => Ok(prob),
        false => Err(anyhow!(ParseRatio(MIN_PROB, MAX_PROB))).with_loc(|| format!("While parsing {s}"))
    }
}

fn parse_scale(s: &str) -> Result<f64> {
    let scale = s.parse::<f64>().with_loc(|| format!("While parsing {s}"))?;
    match scale.is_finite() && scale > 0.0 {
        true  => Ok(scale),
        false => Err(anyhow!(ParserError::InvalidScale)).with_loc(|| format!("While parsing {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args.split_whitespace())
    }

    #[test]
    fn maf_defaults() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let cli = parse(&format!("impute2-stats maf --output-dir {}", tmpdir.path().display()))?;
        let common = cli.commands.common().expect("maf should carry common arguments");
        assert_eq!(common.prob, 0.9);
        assert_eq!(common.chr_x, vec![String::from("X"), String::from("23")]);
        assert_eq!(common.impute2, None);
        assert!(!common.overwrite && !common.skip_invalid);
        assert_eq!(cli.commands.name(), "maf");
        Ok(())
    }

    #[test]
    fn global_verbosity() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let cli = parse(&format!("impute2-stats hard-calls -o {} -vvq", tmpdir.path().display()))?;
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert_eq!(cli.commands.name(), "hard-calls");
        Ok(())
    }

    #[test]
    fn dosage_scale() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let cli = parse(&format!("impute2-stats dosage --scale 1 -o {}", tmpdir.path().display()))?;
        assert!(matches!(cli.commands, Commands::Dosage{dosage: Dosage{scale}, ..} if scale == 1.0));

        assert!(parse(&format!("impute2-stats dosage --scale 0 -o {}", tmpdir.path().display())).is_err());
        assert!(parse(&format!("impute2-stats dosage --scale -2 -o {}", tmpdir.path().display())).is_err());
        Ok(())
    }

    #[test]
    fn probability_bounds() {
        assert_eq!(parse_probability("0").ok(), Some(0.0));
        assert_eq!(parse_probability("1").ok(), Some(1.0));
        assert_eq!(parse_probability("0.95").ok(), Some(0.95));
        for invalid in ["-0.1", "1.01", "ninety"] {
            assert!(parse_probability(invalid).is_err(), "{invalid}");
        }
        let err = parse_probability("2").expect_err("Expected out of bounds probability");
        assert!(matches!(err.downcast_ref::<ParserError>(), Some(ParserError::ParseRatio(_, _))));
    }

    #[test]
    fn chr_x_values() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let cli = parse(&format!("impute2-stats maf --chr-x chrX 25 -o {}", tmpdir.path().display()))?;
        let common = cli.commands.common().expect("maf should carry common arguments");
        assert_eq!(common.chr_x, vec![String::from("chrX"), String::from("25")]);
        Ok(())
    }

    #[test]
    fn missing_input_file() {
        let err = valid_input_file(OsStr::new("./this/file/does/not/exist.impute2")).expect_err("Expected missing file");
        assert!(matches!(err.downcast_ref::<ParserError>(), Some(ParserError::MissingFileEntity(FileEntity::File, _))));
    }

    #[test]
    fn input_file_is_a_directory() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let err = valid_input_file(tmpdir.path().as_os_str()).expect_err("Expected invalid file");
        assert!(matches!(err.downcast_ref::<ParserError>(), Some(ParserError::InvalidFileEntity(FileEntity::File, _))));
        Ok(())
    }

    #[test]
    fn output_dir_is_created() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let outdir = tmpdir.path().join("results");
        assert_eq!(valid_output_dir(outdir.as_os_str())?, outdir);
        assert!(outdir.is_dir());
        Ok(())
    }

    #[test]
    fn yaml_round_trip() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let cli = parse(&format!("impute2-stats dosage -p 0.8 --prefix run -w --scale 1 -o {}", tmpdir.path().display()))?;
        let yaml = cli.serialize()?.expect("Expected a serialized configuration file");
        assert!(yaml.starts_with(tmpdir.path()));
        assert!(yaml.to_string_lossy().ends_with("-dosage.yaml"));

        let replay = Cli::deserialize(&yaml)?;
        let common = replay.commands.common().expect("dosage should carry common arguments");
        assert_eq!(common.prob, 0.8);
        assert_eq!(common.prefix.as_deref(), Some("run"));
        assert!(common.overwrite);
        assert!(matches!(replay.commands, Commands::Dosage{dosage: Dosage{scale}, ..} if scale == 1.0));
        Ok(())
    }

    #[test]
    fn from_yaml_is_not_serialized() -> Result<()> {
        let cli = parse("impute2-stats from-yaml previous-run.yaml")?;
        assert_eq!(cli.serialize()?, None);
        Ok(())
    }

    #[test]
    fn invalid_yaml() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let yaml = tmpdir.path().join("invalid.yaml");
        std::fs::write(&yaml, "commands: [not, a, command]")?;
        let err = Cli::deserialize(&yaml).expect_err("Expected a deserialization error");
        assert!(matches!(err.downcast_ref::<ParserError>(), Some(ParserError::Deserialize(_, _))));
        Ok(())
    }
}

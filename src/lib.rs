use std::path::Path;

use impute2_io::{
    parse::{default_prefix, get_output_file},
    read::{Impute2Reader, SampleReader, SampleTag},
    write::GenericWriter,
};
use parser::{Cli, Commands, Common};
use located_error::prelude::*;
use log::{info, debug};

pub mod error;
pub use error::RunError;

mod runner;
pub use runner::{RunConfig, RunSummary, Runner, Statistic};

/// Output file prefix, when reading from the standard input.
pub const DEFAULT_PREFIX: &str = "impute2-stats";

/// Unpack command line arguments and run the requested statistic.
///
/// # Errors
/// Bubbles up any error raised while reading inputs, computing statistics or writing outputs.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Commands::Maf{common}            => run_statistic(&common, Statistic::Maf),
        Commands::Dosage{common, dosage} => run_statistic(&common, Statistic::Dosage{scale: dosage.scale}),
        Commands::HardCalls{common}      => run_statistic(&common, Statistic::HardCalls),
        Commands::FromYaml{yaml}         => {
            let cli = Cli::deserialize(&yaml).loc("While replaying a previous run")?;
            if let Commands::FromYaml{..} = cli.commands {
                return loc!(RunError::NestedYaml(yaml.display().to_string()))
            }
            info!("Replaying '{}' from {}", cli.commands.name(), yaml.display());
            self::run(cli)
        },
    }
}

fn run_statistic(common: &Common, statistic: Statistic) -> Result<()> {
    let loc_msg = || format!("While computing {statistic}");
    common.check_input().with_loc(loc_msg)?;

    let prefix = common.prefix.clone()
        .unwrap_or_else(|| default_prefix(common.impute2.as_deref(), DEFAULT_PREFIX));
    let output = get_output_file(&common.output_dir, &prefix, statistic.extension(), common.overwrite)
        .with_loc(loc_msg)?;

    let samples = match &common.sample {
        Some(path) => Some(SampleReader::new(path).with_loc(loc_msg)?),
        None       => None,
    };

    if let (Statistic::HardCalls, Some(samples)) = (statistic, &samples) {
        write_tfam(&common.output_dir, &prefix, common.overwrite, samples).with_loc(loc_msg)?;
    }

    let config  = RunConfig::new(common.prob, &common.chr_x, common.skip_invalid).with_loc(loc_msg)?;
    debug!("{config:?}");
    let records = Impute2Reader::new(common.impute2.as_deref(), common.decompression_threads).with_loc(loc_msg)?;
    let writer  = GenericWriter::new(Some(&output)).with_loc(loc_msg)?;

    info!("Writing {statistic} into {}", output.display());
    let summary = Runner::new(statistic, config, samples.as_ref(), writer).run(records).with_loc(loc_msg)?;
    info!("{summary}");
    Ok(())
}

/// Write a PLINK `.tfam` file, listing samples in the same order as the `.tped` columns.
fn write_tfam(output_dir: &Path, prefix: &str, overwrite: bool, samples: &SampleReader) -> Result<()> {
    let output = get_output_file(output_dir, prefix, "tfam", overwrite)?;
    info!("Writing sample definitions into {}", output.display());
    GenericWriter::new(Some(&output))?.write_iter(samples.samples().iter().map(SampleTag::tfam_line))
}

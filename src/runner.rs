use std::{fmt::{self, Display, Formatter}, str::FromStr};

use genome::{Chromosome, Sex};
use impute2::{good_probs, hard_calls_from_probs, minor_allele_dosage, Impute2Error, Impute2Record, SiteSummary};
use impute2_io::{read::SampleReader, write::{format_optional, GenericWriter}};
use located_error::prelude::*;
use log::warn;

use crate::error::RunError;

/// Number of decimals of allele frequencies and completion rates.
const FREQ_PRECISION  : usize = 6;
/// Number of decimals of per-sample dosages.
const DOSAGE_PRECISION: usize = 4;
/// PLINK representation of a missing genotype.
const MISSING_CALL    : &str  = "0 0";

/// Statistic computed at each site, and written as one output line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Maf,
    Dosage{scale: f64},
    HardCalls,
}

impl Statistic {
    /// Extension of the output file.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Maf       => "maf",
            Self::Dosage{..}=> "dosage",
            Self::HardCalls => "tped",
        }
    }

    /// Column names of the output file. `.tped` files do not carry any header.
    fn header(&self, samples: Option<&SampleReader>, n_samples: usize) -> Option<Vec<String>> {
        let fields = match self {
            Self::Maf        => vec!["chr", "name", "pos", "a1", "a2", "maf", "minor", "major", "n_good", "n", "completion"],
            Self::Dosage{..} => vec!["chr", "name", "pos", "minor", "major"],
            Self::HardCalls  => return None,
        };
        let mut header = fields.into_iter().map(String::from).collect::<Vec<String>>();
        if let Self::Dosage{..} = self {
            match samples {
                Some(samples) => header.extend(samples.samples().iter().map(|tag| tag.id().to_string())),
                None          => header.extend((0..n_samples).map(|i| format!("ind{i}"))),
            }
        }
        Some(header)
    }
}

impl Display for Statistic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maf        => write!(f, "minor allele frequencies"),
            Self::Dosage{..} => write!(f, "minor allele dosages"),
            Self::HardCalls  => write!(f, "hard calls"),
        }
    }
}

/// Site-level settings shared by every statistic.
/// - `min_prob`    : minimal probability of the most likely genotype.
/// - `chr_x`       : chromosomes processed in a sex-aware manner.
/// - `skip_invalid`: warn and skip sites carrying heterozygous males, instead of failing.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub min_prob    : f64,
    pub chr_x       : Vec<Chromosome>,
    pub skip_invalid: bool,
}

impl RunConfig {
    /// # Errors
    /// if any of the `chr_x` names is empty once normalized.
    pub fn new(min_prob: f64, chr_x: &[String], skip_invalid: bool) -> Result<Self> {
        let chr_x = chr_x.iter()
            .map(|name| Chromosome::from_str(name).map_err(|e| RunError::InvalidChromosome(name.clone(), e)))
            .collect::<Result<Vec<Chromosome>, RunError>>()
            .loc("While parsing sex chromosomes")?;
        Ok(Self{min_prob, chr_x, skip_invalid})
    }
}

/// Counters reported once every record has been processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub no_data  : usize,
    pub skipped  : usize,
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Processed {} sites ({} without any confident genotype, {} skipped)",
            self.processed, self.no_data, self.skipped
        )
    }
}

/// Stream IMPUTE2 records, compute a [`Statistic`] for each of them, and write one line per site.
pub struct Runner<'a> {
    statistic  : Statistic,
    config     : RunConfig,
    samples    : Option<&'a SampleReader>,
    genders    : Option<Vec<Sex>>,
    n_samples  : Option<usize>,
    writer     : GenericWriter<'a>,
    summary    : RunSummary,
    warned_sex : bool,
}

impl<'a> Runner<'a> {
    pub fn new(statistic: Statistic, config: RunConfig, samples: Option<&'a SampleReader>, writer: GenericWriter<'a>) -> Self {
        let genders = samples.map(SampleReader::genders);
        Self{statistic, config, samples, genders, n_samples: None, writer, summary: RunSummary::default(), warned_sex: false}
    }

    /// Process every record, flush the output and return the run counters.
    ///
    /// # Errors
    /// - if any record is malformed, or does not match the number of samples.
    /// - if a heterozygous male is found on a sex chromosome, and `skip_invalid` is off.
    /// - if the output cannot be written.
    pub fn run(mut self, records: impl Iterator<Item = Result<Impute2Record>>) -> Result<RunSummary> {
        let spinner = logger::Logger::spinner("Processing sites");
        for record in records {
            let record = record.loc("While processing IMPUTE2 records")?;
            self.process(&record).with_loc(|| format!("While processing site {}", record.name()))?;
            spinner.inc(1);
        }
        spinner.finish_and_clear();
        self.writer.flush().loc("While flushing output")?;
        Ok(self.summary)
    }

    /// Compute and write the statistic of a single record.
    pub fn process(&mut self, record: &Impute2Record) -> Result<()> {
        if let Some(samples) = self.samples {
            samples.check_sample_count(record.n_samples())?;
        }

        match self.n_samples {
            Some(expected) if expected != record.n_samples() => {
                return loc!(RunError::SampleCountChanged{site: record.name().to_string(), expected, found: record.n_samples()})
            },
            Some(_) => (),
            None    => {
                self.n_samples = Some(record.n_samples());
                if let Some(header) = self.statistic.header(self.samples, record.n_samples()) {
                    self.writer.write_fields(header)?;
                }
            },
        }
        self.summary.processed += 1;

        let fields = match self.statistic {
            Statistic::Maf           => self.maf_fields(record)?,
            Statistic::Dosage{scale} => self.dosage_fields(record, scale)?,
            Statistic::HardCalls     => Some(self.hard_call_fields(record)?),
        };

        match fields {
            Some(fields) => self.writer.write_fields(fields),
            None         => {
                self.summary.skipped += 1;
                Ok(())
            }
        }
    }

    /// Gender of every sample, if the record lies on a sex chromosome.
    fn gender(&mut self, record: &Impute2Record) -> Option<&[Sex]> {
        let is_x = Chromosome::from_str(record.chromosome()).is_ok_and(|chr| chr.is_any_of(&self.config.chr_x));
        if is_x && self.genders.is_none() && !self.warned_sex {
            warn!("Found sites on chromosome {}, but no sample file was provided. These will be processed as autosomal sites", record.chromosome());
            self.warned_sex = true;
        }
        self.genders.as_deref().filter(|_| is_x)
    }

    /// `None` if the site was skipped.
    fn summarize(&mut self, record: &Impute2Record) -> Result<Option<SiteSummary>> {
        let min_prob     = self.config.min_prob;
        let skip_invalid = self.config.skip_invalid;
        match SiteSummary::compute(record, self.gender(record), min_prob) {
            Ok(summary) => {
                if summary.maf.maf.is_none() {
                    self.summary.no_data += 1;
                }
                Ok(Some(summary))
            },
            Err(e @ Impute2Error::HeterozygousMale{..}) if skip_invalid => {
                warn!("{e}. Skipping site.");
                Ok(None)
            },
            Err(e) => Err(e).loc("While computing site summary"),
        }
    }

    fn maf_fields(&mut self, record: &Impute2Record) -> Result<Option<Vec<String>>> {
        let Some(summary) = self.summarize(record)? else {
            return Ok(None)
        };
        let mut fields = record.metadata().to_vec();
        fields.extend([
            format_optional(summary.maf.maf, FREQ_PRECISION),
            summary.maf.minor.clone(),
            summary.maf.major.clone(),
            summary.n_good.to_string(),
            summary.n_samples.to_string(),
            format_optional(summary.completion(), FREQ_PRECISION),
        ]);
        Ok(Some(fields))
    }

    fn dosage_fields(&mut self, record: &Impute2Record, scale: f64) -> Result<Option<Vec<String>>> {
        let Some(summary) = self.summarize(record)? else {
            return Ok(None)
        };
        let probs   = record.probabilities();
        let good    = good_probs(probs, self.config.min_prob);
        let dosages = minor_allele_dosage(probs, record.a1(), &summary.maf.minor, scale);

        let mut fields = vec![
            record.chromosome().to_string(),
            record.name().to_string(),
            record.position().to_string(),
            summary.maf.minor,
            summary.maf.major,
        ];
        fields.extend(dosages.iter().zip(&good).map(|(dosage, keep)| format_optional(keep.then_some(*dosage), DOSAGE_PRECISION)));
        Ok(Some(fields))
    }

    fn hard_call_fields(&mut self, record: &Impute2Record) -> Result<Vec<String>> {
        let probs = record.probabilities();
        let good  = good_probs(probs, self.config.min_prob);
        if !good.iter().any(|&keep| keep) {
            self.summary.no_data += 1;
        }
        let calls = hard_calls_from_probs(record.a1(), record.a2(), probs).loc("While computing hard calls")?;

        let mut fields = vec![
            record.chromosome().to_string(),
            record.name().to_string(),
            String::from("0"),
            record.position().to_string(),
        ];
        fields.extend(calls.into_iter().zip(&good).map(|(call, &keep)| if keep { call } else { MISSING_CALL.to_string() }));
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use impute2_io::read::{Impute2Reader, SampleReader};

    const SAMPLES: &str = "ID_1 ID_2 missing sex\n0 0 0 D\nf1 male1 0 1\nf2 female1 0 2\nf3 unknown1 0 0\n";

    fn run(statistic: Statistic, config: RunConfig, samples: Option<&SampleReader>, input: &str) -> Result<(RunSummary, String)> {
        let mut output = Vec::new();
        let summary = Runner::new(statistic, config, samples, GenericWriter::from_writer(&mut output))
            .run(Impute2Reader::from_reader(Cursor::new(input.to_string())))?;
        Ok((summary, String::from_utf8(output)?))
    }

    fn config(min_prob: f64, skip_invalid: bool) -> Result<RunConfig> {
        RunConfig::new(min_prob, &[String::from("X"), String::from("23")], skip_invalid)
    }

    #[test]
    fn maf_output() -> Result<()> {
        let input = "1 site1 100 A G 0.9 0.05 0.05 0.1 0.8 0.1\n\n1 site2 200 C T 0.4 0.3 0.3 0.5 0.25 0.25\n";
        let (summary, output) = run(Statistic::Maf, config(0.0, false)?, None, input)?;
        let lines = output.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], "chr\tname\tpos\ta1\ta2\tmaf\tminor\tmajor\tn_good\tn\tcompletion");
        assert_eq!(lines[1], "1\tsite1\t100\tA\tG\t0.250000\tG\tA\t2\t2\t1.000000");
        assert_eq!(lines[2], "1\tsite2\t200\tC\tT\t0.000000\tT\tC\t2\t2\t1.000000");
        assert_eq!(summary, RunSummary{processed: 2, no_data: 0, skipped: 0});
        Ok(())
    }

    #[test]
    fn maf_without_confident_samples() -> Result<()> {
        let (summary, output) = run(Statistic::Maf, config(0.9, false)?, None, "1 site2 200 C T 0.4 0.3 0.3\n")?;
        assert_eq!(output.lines().nth(1), Some("1\tsite2\t200\tC\tT\tNA\tT\tC\t0\t1\t0.000000"));
        assert_eq!(summary.no_data, 1);
        Ok(())
    }

    #[test]
    fn sex_aware_maf() -> Result<()> {
        let samples = SampleReader::from_reader(Cursor::new(SAMPLES))?;
        // male BB, female AB, unknown BB: (1 + 1) / (1 + 2)
        let input = "chrX rs1 100 A G 0 0 1 0 1 0 0 0 1\n";
        let (_, output) = run(Statistic::Maf, config(0.9, false)?, Some(&samples), input)?;
        assert_eq!(output.lines().nth(1), Some("chrX\trs1\t100\tA\tG\t0.333333\tA\tG\t3\t3\t1.000000"));

        // Autosomes ignore sex: (2 + 1 + 2) / 6
        let (_, output) = run(Statistic::Maf, config(0.9, false)?, Some(&samples), &input.replace("chrX", "22"))?;
        assert_eq!(output.lines().nth(1), Some("22\trs1\t100\tA\tG\t0.166667\tA\tG\t3\t3\t1.000000"));
        Ok(())
    }

    #[test]
    fn heterozygous_male() -> Result<()> {
        let samples = SampleReader::from_reader(Cursor::new(SAMPLES))?;
        let input = "X rs1 100 A G 0 1 0 0 1 0 0 0 1\nX rs2 200 A G 1 0 0 1 0 0 1 0 0\n";

        let err = run(Statistic::Maf, config(0.9, false)?, Some(&samples), input).expect_err("Expected a heterozygous male");
        assert!(matches!(err.downcast_ref::<Impute2Error>(), Some(Impute2Error::HeterozygousMale{site}) if site == "rs1"));

        let (summary, output) = run(Statistic::Maf, config(0.9, true)?, Some(&samples), input)?;
        assert_eq!(summary, RunSummary{processed: 2, no_data: 0, skipped: 1});
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("rs2"));
        Ok(())
    }

    #[test]
    fn sample_count_mismatch() -> Result<()> {
        let samples = SampleReader::from_reader(Cursor::new(SAMPLES))?;
        let err = run(Statistic::HardCalls, config(0.9, false)?, Some(&samples), "1 rs1 100 A G 1 0 0\n");
        assert!(err.is_err());
        Ok(())
    }

    #[test]
    fn changing_sample_count() {
        let input = "1 rs1 100 A G 1 0 0 0 0 1\n1 rs2 200 A G 1 0 0\n";
        for statistic in [Statistic::Maf, Statistic::Dosage{scale: 2.0}, Statistic::HardCalls] {
            let err = run(statistic, config(0.9, false).expect("valid config"), None, input).expect_err("Expected a sample count error");
            assert!(matches!(
                err.downcast_ref::<RunError>(),
                Some(RunError::SampleCountChanged{site, expected: 2, found: 1}) if site == "rs2"
            ));
        }
    }

    #[test]
    fn dosage_output() -> Result<()> {
        let samples = SampleReader::from_reader(Cursor::new(SAMPLES))?;
        let input = "1 rs1 100 A G 0.95 0.05 0 0 0.5 0.5 0 0.02 0.98\n";
        let (_, output) = run(Statistic::Dosage{scale: 2.0}, config(0.9, false)?, Some(&samples), input)?;
        let lines = output.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], "chr\tname\tpos\tminor\tmajor\tmale1\tfemale1\tunknown1");
        assert_eq!(lines[1], "1\trs1\t100\tG\tA\t0.0500\tNA\t1.9800");
        Ok(())
    }

    #[test]
    fn dosage_of_swapped_alleles() -> Result<()> {
        let input = "1 rs1 100 A G 0 0 1 0 0.1 0.9\n";
        let (_, output) = run(Statistic::Dosage{scale: 1.0}, config(0.0, false)?, None, input)?;
        let lines = output.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], "chr\tname\tpos\tminor\tmajor\tind0\tind1");
        assert_eq!(lines[1], "1\trs1\t100\tA\tG\t0.0000\t0.0500");
        Ok(())
    }

    #[test]
    fn hard_calls_output() -> Result<()> {
        let input = "1 rs1 100 A G 0.95 0.03 0.02 0.1 0.8 0.1 0 0.1 0.9\n1 rs2 200 C T 0.4 0.3 0.3 0.5 0.5 0 0 0 1\n";
        let (summary, output) = run(Statistic::HardCalls, config(0.9, false)?, None, input)?;
        let lines = output.lines().collect::<Vec<&str>>();
        assert_eq!(lines, vec!["1\trs1\t0\t100\tA A\t0 0\tG G", "1\trs2\t0\t200\t0 0\t0 0\tT T"]);
        assert_eq!(summary, RunSummary{processed: 2, no_data: 0, skipped: 0});

        let (summary, _) = run(Statistic::HardCalls, config(0.99, false)?, None, input)?;
        assert_eq!(summary.no_data, 1);
        Ok(())
    }

    #[test]
    fn malformed_record() {
        let err = run(Statistic::Maf, config(0.9, false).expect("valid config"), None, "1 rs1 100 A G 0.9 0.1\n");
        assert!(err.is_err());
    }

    #[test]
    fn invalid_sex_chromosome() {
        let err = RunConfig::new(0.9, &[String::from("chr")], false).expect_err("Expected an empty chromosome name");
        assert!(matches!(err.downcast_ref::<RunError>(), Some(RunError::InvalidChromosome(name, _)) if name == "chr"));
    }
}

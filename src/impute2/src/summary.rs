use genome::Sex;
use log::debug;

use crate::{good_probs, maf_from_probs, select_samples, Impute2Error, Impute2Record, MafEstimate};

/// Per-site summary statistics.
///
/// The minor allele frequency is computed using confident samples only, i.e. those whose
/// most likely genotype probability is greater or equal to the requested threshold.
///
/// `n_good` counts every confident sample. On sex chromosomes, this includes samples of unknown
/// sex, even though these do not contribute to the allele frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub maf      : MafEstimate,
    pub n_good   : usize,
    pub n_samples: usize,
}

impl SiteSummary {
    /// # Errors
    /// Bubbles any error raised by [`maf_from_probs`] (e.g. heterozygous males on chromosome X).
    pub fn compute(record: &Impute2Record, gender: Option<&[Sex]>, min_prob: f64) -> Result<Self, Impute2Error> {
        let probs = record.probabilities();
        let good  = good_probs(probs, min_prob);

        if let Some(gender) = gender {
            if gender.len() != record.n_samples() {
                return Err(Impute2Error::GenderMismatch{samples: record.n_samples(), gender: gender.len()})
            }
        }
        let good_gender = gender.map(|gender| {
            gender.iter().zip(&good)
                .filter_map(|(sex, &keep)| keep.then_some(*sex))
                .collect::<Vec<Sex>>()
        });

        let good_probs = select_samples(probs, &good);
        let maf = maf_from_probs(good_probs.view(), record.a1(), record.a2(), good_gender.as_deref(), Some(record.name()))?;

        let summary = Self{maf, n_good: good_probs.nrows(), n_samples: record.n_samples()};
        if summary.maf.maf.is_none() {
            debug!("{}: no confident genotype ({} samples)", record.name(), summary.n_samples);
        }
        Ok(summary)
    }

    /// Proportion of confident samples. `None` if the site carries no sample.
    #[must_use]
    pub fn completion(&self) -> Option<f64> {
        match self.n_samples {
            0 => None,
            n => Some(self.n_good as f64 / n as f64)
        }
    }
}

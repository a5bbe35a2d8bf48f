use genome::{Genotype, GenotypeCounts, Sex};
use log::trace;
use ndarray::{ArrayView2, Axis};

use crate::Impute2Error;

/// Minor allele frequency of a site, along with the minor and major allele labels.
/// `maf` is `None` when no sample could be used to compute the frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct MafEstimate {
    pub maf  : Option<f64>,
    pub minor: String,
    pub major: String,
}

/// Most likely genotype of each sample (lowest index wins on exact ties).
///
/// # Errors
/// - [`Impute2Error::InvalidColumns`] if the matrix does not contain exactly 3 columns.
pub fn genotype_calls(probs: ArrayView2<'_, f64>) -> Result<Vec<Genotype>, Impute2Error> {
    if probs.ncols() != 3 {
        return Err(Impute2Error::InvalidColumns(probs.ncols()))
    }
    probs.axis_iter(Axis(0))
        .map(|row| Genotype::from_probs(row.iter()).map_err(Impute2Error::from))
        .collect()
}

/// Compute the minor allele frequency from a probability matrix.
///
/// When `gender` is provided, the site is assumed to lie on chromosome X: males count as a
/// single allele, females as two, and samples of unknown sex are ignored.
///
/// Allele `a1` is considered major and `a2` minor, unless the frequency of `a2` exceeds 0.5,
/// in which case labels are swapped and `1 - frequency` is returned.
///
/// # Errors
/// - [`Impute2Error::HeterozygousMale`] if any male sample is most likely heterozygous.
/// - [`Impute2Error::GenderMismatch`] if `gender` and `probs` differ in length.
/// - [`Impute2Error::InvalidColumns`] if `probs` does not contain exactly 3 columns.
pub fn maf_from_probs(
    probs    : ArrayView2<'_, f64>,
    a1       : &str,
    a2       : &str,
    gender   : Option<&[Sex]>,
    site_name: Option<&str>,
) -> Result<MafEstimate, Impute2Error> {
    let no_data = || MafEstimate{maf: None, minor: a2.to_string(), major: a1.to_string()};
    if probs.nrows() == 0 {
        return Ok(no_data())
    }

    let calls = genotype_calls(probs)?;
    let maf = match gender {
        None => {
            let counts = calls.into_iter().collect::<GenotypeCounts>();
            trace!("{}: {counts}", site_name.unwrap_or("-"));
            (counts.hom_a2() * 2 + counts.het()) as f64 / (counts.total() * 2) as f64
        },

        Some(gender) => {
            if gender.len() != calls.len() {
                return Err(Impute2Error::GenderMismatch{samples: calls.len(), gender: gender.len()})
            }

            let (mut males, mut females) = (GenotypeCounts::default(), GenotypeCounts::default());
            for (call, sex) in calls.into_iter().zip(gender) {
                match sex {
                    Sex::Male    => males.add(call),
                    Sex::Female  => females.add(call),
                    Sex::Unknown => continue,
                }
            }
            trace!("{}: males [{males}] - females [{females}]", site_name.unwrap_or("-"));

            if males.total() + females.total() == 0 {
                return Ok(no_data())
            }

            if males.het() > 0 {
                let site = site_name.unwrap_or("unknown site").to_string();
                return Err(Impute2Error::HeterozygousMale{site})
            }

            (males.hom_a2() + females.hom_a2() * 2 + females.het()) as f64
                / (males.total() + females.total() * 2) as f64
        }
    };

    Ok(match maf > 0.5 {
        true  => MafEstimate{maf: Some(1.0 - maf), minor: a1.to_string(), major: a2.to_string()},
        false => MafEstimate{maf: Some(maf), minor: a2.to_string(), major: a1.to_string()},
    })
}

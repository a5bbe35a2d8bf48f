use genome::Alleles;
use ndarray::ArrayView2;

use crate::{genotype_calls, Impute2Error};

/// Most likely genotype of each sample, as a space separated pair of alleles
/// (`"a1 a1"`, `"a1 a2"` or `"a2 a2"`). No probability threshold is applied.
///
/// # Errors
/// - [`Impute2Error::InvalidColumns`] if `probs` does not contain exactly 3 columns.
pub fn hard_calls_from_probs(a1: &str, a2: &str, probs: ArrayView2<'_, f64>) -> Result<Vec<String>, Impute2Error> {
    let possible_genotypes = Alleles::new(a1, a2).possible_genotypes();
    Ok(genotype_calls(probs)?.into_iter()
        .map(|genotype| possible_genotypes[genotype.index()].clone())
        .collect())
}

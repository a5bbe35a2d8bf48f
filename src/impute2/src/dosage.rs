use ndarray::{Array1, ArrayView1, ArrayView2, Axis, Zip};

/// Default upper bound of a dosage value (diploid).
pub const DEFAULT_DOSAGE_SCALE: f64 = 2.0;

/// Compute the dosage of an allele from its homozygous and heterozygous probabilities:
/// `scale * (homo + hetero / 2)`.
///
/// # Panics
/// if `homo_probs` and `hetero_probs` differ in length.
#[must_use]
pub fn dosage_from_probs(homo_probs: ArrayView1<'_, f64>, hetero_probs: ArrayView1<'_, f64>, scale: f64) -> Array1<f64> {
    Zip::from(&homo_probs)
        .and(&hetero_probs)
        .map_collect(|&homo, &hetero| (homo + hetero / 2.0) * scale)
}

/// Dosage of the `minor` allele, using the AA column as homozygous probabilities when `minor`
/// is allele `a1`, and the BB column otherwise.
#[must_use]
pub fn minor_allele_dosage(probs: ArrayView2<'_, f64>, a1: &str, minor: &str, scale: f64) -> Array1<f64> {
    let homo_col = if minor == a1 { 0 } else { 2 };
    dosage_from_probs(probs.index_axis(Axis(1), homo_col), probs.index_axis(Axis(1), 1), scale)
}

use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Default minimal probability of the most likely genotype for a sample to be considered confident.
pub const DEFAULT_MIN_PROB: f64 = 0.9;

/// Flag samples whose most likely genotype probability is greater or equal to `min_prob`.
#[must_use]
pub fn good_probs(probs: ArrayView2<'_, f64>, min_prob: f64) -> Array1<bool> {
    probs.map_axis(Axis(1), |row| {
        row.iter().copied().fold(f64::NEG_INFINITY, f64::max) >= min_prob
    })
}

/// Subset the rows of a probability matrix, keeping the samples flagged `true` in `mask`.
#[must_use]
pub fn select_samples(probs: ArrayView2<'_, f64>, mask: &Array1<bool>) -> Array2<f64> {
    let keep = mask.iter().enumerate()
        .filter_map(|(i, &good)| good.then_some(i))
        .collect::<Vec<usize>>();
    probs.select(Axis(0), &keep)
}

use std::str::FromStr;

use ndarray::{Array2, ArrayView2};

use crate::Impute2Error;

/// Number of leading metadata fields of an IMPUTE2 line: chromosome, name, position, a1, a2.
pub const METADATA_FIELDS: usize = 5;

/// Decoded IMPUTE2 line.
///
/// # Fields:
/// - `metadata`     : the first five fields of the line, left untouched.
/// - `probabilities`: `n x 3` matrix of genotype probabilities (AA, AB, BB), one row per sample.
///
/// Probabilities are neither range-checked nor normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Impute2Record {
    metadata     : [String; METADATA_FIELDS],
    probabilities: Array2<f64>,
}

impl Impute2Record {
    /// Decode an IMPUTE2 record from its fields. Fields `5..` are parsed as floats and
    /// reshaped row-major, each consecutive triplet becoming one sample.
    ///
    /// # Errors
    /// - [`Impute2Error::MissingMetadata`] if less than 5 fields were provided.
    /// - [`Impute2Error::Shape`] if the number of probability fields is not a multiple of 3.
    /// - [`Impute2Error::ParseProbability`] if any probability field is not a valid float.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, Impute2Error> {
        if fields.len() < METADATA_FIELDS {
            return Err(Impute2Error::MissingMetadata{found: fields.len()})
        }

        let (metadata, probs) = fields.split_at(METADATA_FIELDS);
        if probs.len() % 3 != 0 {
            return Err(Impute2Error::Shape{fields: probs.len()})
        }

        let values = probs.iter().enumerate()
            .map(|(i, field)| {
                let field = field.as_ref();
                field.parse::<f64>().map_err(|_| Impute2Error::ParseProbability{
                    index: i + METADATA_FIELDS,
                    value: field.to_string()
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let probabilities = Array2::from_shape_vec((probs.len() / 3, 3), values)
            .map_err(|_| Impute2Error::Shape{fields: probs.len()})?;
        let metadata = std::array::from_fn(|i| metadata[i].as_ref().to_string());
        Ok(Self{metadata, probabilities})
    }

    #[must_use]
    pub fn chromosome(&self) -> &str { &self.metadata[0] }

    #[must_use]
    pub fn name(&self) -> &str { &self.metadata[1] }

    #[must_use]
    pub fn position(&self) -> &str { &self.metadata[2] }

    #[must_use]
    pub fn a1(&self) -> &str { &self.metadata[3] }

    #[must_use]
    pub fn a2(&self) -> &str { &self.metadata[4] }

    #[must_use]
    pub fn metadata(&self) -> &[String; METADATA_FIELDS] {
        &self.metadata
    }

    #[must_use]
    pub fn probabilities(&self) -> ArrayView2<'_, f64> {
        self.probabilities.view()
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.probabilities.nrows()
    }

    #[must_use]
    pub fn into_parts(self) -> ([String; METADATA_FIELDS], Array2<f64>) {
        (self.metadata, self.probabilities)
    }
}

impl FromStr for Impute2Record {
    type Err = Impute2Error;

    /// Decode a raw, whitespace-separated IMPUTE2 line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fields(&s.split_ascii_whitespace().collect::<Vec<&str>>())
    }
}

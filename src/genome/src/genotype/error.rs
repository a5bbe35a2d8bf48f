use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenotypeError {
    #[error("Invalid genotype index {0}. Expected one of 0 (AA), 1 (AB) or 2 (BB)")]
    InvalidIndex(usize),
}

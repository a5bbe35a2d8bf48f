use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChromosomeError {
    #[error("Chromosome name is empty")]
    EmptyName,
}

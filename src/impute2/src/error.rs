use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Impute2Error {
    #[error("IMPUTE2 record contains {found} field(s), while at least 5 metadata fields are expected")]
    MissingMetadata{found: usize},

    #[error("IMPUTE2 record contains {fields} probability field(s), which is not a multiple of 3")]
    Shape{fields: usize},

    #[error("Failed to parse probability field {index} into a valid float: '{value}'")]
    ParseProbability{index: usize, value: String},

    #[error("Probability matrix must contain exactly 3 columns (AA, AB, BB). Found {0}")]
    InvalidColumns(usize),

    #[error("Gender vector length ({gender}) does not match the number of samples ({samples})")]
    GenderMismatch{samples: usize, gender: usize},

    #[error("{site}: heterozygous male present")]
    HeterozygousMale{site: String},

    #[error(transparent)]
    Genotype(#[from] genome::GenotypeError),
}

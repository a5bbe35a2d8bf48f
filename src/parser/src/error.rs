use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("Neither --impute2, nor the stdin buffer are being sollicited.")]
    MissingImpute2Input,

    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("The provided value must lie between {0} and {1}")]
    ParseRatio(f64, f64),

    #[error("--scale must be a strictly positive number")]
    InvalidScale,

    #[error("Failed to serialize command line arguments")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Failed to deserialize command line arguments from '{0}'")]
    Deserialize(String, #[source] serde_yaml::Error),

    #[error("Unable to write or read arguments at '{0}'")]
    YamlIO(String, #[source] std::io::Error),
}

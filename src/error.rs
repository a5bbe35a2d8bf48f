use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("'{0}' points to another from-yaml configuration file. Nested replays are not supported")]
    NestedYaml(String),

    #[error("Site {site} holds {found} samples, while previous records held {expected}")]
    SampleCountChanged{site: String, expected: usize, found: usize},

    #[error("Invalid --chr-x value '{0}'")]
    InvalidChromosome(String, #[source] genome::ChromosomeError),
}

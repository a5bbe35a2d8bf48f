use std::{fmt::{self, Display, Formatter}, str::FromStr};

mod error;
pub use error::ChromosomeError;

/// Normalized chromosome name. The `chr` prefix is stripped and names are upper-cased,
/// so that `chrX`, `x` and `X` all compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chromosome(String);

impl Chromosome {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Check whether this chromosome is one of the provided set of chromosomes.
    #[must_use]
    pub fn is_any_of(&self, chromosomes: &[Chromosome]) -> bool {
        chromosomes.contains(self)
    }
}

impl FromStr for Chromosome {
    type Err = ChromosomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower   = trimmed.to_lowercase();
        let name    = match lower.strip_prefix("chr") {
            Some(_) => &trimmed[3..],
            None    => trimmed,
        };
        if name.is_empty() {
            return Err(ChromosomeError::EmptyName)
        }
        Ok(Self(name.to_uppercase()))
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

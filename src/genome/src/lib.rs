pub mod sex;
pub use sex::Sex;

pub mod genotype;
pub use genotype::{Genotype, GenotypeCounts, GenotypeError};

mod alleles;
pub use alleles::Alleles;

mod chromosome;
pub use chromosome::{Chromosome, ChromosomeError};

use crate::Genotype;

/// Allele labels of a bi-allelic site. `a1` matches the AA column of a probability triplet,
/// `a2` matches the BB column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alleles {
    pub a1: String,
    pub a2: String,
}

impl Alleles {
    pub fn new(a1: impl Into<String>, a2: impl Into<String>) -> Self {
        Self{a1: a1.into(), a2: a2.into()}
    }

    /// Space separated genotype string of a given genotype class, e.g. `"A G"` for `Het`.
    #[must_use]
    pub fn genotype_string(&self, genotype: Genotype) -> String {
        let (left, right) = match genotype {
            Genotype::HomA1 => (&self.a1, &self.a1),
            Genotype::Het   => (&self.a1, &self.a2),
            Genotype::HomA2 => (&self.a2, &self.a2),
        };
        format!("{left} {right}")
    }

    /// Every possible genotype string, indexed by genotype class.
    #[must_use]
    pub fn possible_genotypes(&self) -> [String; 3] {
        Genotype::ALL.map(|genotype| self.genotype_string(genotype))
    }
}

use std::{fmt::{self, Display, Formatter}, ops::Index};

mod error;
pub use error::GenotypeError;

/// Bi-allelic genotype class, ordered as the columns of an IMPUTE2 probability triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genotype {
    /// Homozygous for allele 1 (AA)
    HomA1,
    /// Heterozygous (AB)
    Het,
    /// Homozygous for allele 2 (BB)
    HomA2,
}

impl Genotype {
    pub const ALL: [Genotype; 3] = [Self::HomA1, Self::Het, Self::HomA2];

    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::HomA1 => 0,
            Self::Het   => 1,
            Self::HomA2 => 2,
        }
    }

    /// Most likely genotype of a probability triplet.
    /// Exact ties resolve to the lowest index, i.e. AA > AB > BB.
    pub fn from_probs<'a>(probs: impl IntoIterator<Item = &'a f64>) -> Result<Self, GenotypeError> {
        Self::try_from(argmax(probs))
    }
}

impl TryFrom<usize> for Genotype {
    type Error = GenotypeError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(index).copied().ok_or(GenotypeError::InvalidIndex(index))
    }
}

impl Display for Genotype {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HomA1 => "AA",
            Self::Het   => "AB",
            Self::HomA2 => "BB",
        };
        repr.fmt(f)
    }
}

/// Index of the first maximum value. Returns 0 on empty input.
/// `NaN` never compares greater, and is thus never selected unless it comes first.
pub fn argmax<'a>(values: impl IntoIterator<Item = &'a f64>) -> usize {
    let mut values = values.into_iter().enumerate();
    let Some((_, first)) = values.next() else {
        return 0
    };
    values.fold((0, *first), |(best_idx, best), (idx, &value)| {
        if value > best { (idx, value) } else { (best_idx, best) }
    }).0
}

/// Fixed-size histogram of genotype classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenotypeCounts([usize; 3]);

impl GenotypeCounts {
    #[must_use]
    pub fn new(hom_a1: usize, het: usize, hom_a2: usize) -> Self {
        Self([hom_a1, het, hom_a2])
    }

    pub fn add(&mut self, genotype: Genotype) {
        self.0[genotype.index()] += 1;
    }

    #[must_use]
    pub fn hom_a1(&self) -> usize { self.0[0] }

    #[must_use]
    pub fn het(&self) -> usize { self.0[1] }

    #[must_use]
    pub fn hom_a2(&self) -> usize { self.0[2] }

    /// Total number of counted genotypes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl FromIterator<Genotype> for GenotypeCounts {
    fn from_iter<T: IntoIterator<Item = Genotype>>(iter: T) -> Self {
        let mut counts = Self::default();
        iter.into_iter().for_each(|genotype| counts.add(genotype));
        counts
    }
}

impl Index<Genotype> for GenotypeCounts {
    type Output = usize;

    fn index(&self, genotype: Genotype) -> &Self::Output {
        &self.0[genotype.index()]
    }
}

impl Display for GenotypeCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AA: {} AB: {} BB: {}", self.hom_a1(), self.het(), self.hom_a2())
    }
}

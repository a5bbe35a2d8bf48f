//! Genotype probability statistics over IMPUTE2 records.
//!
//! An IMPUTE2 line is decoded into an `n x 3` probability matrix (one row per sample, columns
//! AA, AB, BB) by [`Impute2Record`]. Every statistic is then derived from that matrix by a
//! free function:
//! - [`good_probs`]: confidence filter.
//! - [`maf_from_probs`]: minor allele frequency (chromosome X aware), with minor/major labels.
//! - [`dosage_from_probs`]: minor allele dosage.
//! - [`hard_calls_from_probs`]: most likely genotype strings.

mod error;
pub use error::Impute2Error;

mod record;
pub use record::{Impute2Record, METADATA_FIELDS};

mod filter;
pub use filter::{good_probs, select_samples, DEFAULT_MIN_PROB};

mod maf;
pub use maf::{genotype_calls, maf_from_probs, MafEstimate};

mod dosage;
pub use dosage::{dosage_from_probs, minor_allele_dosage, DEFAULT_DOSAGE_SCALE};

mod hard_calls;
pub use hard_calls::hard_calls_from_probs;

mod summary;
pub use summary::SiteSummary;

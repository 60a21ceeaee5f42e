use serde::{Deserialize, Serialize};

use crate::analysis::ploidy::{
    cohort_sex_an, count_to_i64, diploid_sample_count, hom_alt_count, regroup_populations,
    SexStratum,
};
use crate::core::frequency::{AlleleCounts, FrequencyRecord};
use crate::core::variant::Chromosome;

/// Samples in each genotype category for one variant over one scope.
///
/// Counts are signed: malformed upstream data can push `n_het` or
/// `n_hom_ref` below zero and that is passed through as-is. Arithmetic
/// saturates at the `i64` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeCategoryCounts {
    pub n_hom_ref: i64,
    pub n_het: i64,
    pub n_hom_alt: i64,
}

impl GenotypeCategoryCounts {
    /// Derive categories from allele counts and the scope's diploid sample count
    #[must_use]
    pub fn from_allele_counts(counts: &AlleleCounts, n_samples: i64) -> Self {
        let ac = count_to_i64(counts.ac);
        let n_hom_alt = hom_alt_count(counts);
        Self {
            n_hom_ref: n_samples.saturating_sub(ac).saturating_add(n_hom_alt),
            n_het: ac.saturating_sub(n_hom_alt.saturating_mul(2)),
            n_hom_alt,
        }
    }

    #[must_use]
    pub fn total(&self) -> i64 {
        self.n_hom_ref
            .saturating_add(self.n_het)
            .saturating_add(self.n_hom_alt)
    }
}

/// Genotype categories for one population group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationGenotypes {
    pub id: String,
    pub counts: GenotypeCategoryCounts,
}

/// Genotype categories for one variant: cohort-wide and per population group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantGenotypes {
    pub cohort: GenotypeCategoryCounts,
    pub populations: Vec<PopulationGenotypes>,
}

impl VariantGenotypes {
    pub fn population(&self, id: &str) -> Option<&GenotypeCategoryCounts> {
        self.populations
            .iter()
            .find(|pop| pop.id == id)
            .map(|pop| &pop.counts)
    }
}

/// Convert one variant's cohort frequency data into genotype category counts
#[must_use]
pub fn extract_genotypes(record: &FrequencyRecord, chromosome: Chromosome) -> VariantGenotypes {
    let n_cohort = diploid_sample_count(
        chromosome,
        record.counts.an,
        cohort_sex_an(&record.populations, SexStratum::Xx),
        cohort_sex_an(&record.populations, SexStratum::Xy),
    );
    let cohort = GenotypeCategoryCounts::from_allele_counts(&record.counts, n_cohort);

    let populations = regroup_populations(&record.populations)
        .into_iter()
        .map(|group| {
            let n_samples = diploid_sample_count(
                chromosome,
                group.counts.an,
                group.sex_an(SexStratum::Xx),
                group.sex_an(SexStratum::Xy),
            );
            PopulationGenotypes {
                id: group.id.to_string(),
                counts: GenotypeCategoryCounts::from_allele_counts(group.counts, n_samples),
            }
        })
        .collect();

    VariantGenotypes {
        cohort,
        populations,
    }
}

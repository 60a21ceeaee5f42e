use serde::{Deserialize, Serialize};

/// Allele counts for one variant over one sample scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleCounts {
    /// Alternate allele count (AC)
    pub ac: u64,

    /// Total alleles genotyped (AN)
    pub an: u64,

    /// Samples homozygous for the alternate allele
    #[serde(default)]
    pub homozygote_count: u64,

    /// Hemizygous alternate calls (sex chromosomes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hemizygote_count: Option<u64>,
}

impl AlleleCounts {
    pub fn new(ac: u64, an: u64, homozygote_count: u64) -> Self {
        Self {
            ac,
            an,
            homozygote_count,
            hemizygote_count: None,
        }
    }

    /// AC / AN; NaN when AN is zero
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn allele_frequency(&self) -> f64 {
        self.ac as f64 / self.an as f64
    }
}

/// Allele counts for one population (ancestry group or sex-stratified subset)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationFrequency {
    /// Population identifier, e.g. `afr`, `afr_XX`, `XY`
    pub id: String,

    #[serde(flatten)]
    pub counts: AlleleCounts,
}

impl PopulationFrequency {
    pub fn new(id: impl Into<String>, counts: AlleleCounts) -> Self {
        Self {
            id: id.into(),
            counts,
        }
    }
}

/// One variant's allele data in one cohort (exome or genome)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    #[serde(flatten)]
    pub counts: AlleleCounts,

    /// Per-population breakdown, in upstream order
    #[serde(default)]
    pub populations: Vec<PopulationFrequency>,
}

impl FrequencyRecord {
    pub fn new(counts: AlleleCounts) -> Self {
        Self {
            counts,
            populations: Vec::new(),
        }
    }

    pub fn with_populations(mut self, populations: Vec<PopulationFrequency>) -> Self {
        self.populations = populations;
        self
    }
}

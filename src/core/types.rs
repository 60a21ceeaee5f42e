use serde::{Deserialize, Serialize};

/// Genome build a dataset's variant identifiers are expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GenomeBuild {
    /// NCBI style contig names: 1, 2, ..., X, Y (chrM tolerated for mitochondria)
    Grch37,
    /// UCSC style contig names: chr1, chr2, ..., chrX, chrY, chrM
    Grch38,
}

impl std::fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grch37 => write!(f, "GRCh37"),
            Self::Grch38 => write!(f, "GRCh38"),
        }
    }
}

/// Layout of the frequency documents a dataset version provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencySchema {
    /// Separate exome and genome cohorts (gnomAD v2, ExAC)
    ExomeAndGenome,
    /// Genome cohort only (gnomAD v3)
    GenomeOnly,
}

impl FrequencySchema {
    #[must_use]
    pub fn has_exome_cohort(self) -> bool {
        matches!(self, Self::ExomeAndGenome)
    }
}

impl std::fmt::Display for FrequencySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExomeAndGenome => write!(f, "exome+genome"),
            Self::GenomeOnly => write!(f, "genome"),
        }
    }
}

/// Static description of a dataset version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub build: GenomeBuild,
    pub schema: FrequencySchema,
}

/// Dataset versions a data file may provide records for
pub const KNOWN_DATASETS: &[DatasetInfo] = &[
    DatasetInfo {
        id: "exac",
        label: "ExAC v1.0",
        build: GenomeBuild::Grch37,
        schema: FrequencySchema::ExomeAndGenome,
    },
    DatasetInfo {
        id: "gnomad_r2_1",
        label: "gnomAD v2.1.1",
        build: GenomeBuild::Grch37,
        schema: FrequencySchema::ExomeAndGenome,
    },
    DatasetInfo {
        id: "gnomad_r2_1_controls",
        label: "gnomAD v2.1.1 (controls)",
        build: GenomeBuild::Grch37,
        schema: FrequencySchema::ExomeAndGenome,
    },
    DatasetInfo {
        id: "gnomad_r2_1_non_cancer",
        label: "gnomAD v2.1.1 (non-cancer)",
        build: GenomeBuild::Grch37,
        schema: FrequencySchema::ExomeAndGenome,
    },
    DatasetInfo {
        id: "gnomad_r2_1_non_neuro",
        label: "gnomAD v2.1.1 (non-neuro)",
        build: GenomeBuild::Grch37,
        schema: FrequencySchema::ExomeAndGenome,
    },
    DatasetInfo {
        id: "gnomad_r2_1_non_topmed",
        label: "gnomAD v2.1.1 (non-TOPMed)",
        build: GenomeBuild::Grch37,
        schema: FrequencySchema::ExomeAndGenome,
    },
    DatasetInfo {
        id: "gnomad_r3",
        label: "gnomAD v3.1.2",
        build: GenomeBuild::Grch38,
        schema: FrequencySchema::GenomeOnly,
    },
    DatasetInfo {
        id: "gnomad_r4",
        label: "gnomAD v4.1",
        build: GenomeBuild::Grch38,
        schema: FrequencySchema::ExomeAndGenome,
    },
];

/// Look up the static description of a dataset version
#[must_use]
pub fn dataset_info(id: &str) -> Option<&'static DatasetInfo> {
    KNOWN_DATASETS.iter().find(|info| info.id == id)
}

/// Dataset co-occurrence analysis currently runs against
pub const DEFAULT_COOCCURRENCE_DATASET: &str = "gnomad_r2_1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_info_lookup() {
        let info = dataset_info("gnomad_r2_1").unwrap();
        assert_eq!(info.build, GenomeBuild::Grch37);
        assert!(info.schema.has_exome_cohort());

        let info = dataset_info("gnomad_r3").unwrap();
        assert_eq!(info.build, GenomeBuild::Grch38);
        assert!(!info.schema.has_exome_cohort());

        assert!(dataset_info("gnomad_r9").is_none());
    }

    #[test]
    fn test_build_display() {
        assert_eq!(GenomeBuild::Grch37.to_string(), "GRCh37");
        assert_eq!(GenomeBuild::Grch38.to_string(), "GRCh38");
    }
}

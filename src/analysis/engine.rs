use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::eligibility::{
    check_eligibility, EligibilityError, DEFAULT_MAX_ALLELE_FREQUENCY,
};
use crate::analysis::genotype::{extract_genotypes, GenotypeCategoryCounts};
use crate::analysis::haplotype::{
    estimate_haplotype_counts, EmSettings, GenotypeTable, HaplotypeCounts,
};
use crate::analysis::scoring::p_compound_heterozygous;
use crate::core::annotation::VariantRecord;
use crate::core::frequency::FrequencyRecord;
use crate::core::types::DEFAULT_COOCCURRENCE_DATASET;
use crate::core::variant::{normalize_variant_id, Chromosome, VariantIdError};
use crate::datasets::precomputed::{PrecomputedStore, VariantPair};
use crate::datasets::registry::{DatasetRegistry, DispatchError};

/// Every way a co-occurrence request can fail. None of these are retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CooccurrenceError {
    #[error("Invalid input: {0}")]
    InputError(String),

    #[error("Unsupported dataset: {0}")]
    UnsupportedDataset(String),

    #[error(transparent)]
    FormatMismatch(VariantIdError),

    #[error("Variant not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Eligibility(EligibilityError),
}

impl CooccurrenceError {
    /// Stable tag for reporting the failure to clients
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InputError(_) => "input_error",
            Self::UnsupportedDataset(_) => "unsupported_dataset",
            Self::FormatMismatch(_) => "format_mismatch",
            Self::NotFound(_) => "not_found",
            Self::Eligibility(EligibilityError::NotFound(_)) => "not_found",
            Self::Eligibility(EligibilityError::DifferentGenes) => "different_genes",
            Self::Eligibility(EligibilityError::NoSharedCodingConsequence) => {
                "no_shared_coding_consequence"
            }
            Self::Eligibility(EligibilityError::MissingExomeCohort(_)) => "missing_exome_cohort",
            Self::Eligibility(EligibilityError::FrequencyTooHigh { .. }) => "frequency_too_high",
        }
    }
}

impl From<DispatchError> for CooccurrenceError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::UnsupportedDataset(id) => Self::UnsupportedDataset(id),
            DispatchError::FormatMismatch(e) => Self::FormatMismatch(e),
            DispatchError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<EligibilityError> for CooccurrenceError {
    fn from(e: EligibilityError) -> Self {
        match e {
            EligibilityError::NotFound(id) => Self::NotFound(id),
            other => Self::Eligibility(other),
        }
    }
}

/// Configuration for the co-occurrence engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceConfig {
    /// Largest exome allele frequency either variant may have
    pub max_allele_frequency: f64,
    /// EM settings for resolving double heterozygotes
    pub em: EmSettings,
    /// Datasets co-occurrence may be computed against
    pub supported_datasets: Vec<String>,
}

impl Default for CooccurrenceConfig {
    fn default() -> Self {
        Self {
            max_allele_frequency: DEFAULT_MAX_ALLELE_FREQUENCY,
            em: EmSettings::default(),
            supported_datasets: vec![DEFAULT_COOCCURRENCE_DATASET.to_string()],
        }
    }
}

/// Co-occurrence statistics for one population group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationCooccurrence {
    pub id: String,
    pub genotype_counts: GenotypeTable,
    pub haplotype_counts: HaplotypeCounts,
    pub p_compound_heterozygous: Option<f64>,
}

/// Co-occurrence statistics for a variant pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceResult {
    pub variant_ids: [String; 2],
    pub genotype_counts: GenotypeTable,
    pub haplotype_counts: HaplotypeCounts,
    pub p_compound_heterozygous: Option<f64>,
    #[serde(default)]
    pub populations: Vec<PopulationCooccurrence>,
}

impl CooccurrenceResult {
    /// True if the result carries no genotype data at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genotype_counts == GenotypeTable::default() && self.populations.is_empty()
    }
}

/// Table, haplotype estimate and probability for one scope
fn analyze_scope(
    a: &GenotypeCategoryCounts,
    b: &GenotypeCategoryCounts,
    em: &EmSettings,
) -> (GenotypeTable, HaplotypeCounts, Option<f64>) {
    let table = GenotypeTable::from_marginals(a, b);
    let haplotypes = estimate_haplotype_counts(&table, em);
    let p = p_compound_heterozygous(&haplotypes);
    (table, haplotypes, p)
}

fn exome_data(record: &VariantRecord) -> Result<&FrequencyRecord, CooccurrenceError> {
    record.exome.as_ref().ok_or_else(|| {
        CooccurrenceError::Eligibility(EligibilityError::MissingExomeCohort(
            record.variant_id.clone(),
        ))
    })
}

/// Run genotype extraction, haplotype estimation and scoring on the exome
/// cohort of two variants, then once per population both variants report.
///
/// # Errors
///
/// Returns `CooccurrenceError::Eligibility(MissingExomeCohort)` if either
/// record has no exome data.
pub fn analyze_pair(
    a: &VariantRecord,
    b: &VariantRecord,
    em: &EmSettings,
) -> Result<CooccurrenceResult, CooccurrenceError> {
    let genotypes_a = extract_genotypes(exome_data(a)?, Chromosome::parse(&a.chrom));
    let genotypes_b = extract_genotypes(exome_data(b)?, Chromosome::parse(&b.chrom));

    let (genotype_counts, haplotype_counts, p) =
        analyze_scope(&genotypes_a.cohort, &genotypes_b.cohort, em);

    let populations = genotypes_a
        .populations
        .iter()
        .filter_map(|pop_a| {
            let counts_b = genotypes_b.population(&pop_a.id)?;
            let (genotype_counts, haplotype_counts, p) = analyze_scope(&pop_a.counts, counts_b, em);
            Some(PopulationCooccurrence {
                id: pop_a.id.clone(),
                genotype_counts,
                haplotype_counts,
                p_compound_heterozygous: p,
            })
        })
        .collect();

    Ok(CooccurrenceResult {
        variant_ids: [a.variant_id.clone(), b.variant_id.clone()],
        genotype_counts,
        haplotype_counts,
        p_compound_heterozygous: p,
        populations,
    })
}

/// Validates requests, fetches both variants and assembles results
pub struct CooccurrenceEngine {
    registry: Arc<DatasetRegistry>,
    precomputed: Option<Arc<dyn PrecomputedStore>>,
    config: CooccurrenceConfig,
}

impl CooccurrenceEngine {
    /// Create a new engine with default configuration
    pub fn new(registry: Arc<DatasetRegistry>) -> Self {
        Self::with_config(registry, CooccurrenceConfig::default())
    }

    /// Create a new engine with custom configuration
    pub fn with_config(registry: Arc<DatasetRegistry>, config: CooccurrenceConfig) -> Self {
        Self {
            registry,
            precomputed: None,
            config,
        }
    }

    #[must_use]
    pub fn with_precomputed(mut self, store: Arc<dyn PrecomputedStore>) -> Self {
        self.precomputed = Some(store);
        self
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CooccurrenceConfig {
        &self.config
    }

    fn is_supported(&self, dataset_id: &str) -> bool {
        self.config
            .supported_datasets
            .iter()
            .any(|id| id == dataset_id)
            && self.registry.contains(dataset_id)
    }

    /// Fetch a variant, treating absence as `None` so eligibility can report it
    async fn fetch_optional(
        &self,
        dataset_id: &str,
        variant_id: &str,
    ) -> Result<Option<VariantRecord>, CooccurrenceError> {
        match self.registry.dispatch(dataset_id, variant_id).await {
            Ok(record) => Ok(Some(record)),
            Err(DispatchError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Compute co-occurrence statistics for exactly two variants in a dataset.
    ///
    /// Both variants are fetched concurrently; dropping the returned future
    /// cancels both fetches. A non-empty precomputed result for the pair is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// - `InputError` unless exactly two distinct variant IDs are given
    /// - `UnsupportedDataset` if the dataset is not enabled or not registered
    /// - `FormatMismatch` if an ID breaks the dataset build's naming
    /// - `NotFound` if either variant is absent
    /// - `Eligibility` if the pair fails an eligibility check
    pub async fn compute(
        &self,
        variant_ids: &[String],
        dataset_id: &str,
    ) -> Result<CooccurrenceResult, CooccurrenceError> {
        let [raw_a, raw_b] = variant_ids else {
            return Err(CooccurrenceError::InputError(format!(
                "Exactly 2 variant IDs are required, got {}",
                variant_ids.len()
            )));
        };

        let id_a = normalize_variant_id(raw_a);
        let id_b = normalize_variant_id(raw_b);
        if id_a == id_b {
            return Err(CooccurrenceError::InputError(
                "Variant IDs must be distinct".to_string(),
            ));
        }

        if !self.is_supported(dataset_id) {
            return Err(CooccurrenceError::UnsupportedDataset(
                dataset_id.to_string(),
            ));
        }

        debug!(dataset = dataset_id, a = %id_a, b = %id_b, "Fetching variant pair");
        let (record_a, record_b) = tokio::try_join!(
            self.fetch_optional(dataset_id, &id_a),
            self.fetch_optional(dataset_id, &id_b)
        )?;

        // An rsID and a chrom-pos-ref-alt ID can resolve to the same record
        if let (Some(a), Some(b)) = (&record_a, &record_b) {
            if normalize_variant_id(&a.variant_id) == normalize_variant_id(&b.variant_id) {
                return Err(CooccurrenceError::InputError(
                    "Variant IDs must be distinct".to_string(),
                ));
            }
        }

        check_eligibility(
            [id_a.as_str(), id_b.as_str()],
            [record_a.as_ref(), record_b.as_ref()],
            self.config.max_allele_frequency,
        )?;

        let (Some(a), Some(b)) = (record_a, record_b) else {
            return Err(CooccurrenceError::NotFound(format!("{id_a},{id_b}")));
        };

        if let Some(store) = &self.precomputed {
            let pair = VariantPair::new(&a.variant_id, &b.variant_id);
            if let Some(result) = store.lookup(&pair).await {
                if !result.is_empty() {
                    info!(pair = %pair, "Using precomputed co-occurrence");
                    return Ok(result);
                }
            }
        }

        let result = analyze_pair(&a, &b, &self.config.em)?;
        debug!(
            p = ?result.p_compound_heterozygous,
            populations = result.populations.len(),
            "Computed co-occurrence"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotation::TranscriptConsequence;
    use crate::core::frequency::{AlleleCounts, PopulationFrequency};
    use crate::core::types::dataset_info;
    use crate::datasets::precomputed::InMemoryPrecomputedStore;
    use crate::datasets::store::InMemoryDatasetHandler;

    fn variant(id: &str, ac: u64, an: u64, pops: Vec<PopulationFrequency>) -> VariantRecord {
        VariantRecord::new(id, "1")
            .with_exome(FrequencyRecord::new(AlleleCounts::new(ac, an, 0)).with_populations(pops))
            .with_consequences(vec![TranscriptConsequence::new(
                "ENSG00000169174",
                "missense_variant",
            )])
    }

    fn registry() -> Arc<DatasetRegistry> {
        let records = vec![
            variant(
                "1-100-A-T",
                2,
                2000,
                vec![
                    PopulationFrequency::new("afr", AlleleCounts::new(1, 800, 0)),
                    PopulationFrequency::new("nfe", AlleleCounts::new(1, 1200, 0)),
                ],
            ),
            variant(
                "1-200-C-G",
                4,
                2000,
                vec![
                    PopulationFrequency::new("nfe", AlleleCounts::new(3, 1200, 0)),
                    PopulationFrequency::new("sas", AlleleCounts::new(1, 800, 0)),
                ],
            ),
            variant("1-300-G-A", 300, 2000, vec![]),
        ];
        let handler = InMemoryDatasetHandler::new(dataset_info("gnomad_r2_1").unwrap(), records);
        Arc::new(DatasetRegistry::new().with_handler(Arc::new(handler)))
    }

    fn ids(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    #[tokio::test]
    async fn test_compute_cohort_and_shared_populations() {
        let engine = CooccurrenceEngine::new(registry());
        let result = engine
            .compute(&ids("1-100-A-T", "1-200-C-G"), "gnomad_r2_1")
            .await
            .unwrap();

        assert_eq!(result.variant_ids, ["1-100-A-T".to_string(), "1-200-C-G".to_string()]);
        assert_eq!(
            <[i64; 9]>::from(result.genotype_counts),
            [996, 4, 0, 2, 0, 0, 0, 0, 0]
        );
        assert!((result.haplotype_counts.total() - 2.0 * 1002.0).abs() < 1e-9);
        // No ab haplotypes, so every aB/Ab carrier is attributed to trans
        assert_eq!(result.p_compound_heterozygous, Some(1.0));

        let pops: Vec<_> = result.populations.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(pops, vec!["nfe"]);
    }

    fn engine_for(
        chrom: &str,
        records: Vec<(&str, AlleleCounts, Vec<PopulationFrequency>)>,
    ) -> CooccurrenceEngine {
        let records = records
            .into_iter()
            .map(|(id, counts, pops)| {
                VariantRecord::new(id, chrom)
                    .with_exome(FrequencyRecord::new(counts).with_populations(pops))
                    .with_consequences(vec![TranscriptConsequence::new(
                        "ENSG00000169174",
                        "missense_variant",
                    )])
            })
            .collect();
        let handler = InMemoryDatasetHandler::new(dataset_info("gnomad_r2_1").unwrap(), records);
        CooccurrenceEngine::new(Arc::new(DatasetRegistry::new().with_handler(Arc::new(handler))))
    }

    #[tokio::test]
    async fn test_compute_x_chromosome_pair() {
        let sex_split = |ac: u64, hom: u64| {
            vec![
                PopulationFrequency::new("XX", AlleleCounts::new(0, 2000, 0)),
                PopulationFrequency::new("XY", AlleleCounts::new(0, 1000, 0)),
                PopulationFrequency::new("nfe", AlleleCounts::new(ac, 1500, hom)),
                PopulationFrequency::new("nfe_XX", AlleleCounts::new(0, 1000, 0)),
                PopulationFrequency::new("nfe_XY", AlleleCounts::new(0, 500, 0)),
            ]
        };
        let engine = engine_for(
            "X",
            vec![
                ("X-100-A-T", AlleleCounts::new(3, 3000, 1), sex_split(3, 1)),
                ("X-200-C-G", AlleleCounts::new(2, 3000, 0), sex_split(2, 0)),
            ],
        );

        let result = engine
            .compute(&ids("X-100-A-T", "X-200-C-G"), "gnomad_r2_1")
            .await
            .unwrap();

        // 2000 / 2 + 1000 samples, not 3000 / 2
        assert_eq!(
            <[i64; 9]>::from(result.genotype_counts),
            [1998, 2, 0, 1, 0, 0, 1, 0, 0]
        );
        assert_eq!(result.genotype_counts.total(), 2002);
        assert_eq!(result.p_compound_heterozygous, Some(1.0));

        let pops: Vec<_> = result.populations.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(pops, vec!["nfe"]);
        assert_eq!(
            <[i64; 9]>::from(result.populations[0].genotype_counts),
            [998, 2, 0, 1, 0, 0, 1, 0, 0]
        );
    }

    #[tokio::test]
    async fn test_compute_y_chromosome_pair() {
        let xy_only = || vec![PopulationFrequency::new("XY", AlleleCounts::new(0, 1000, 0))];
        let engine = engine_for(
            "Y",
            vec![
                ("Y-100-A-T", AlleleCounts::new(2, 1000, 0), xy_only()),
                ("Y-200-C-G", AlleleCounts::new(1, 1000, 0), xy_only()),
            ],
        );

        let result = engine
            .compute(&ids("Y-100-A-T", "Y-200-C-G"), "gnomad_r2_1")
            .await
            .unwrap();

        // AN(XY) samples, not AN / 2
        assert_eq!(
            <[i64; 9]>::from(result.genotype_counts),
            [998, 1, 0, 2, 0, 0, 0, 0, 0]
        );
        assert!(result.populations.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_number_of_ids() {
        let engine = CooccurrenceEngine::new(registry());
        let err = engine
            .compute(&["1-100-A-T".to_string()], "gnomad_r2_1")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "input_error");
    }

    #[tokio::test]
    async fn test_same_id_twice_is_input_error() {
        let engine = CooccurrenceEngine::new(Arc::new(DatasetRegistry::new()));
        let err = engine
            .compute(&ids("1-100-A-T", "1-100-a-t"), "gnomad_r2_1")
            .await
            .unwrap_err();
        assert!(matches!(err, CooccurrenceError::InputError(_)));
    }

    #[tokio::test]
    async fn test_rsid_alias_of_same_variant_is_input_error() {
        let mut record = variant("1-100-A-T", 2, 2000, vec![]);
        record.rsids = vec!["rs100".to_string()];
        let handler =
            InMemoryDatasetHandler::new(dataset_info("gnomad_r2_1").unwrap(), vec![record]);
        let registry = Arc::new(DatasetRegistry::new().with_handler(Arc::new(handler)));
        let engine = CooccurrenceEngine::new(registry);

        let err = engine
            .compute(&ids("rs100", "1-100-A-T"), "gnomad_r2_1")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CooccurrenceError::InputError("Variant IDs must be distinct".to_string())
        );
    }

    #[tokio::test]
    async fn test_unsupported_dataset() {
        let engine = CooccurrenceEngine::new(registry());
        let err = engine
            .compute(&ids("1-100-A-T", "1-200-C-G"), "gnomad_r4")
            .await
            .unwrap_err();
        assert_eq!(err, CooccurrenceError::UnsupportedDataset("gnomad_r4".to_string()));
    }

    #[tokio::test]
    async fn test_missing_variant_is_not_found() {
        let engine = CooccurrenceEngine::new(registry());
        let err = engine
            .compute(&ids("1-100-A-T", "1-999-C-G"), "gnomad_r2_1")
            .await
            .unwrap_err();
        assert_eq!(err, CooccurrenceError::NotFound("1-999-C-G".to_string()));
    }

    #[tokio::test]
    async fn test_format_mismatch() {
        let engine = CooccurrenceEngine::new(registry());
        let err = engine
            .compute(&ids("chr1-100-A-T", "1-200-C-G"), "gnomad_r2_1")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "format_mismatch");
    }

    #[tokio::test]
    async fn test_common_variant_rejected() {
        let engine = CooccurrenceEngine::new(registry());
        let err = engine
            .compute(&ids("1-100-A-T", "1-300-G-A"), "gnomad_r2_1")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), "frequency_too_high");
    }

    #[tokio::test]
    async fn test_precomputed_short_circuit() {
        let precomputed = CooccurrenceResult {
            variant_ids: ["1-200-C-G".to_string(), "1-100-A-T".to_string()],
            genotype_counts: GenotypeTable::from([1, 0, 0, 0, 0, 0, 0, 0, 0]),
            haplotype_counts: HaplotypeCounts::from([2.0, 0.0, 0.0, 0.0]),
            p_compound_heterozygous: Some(0.5),
            populations: Vec::new(),
        };
        let mut store = InMemoryPrecomputedStore::new();
        store.insert(precomputed.clone());

        let engine = CooccurrenceEngine::new(registry()).with_precomputed(Arc::new(store));
        let result = engine
            .compute(&ids("1-100-A-T", "1-200-C-G"), "gnomad_r2_1")
            .await
            .unwrap();
        assert_eq!(result, precomputed);
    }

    #[tokio::test]
    async fn test_empty_precomputed_result_is_ignored() {
        let mut store = InMemoryPrecomputedStore::new();
        store.insert(CooccurrenceResult {
            variant_ids: ["1-100-A-T".to_string(), "1-200-C-G".to_string()],
            genotype_counts: GenotypeTable::default(),
            haplotype_counts: HaplotypeCounts::default(),
            p_compound_heterozygous: None,
            populations: Vec::new(),
        });

        let engine = CooccurrenceEngine::new(registry()).with_precomputed(Arc::new(store));
        let result = engine
            .compute(&ids("1-100-A-T", "1-200-C-G"), "gnomad_r2_1")
            .await
            .unwrap();
        assert_eq!(result.genotype_counts.AABB, 996);
    }

    #[test]
    fn test_analyze_pair_requires_exome() {
        let a = variant("1-100-A-T", 1, 100, vec![]);
        let mut b = variant("1-200-C-G", 1, 100, vec![]);
        b.exome = None;
        let err = analyze_pair(&a, &b, &EmSettings::default()).unwrap_err();
        assert_eq!(err.error_type(), "missing_exome_cohort");
    }
}

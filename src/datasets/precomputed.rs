use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::analysis::engine::CooccurrenceResult;
use crate::core::variant::normalize_variant_id;
use crate::datasets::store::{read_text, StoreError, DATA_FILE_VERSION};

/// Unordered pair of canonical variant IDs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantPair {
    first: String,
    second: String,
}

impl VariantPair {
    pub fn new(a: &str, b: &str) -> Self {
        let a = normalize_variant_id(a);
        let b = normalize_variant_id(b);
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl std::fmt::Display for VariantPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.first, self.second)
    }
}

/// Source of co-occurrence results computed ahead of time
#[async_trait::async_trait]
pub trait PrecomputedStore: Send + Sync {
    async fn lookup(&self, pair: &VariantPair) -> Option<CooccurrenceResult>;
}

/// Serializable precomputed results file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecomputedFile {
    pub version: String,
    pub results: Vec<CooccurrenceResult>,
}

/// Precomputed results held in memory, keyed by unordered variant pair
#[derive(Debug, Default)]
pub struct InMemoryPrecomputedStore {
    results: HashMap<VariantPair, CooccurrenceResult>,
}

impl InMemoryPrecomputedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let content = read_text(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let data: PrecomputedFile = serde_json::from_str(json)?;

        if data.version != DATA_FILE_VERSION {
            warn!(
                "Precomputed file version mismatch (expected {}, found {})",
                DATA_FILE_VERSION, data.version
            );
        }

        let mut store = Self::new();
        for result in data.results {
            store.insert(result);
        }
        Ok(store)
    }

    pub fn insert(&mut self, result: CooccurrenceResult) {
        let [a, b] = &result.variant_ids;
        self.results.insert(VariantPair::new(a, b), result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[async_trait::async_trait]
impl PrecomputedStore for InMemoryPrecomputedStore {
    async fn lookup(&self, pair: &VariantPair) -> Option<CooccurrenceResult> {
        self.results.get(pair).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_unordered() {
        assert_eq!(
            VariantPair::new("1-200-C-G", "1-100-a-t"),
            VariantPair::new("1-100-A-T", "1-200-C-G")
        );
        assert_eq!(
            VariantPair::new("1-200-C-G", "1-100-A-T").to_string(),
            "1-100-A-T,1-200-C-G"
        );
    }

    #[tokio::test]
    async fn test_lookup_either_order() {
        let json = r#"{
            "version": "1.0.0",
            "results": [{
                "variant_ids": ["1-200-C-G", "1-100-A-T"],
                "genotype_counts": [10, 1, 0, 2, 0, 0, 0, 0, 0],
                "haplotype_counts": [23.0, 2.0, 1.0, 0.0],
                "p_compound_heterozygous": 1.0,
                "populations": []
            }]
        }"#;
        let store = InMemoryPrecomputedStore::from_json(json).unwrap();
        assert_eq!(store.len(), 1);

        let found = store
            .lookup(&VariantPair::new("1-100-A-T", "1-200-C-G"))
            .await
            .unwrap();
        assert_eq!(found.p_compound_heterozygous, Some(1.0));

        assert!(store
            .lookup(&VariantPair::new("1-100-A-T", "1-300-C-G"))
            .await
            .is_none());
    }
}

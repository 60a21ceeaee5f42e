use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::annotation::VariantRecord;
use crate::core::types::{dataset_info, DatasetInfo};
use crate::core::variant::normalize_variant_id;
use crate::datasets::registry::{DatasetHandler, DatasetRegistry};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read data file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse data file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Unknown dataset '{0}' in data file")]
    UnknownDataset(String),

    #[error("Dataset '{0}' appears more than once in data file")]
    DuplicateDataset(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Data file version for compatibility checking
pub const DATA_FILE_VERSION: &str = "1.0.0";

/// Read a file as text, transparently decompressing `.gz` files
pub(crate) fn read_text(path: &Path) -> std::io::Result<String> {
    let is_gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    let mut content = String::new();
    if is_gzipped {
        GzDecoder::new(std::fs::File::open(path)?).read_to_string(&mut content)?;
    } else {
        std::fs::File::open(path)?.read_to_string(&mut content)?;
    }
    Ok(content)
}

/// Variant records for one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetData {
    pub id: String,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

/// Serializable variant data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDataFile {
    pub version: String,
    pub datasets: Vec<DatasetData>,
}

impl VariantDataFile {
    /// Load a data file from disk (plain or gzip-compressed JSON)
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let content = read_text(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let data: Self = serde_json::from_str(json)?;

        if data.version != DATA_FILE_VERSION {
            warn!(
                "Data file version mismatch (expected {}, found {})",
                DATA_FILE_VERSION, data.version
            );
        }

        Ok(data)
    }

    /// Build a registry with one handler per dataset in the file
    pub fn into_registry(self) -> Result<DatasetRegistry, StoreError> {
        let mut registry = DatasetRegistry::new();
        let mut seen = HashSet::new();

        for dataset in self.datasets {
            let info = dataset_info(&dataset.id)
                .ok_or_else(|| StoreError::UnknownDataset(dataset.id.clone()))?;
            if !seen.insert(dataset.id.clone()) {
                return Err(StoreError::DuplicateDataset(dataset.id));
            }

            let handler = InMemoryDatasetHandler::new(info, dataset.variants);
            info!(
                dataset = info.id,
                build = %info.build,
                variants = handler.len(),
                "Registered dataset"
            );
            registry.register(Arc::new(handler));
        }

        Ok(registry)
    }
}

/// Load a data file and build its dataset registry
pub fn load_registry(path: &Path) -> Result<DatasetRegistry, StoreError> {
    VariantDataFile::load_from_file(path)?.into_registry()
}

/// Dataset handler serving records held in memory
#[derive(Debug)]
pub struct InMemoryDatasetHandler {
    info: &'static DatasetInfo,

    /// Index: canonical variant ID -> record
    variants: HashMap<String, VariantRecord>,

    /// Index: lowercase rsID -> canonical variant ID
    rsid_to_variant: HashMap<String, String>,
}

impl InMemoryDatasetHandler {
    /// Index records by canonical ID and rsID.
    ///
    /// Exome data is dropped for datasets whose schema has no exome cohort.
    pub fn new(info: &'static DatasetInfo, records: Vec<VariantRecord>) -> Self {
        let mut handler = Self {
            info,
            variants: HashMap::with_capacity(records.len()),
            rsid_to_variant: HashMap::new(),
        };
        let has_exome = handler.schema().has_exome_cohort();

        for mut record in records {
            if !has_exome {
                record.exome = None;
            }

            let key = normalize_variant_id(&record.variant_id);
            for rsid in &record.rsids {
                handler
                    .rsid_to_variant
                    .insert(normalize_variant_id(rsid), key.clone());
            }
            handler.variants.insert(key, record);
        }

        handler
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[async_trait::async_trait]
impl DatasetHandler for InMemoryDatasetHandler {
    fn info(&self) -> &DatasetInfo {
        self.info
    }

    async fn fetch(&self, variant_id: &str) -> Result<Option<VariantRecord>, StoreError> {
        let key = self
            .rsid_to_variant
            .get(variant_id)
            .map_or(variant_id, String::as_str);
        Ok(self.variants.get(key).cloned())
    }
}

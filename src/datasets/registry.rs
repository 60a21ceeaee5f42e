use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::annotation::VariantRecord;
use crate::core::types::{DatasetInfo, FrequencySchema, GenomeBuild};
use crate::core::variant::{normalize_variant_id, validate_variant_id_for_build, VariantIdError};
use crate::datasets::store::StoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unsupported dataset: {0}")]
    UnsupportedDataset(String),

    #[error(transparent)]
    FormatMismatch(#[from] VariantIdError),

    #[error("Variant not found: {0}")]
    NotFound(String),
}

/// Access to one dataset version's frequency and annotation data.
///
/// Each implementation is bound to a single genome build and frequency schema.
#[async_trait::async_trait]
pub trait DatasetHandler: Send + Sync {
    /// Static description of the dataset this handler serves
    fn info(&self) -> &DatasetInfo;

    /// Fetch a variant by its canonical identifier.
    ///
    /// Returns `Ok(None)` when the dataset has no record for the variant.
    async fn fetch(&self, variant_id: &str) -> Result<Option<VariantRecord>, StoreError>;

    fn dataset_id(&self) -> &str {
        self.info().id
    }

    fn build(&self) -> GenomeBuild {
        self.info().build
    }

    fn schema(&self) -> FrequencySchema {
        self.info().schema
    }

    fn label(&self) -> &str {
        self.info().label
    }
}

/// Dataset ID -> handler, assembled once at startup and shared by reference
#[derive(Default)]
pub struct DatasetRegistry {
    handlers: BTreeMap<String, Arc<dyn DatasetHandler>>,
}

impl std::fmt::Debug for DatasetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetRegistry")
            .field("datasets", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous handler for the same dataset
    pub fn register(
        &mut self,
        handler: Arc<dyn DatasetHandler>,
    ) -> Option<Arc<dyn DatasetHandler>> {
        self.handlers
            .insert(handler.dataset_id().to_string(), handler)
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn DatasetHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn get(&self, dataset_id: &str) -> Option<&Arc<dyn DatasetHandler>> {
        self.handlers.get(dataset_id)
    }

    pub fn contains(&self, dataset_id: &str) -> bool {
        self.handlers.contains_key(dataset_id)
    }

    /// Registered datasets, sorted by ID
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetInfo> {
        self.handlers.values().map(|handler| handler.info())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Route a variant lookup to the handler for `dataset_id`.
    ///
    /// The identifier is normalized and checked against the handler's build
    /// before fetching. Backend failures are logged and reported as not found.
    ///
    /// # Errors
    ///
    /// - `DispatchError::UnsupportedDataset` if no handler is registered
    /// - `DispatchError::FormatMismatch` if the identifier breaks the build's naming
    /// - `DispatchError::NotFound` if the variant is absent or the fetch fails
    pub async fn dispatch(
        &self,
        dataset_id: &str,
        variant_id: &str,
    ) -> Result<VariantRecord, DispatchError> {
        let handler = self
            .get(dataset_id)
            .ok_or_else(|| DispatchError::UnsupportedDataset(dataset_id.to_string()))?;

        let normalized = normalize_variant_id(variant_id);
        validate_variant_id_for_build(&normalized, handler.build())?;

        debug!(dataset = dataset_id, variant = %normalized, "Fetching variant");

        match handler.fetch(&normalized).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(DispatchError::NotFound(normalized)),
            Err(e) => {
                warn!(dataset = dataset_id, variant = %normalized, "Fetch failed: {e}");
                Err(DispatchError::NotFound(normalized))
            }
        }
    }
}

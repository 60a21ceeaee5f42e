//! Command-line interface for variant-cooccurrence.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **compute**: Estimate whether two variants co-occur in cis or in trans
//! - **normalize**: Canonicalize a variant ID and check it against a genome build
//! - **datasets**: List known datasets, or the datasets a data file provides
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Compute co-occurrence for two variants in gnomAD v2
//! variant-cooccurrence compute 1-55516888-G-GA 1-55505647-G-T --data variants.json
//!
//! # JSON output for scripting
//! variant-cooccurrence compute 1-55516888-G-GA 1-55505647-G-T --data variants.json --format json
//!
//! # Check an identifier against GRCh38 naming
//! variant-cooccurrence normalize CHR1-55516888-g-ga --build grch38
//!
//! # Start the API
//! variant-cooccurrence serve --data variants.json --port 8080
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::analysis::eligibility::DEFAULT_MAX_ALLELE_FREQUENCY;
use crate::analysis::engine::{CooccurrenceConfig, CooccurrenceEngine};
use crate::analysis::haplotype::{EmSettings, DEFAULT_EM_MAX_ITERATIONS, DEFAULT_EM_TOLERANCE};
use crate::core::types::DEFAULT_COOCCURRENCE_DATASET;
use crate::datasets::precomputed::InMemoryPrecomputedStore;
use crate::datasets::store::load_registry;

pub mod compute;
pub mod datasets;
pub mod normalize;

#[derive(Parser)]
#[command(name = "variant-cooccurrence")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Estimate whether two variants in the same gene occur in cis or in trans")]
#[command(
    long_about = "variant-cooccurrence estimates how likely two rare variants in the same gene are to be carried on opposite chromosome copies (compound heterozygous) using only population allele counts.\n\nIt derives genotype categories from allele counts, estimates two-locus haplotype counts and reports:\n- The 3x3 genotype table and haplotype counts for the whole exome cohort\n- The same statistics for each population both variants report\n- The probability of compound heterozygosity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute co-occurrence statistics for two variants
    Compute(compute::ComputeArgs),

    /// Normalize a variant ID and validate it against a genome build
    Normalize(normalize::NormalizeArgs),

    /// List datasets
    Datasets(datasets::DatasetsArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Analysis options shared by `compute` and `serve`
#[derive(clap::Args, Clone, Debug)]
pub struct AnalysisArgs {
    /// Variant data file (JSON, optionally gzip-compressed)
    #[arg(long, env = "VARIANT_COOCCURRENCE_DATA")]
    pub data: PathBuf,

    /// Precomputed results file consulted before computing
    #[arg(long, env = "VARIANT_COOCCURRENCE_PRECOMPUTED")]
    pub precomputed: Option<PathBuf>,

    /// Datasets co-occurrence may be computed against (repeatable)
    #[arg(long = "allow-dataset", default_value = DEFAULT_COOCCURRENCE_DATASET)]
    pub allowed_datasets: Vec<String>,

    /// Maximum exome allele frequency for either variant
    #[arg(long, default_value_t = DEFAULT_MAX_ALLELE_FREQUENCY)]
    pub max_af: f64,

    /// Maximum EM iterations when double heterozygotes are present
    #[arg(long, default_value_t = DEFAULT_EM_MAX_ITERATIONS)]
    pub em_max_iterations: usize,

    /// EM convergence tolerance
    #[arg(long, default_value_t = DEFAULT_EM_TOLERANCE)]
    pub em_tolerance: f64,
}

impl AnalysisArgs {
    #[must_use]
    pub fn config(&self) -> CooccurrenceConfig {
        CooccurrenceConfig {
            max_allele_frequency: self.max_af,
            em: EmSettings {
                max_iterations: self.em_max_iterations,
                tolerance: self.em_tolerance,
            },
            supported_datasets: self.allowed_datasets.clone(),
        }
    }

    /// Load the data files and assemble an engine
    ///
    /// # Errors
    ///
    /// Returns an error if the data or precomputed file cannot be loaded.
    pub fn build_engine(&self) -> anyhow::Result<CooccurrenceEngine> {
        let registry = load_registry(&self.data)
            .with_context(|| format!("Failed to load variant data from {}", self.data.display()))?;
        let mut engine = CooccurrenceEngine::with_config(Arc::new(registry), self.config());

        if let Some(path) = &self.precomputed {
            let store = InMemoryPrecomputedStore::load_from_file(path).with_context(|| {
                format!("Failed to load precomputed results from {}", path.display())
            })?;
            tracing::info!(results = store.len(), "Loaded precomputed results");
            engine = engine.with_precomputed(Arc::new(store));
        }

        Ok(engine)
    }
}

#[derive(clap::Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Format an optional probability for text and TSV output
pub(crate) fn format_probability(p: Option<f64>) -> String {
    p.map_or_else(|| "NA".to_string(), |p| format!("{p:.6}"))
}

//! # variant-cooccurrence
//!
//! A library for estimating whether two variants in the same gene occur on the
//! same chromosome copy (in cis) or on opposite copies (in trans).
//!
//! Phasing two rare variants normally needs family data or long reads. When
//! neither is available, population allele counts still carry a signal: if two
//! variants almost never appear in the same individuals, they are unlikely to
//! share a haplotype.
//!
//! `variant-cooccurrence` turns each variant's allele count, allele number and
//! homozygote count into genotype categories, cross-tabulates the two variants
//! and estimates two-locus haplotype counts, from which it reports the
//! probability that a carrier of both is compound heterozygous.
//!
//! ## Features
//!
//! - **Ploidy-aware genotypes**: X and Y chromosome sample counts follow the sex strata
//! - **Closed-form or EM haplotypes**: EM only runs when double heterozygotes are present
//! - **Population breakdown**: The same statistics for every population both variants report
//! - **Eligibility gate**: Pairs in different genes, without a shared coding
//!   consequence or above 5% frequency are rejected
//! - **Precomputed results**: A pair-keyed store can short-circuit computation
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use variant_cooccurrence::CooccurrenceEngine;
//! use variant_cooccurrence::datasets::store::load_registry;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let registry = load_registry(Path::new("variants.json"))?;
//! let engine = CooccurrenceEngine::new(Arc::new(registry));
//!
//! let ids = vec!["1-55516888-G-GA".to_string(), "1-55505647-G-T".to_string()];
//! let result = engine.compute(&ids, "gnomad_r2_1").await?;
//!
//! match result.p_compound_heterozygous {
//!     Some(p) => println!("P(compound het) = {p:.3}"),
//!     None => println!("Not enough data"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: Eligibility, genotype extraction, haplotype estimation and scoring
//! - [`core`]: Variant records, allele counts and identifier handling
//! - [`datasets`]: Dataset registry, JSON data store and precomputed results
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API

pub mod analysis;
pub mod cli;
pub mod core;
pub mod datasets;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use analysis::engine::{
    CooccurrenceConfig, CooccurrenceEngine, CooccurrenceError, CooccurrenceResult,
};
pub use crate::core::annotation::VariantRecord;
pub use crate::core::frequency::{AlleleCounts, FrequencyRecord};
pub use crate::core::types::*;
pub use datasets::registry::{DatasetHandler, DatasetRegistry};

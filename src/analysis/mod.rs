//! Co-occurrence estimation from allele-count summaries.
//!
//! This module provides the statistical pipeline:
//!
//! - [`CooccurrenceEngine`]: Main entry point, validating and computing a variant pair
//! - [`check_eligibility`]: Decides whether a pair can be analyzed at all
//! - [`extract_genotypes`]: Genotype categories per cohort and population
//! - [`GenotypeTable`], [`HaplotypeCounts`]: Two-locus tables and haplotype estimates
//! - [`p_compound_heterozygous`]: Probability the two variants are in trans
//!
//! ## Pipeline
//!
//! 1. **Eligibility**: same gene, shared coding consequence, exome data, AF <= 5%
//! 2. **Genotype categories**: hom-ref / het / hom-alt counts from AC, AN and
//!    homozygote counts, with sex-chromosome ploidy correction
//! 3. **Genotype table**: 3x3 cross-tabulation of the two variants' categories
//! 4. **Haplotypes**: closed form, or EM when double heterozygotes are present
//! 5. **Score**: `aB*Ab / (AB*ab + aB*Ab)`
//!
//! Steps 2-5 run once for the whole exome cohort and once per population
//! both variants report.
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
//! println!("{:?}", result.p_compound_heterozygous);
//! # Ok(())
//! # }
//! ```
//!
//! [`CooccurrenceEngine`]: engine::CooccurrenceEngine
//! [`check_eligibility`]: eligibility::check_eligibility
//! [`extract_genotypes`]: genotype::extract_genotypes
//! [`GenotypeTable`]: haplotype::GenotypeTable
//! [`HaplotypeCounts`]: haplotype::HaplotypeCounts
//! [`p_compound_heterozygous`]: scoring::p_compound_heterozygous

pub mod eligibility;
pub mod engine;
pub mod genotype;
pub mod haplotype;
pub mod ploidy;
pub mod scoring;

pub use engine::{CooccurrenceConfig, CooccurrenceEngine, CooccurrenceError, CooccurrenceResult};

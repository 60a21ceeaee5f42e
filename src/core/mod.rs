//! Core data types for variant co-occurrence.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`VariantRecord`]: A variant's frequency data and transcript consequences in one dataset
//! - [`FrequencyRecord`], [`PopulationFrequency`], [`AlleleCounts`]: Stratified allele counts
//! - [`GenomeBuild`], [`DatasetInfo`], [`FrequencySchema`]: Dataset metadata types
//! - [`variant`]: Identifier normalization and build-convention checks
//!
//! ## Identifier Conventions
//!
//! Datasets on different builds name chromosomes differently:
//!
//! | Build  | Chromosome 1 | Mitochondrial |
//! |--------|--------------|---------------|
//! | GRCh37 | 1            | MT (chrM tolerated) |
//! | GRCh38 | chr1         | chrM          |
//!
//! [`VariantRecord`]: annotation::VariantRecord
//! [`FrequencyRecord`]: frequency::FrequencyRecord
//! [`PopulationFrequency`]: frequency::PopulationFrequency
//! [`AlleleCounts`]: frequency::AlleleCounts
//! [`GenomeBuild`]: types::GenomeBuild
//! [`DatasetInfo`]: types::DatasetInfo
//! [`FrequencySchema`]: types::FrequencySchema

pub mod annotation;
pub mod frequency;
pub mod types;
pub mod variant;

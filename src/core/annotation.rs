use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::frequency::FrequencyRecord;

/// Consequence terms that count as a coding or UTR hit for co-occurrence
pub const CODING_CONSEQUENCE_TERMS: &[&str] = &[
    "transcript_ablation",
    "splice_acceptor_variant",
    "splice_donor_variant",
    "stop_gained",
    "frameshift_variant",
    "stop_lost",
    "start_lost",
    "initiator_codon_variant",
    "transcript_amplification",
    "inframe_insertion",
    "inframe_deletion",
    "missense_variant",
    "protein_altering_variant",
    "splice_region_variant",
    "incomplete_terminal_codon_variant",
    "start_retained_variant",
    "stop_retained_variant",
    "synonymous_variant",
    "coding_sequence_variant",
    "5_prime_UTR_variant",
    "3_prime_UTR_variant",
];

#[must_use]
pub fn is_coding_consequence(term: &str) -> bool {
    CODING_CONSEQUENCE_TERMS.contains(&term)
}

/// A variant's most severe consequence on one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptConsequence {
    pub gene_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_id: Option<String>,

    pub major_consequence: String,
}

impl TranscriptConsequence {
    pub fn new(gene_id: impl Into<String>, major_consequence: impl Into<String>) -> Self {
        Self {
            gene_id: gene_id.into(),
            gene_symbol: None,
            transcript_id: None,
            major_consequence: major_consequence.into(),
        }
    }
}

/// Frequency and annotation data for one variant in one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub variant_id: String,

    /// Chromosome token as reported upstream (`1`, `X`, `chrX`, ...)
    pub chrom: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rsids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exome: Option<FrequencyRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome: Option<FrequencyRecord>,

    #[serde(default)]
    pub transcript_consequences: Vec<TranscriptConsequence>,
}

impl VariantRecord {
    pub fn new(variant_id: impl Into<String>, chrom: impl Into<String>) -> Self {
        Self {
            variant_id: variant_id.into(),
            chrom: chrom.into(),
            rsids: Vec::new(),
            exome: None,
            genome: None,
            transcript_consequences: Vec::new(),
        }
    }

    pub fn with_exome(mut self, exome: FrequencyRecord) -> Self {
        self.exome = Some(exome);
        self
    }

    pub fn with_consequences(mut self, consequences: Vec<TranscriptConsequence>) -> Self {
        self.transcript_consequences = consequences;
        self
    }

    /// Every gene this variant is annotated against
    #[must_use]
    pub fn gene_ids(&self) -> HashSet<&str> {
        self.transcript_consequences
            .iter()
            .map(|csq| csq.gene_id.as_str())
            .collect()
    }

    /// True if any consequence in `gene_id` is a coding or UTR term
    #[must_use]
    pub fn has_coding_consequence_in(&self, gene_id: &str) -> bool {
        self.transcript_consequences
            .iter()
            .any(|csq| csq.gene_id == gene_id && is_coding_consequence(&csq.major_consequence))
    }
}

//! Checks that decide whether co-occurrence analysis is meaningful for a pair.

use thiserror::Error;

use crate::core::annotation::VariantRecord;

/// Default upper bound on either variant's exome allele frequency
pub const DEFAULT_MAX_ALLELE_FREQUENCY: f64 = 0.05;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EligibilityError {
    #[error("Variant not found: {0}")]
    NotFound(String),

    #[error("Variants are in different genes")]
    DifferentGenes,

    #[error("Variants do not share a coding or UTR consequence in any gene")]
    NoSharedCodingConsequence,

    #[error("Variant {0} has no exome frequency data")]
    MissingExomeCohort(String),

    #[error("Variant {variant_id} allele frequency {allele_frequency} exceeds {threshold}")]
    FrequencyTooHigh {
        variant_id: String,
        allele_frequency: f64,
        threshold: f64,
    },
}

/// Validate a fetched pair, failing on the first unmet requirement.
///
/// Checked in order: both present, shared gene, shared coding consequence
/// in that gene, exome data for both, exome AF at most `max_allele_frequency`.
///
/// # Errors
///
/// Returns the `EligibilityError` for the first check that fails.
pub fn check_eligibility(
    variant_ids: [&str; 2],
    records: [Option<&VariantRecord>; 2],
    max_allele_frequency: f64,
) -> Result<(), EligibilityError> {
    let [Some(a), Some(b)] = records else {
        let missing = if records[0].is_none() {
            variant_ids[0]
        } else {
            variant_ids[1]
        };
        return Err(EligibilityError::NotFound(missing.to_string()));
    };

    let genes_a = a.gene_ids();
    let genes_b = b.gene_ids();
    let shared_genes: Vec<&str> = genes_a.intersection(&genes_b).copied().collect();
    if shared_genes.is_empty() {
        return Err(EligibilityError::DifferentGenes);
    }

    let has_shared_coding = shared_genes
        .iter()
        .any(|gene| a.has_coding_consequence_in(gene) && b.has_coding_consequence_in(gene));
    if !has_shared_coding {
        return Err(EligibilityError::NoSharedCodingConsequence);
    }

    for record in [a, b] {
        if record.exome.is_none() {
            return Err(EligibilityError::MissingExomeCohort(
                record.variant_id.clone(),
            ));
        }
    }

    for record in [a, b] {
        if let Some(exome) = &record.exome {
            let allele_frequency = exome.counts.allele_frequency();
            if allele_frequency > max_allele_frequency {
                return Err(EligibilityError::FrequencyTooHigh {
                    variant_id: record.variant_id.clone(),
                    allele_frequency,
                    threshold: max_allele_frequency,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotation::TranscriptConsequence;
    use crate::core::frequency::{AlleleCounts, FrequencyRecord};

    fn variant(id: &str, gene: &str, consequence: &str, ac: u64, an: u64) -> VariantRecord {
        VariantRecord::new(id, id.split('-').next().unwrap_or_default())
            .with_exome(FrequencyRecord::new(AlleleCounts::new(ac, an, 0)))
            .with_consequences(vec![TranscriptConsequence::new(gene, consequence)])
    }

    fn check(a: &VariantRecord, b: &VariantRecord) -> Result<(), EligibilityError> {
        check_eligibility(
            [a.variant_id.as_str(), b.variant_id.as_str()],
            [Some(a), Some(b)],
            DEFAULT_MAX_ALLELE_FREQUENCY,
        )
    }

    #[test]
    fn test_eligible_pair() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 1, 1000);
        let b = variant("1-200-C-G", "ENSG01", "synonymous_variant", 2, 1000);
        assert_eq!(check(&a, &b), Ok(()));
    }

    #[test]
    fn test_missing_variant() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 1, 1000);
        let err = check_eligibility(
            ["1-100-A-T", "1-200-C-G"],
            [Some(&a), None],
            DEFAULT_MAX_ALLELE_FREQUENCY,
        )
        .unwrap_err();
        assert_eq!(err, EligibilityError::NotFound("1-200-C-G".to_string()));
    }

    #[test]
    fn test_cross_chromosome_pair_is_different_genes() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 1, 1000);
        let b = variant("2-100-A-T", "ENSG02", "missense_variant", 1, 1000);
        assert_eq!(check(&a, &b), Err(EligibilityError::DifferentGenes));
    }

    #[test]
    fn test_noncoding_consequence() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 1, 1000);
        let b = variant("1-200-C-G", "ENSG01", "intron_variant", 1, 1000);
        assert_eq!(check(&a, &b), Err(EligibilityError::NoSharedCodingConsequence));
    }

    #[test]
    fn test_coding_consequences_must_share_a_gene() {
        // Both overlap ENSG01 and ENSG02, but each is coding in a different one
        let a = VariantRecord::new("1-100-A-T", "1")
            .with_exome(FrequencyRecord::new(AlleleCounts::new(1, 1000, 0)))
            .with_consequences(vec![
                TranscriptConsequence::new("ENSG01", "missense_variant"),
                TranscriptConsequence::new("ENSG02", "intron_variant"),
            ]);
        let b = VariantRecord::new("1-200-C-G", "1")
            .with_exome(FrequencyRecord::new(AlleleCounts::new(1, 1000, 0)))
            .with_consequences(vec![
                TranscriptConsequence::new("ENSG01", "intron_variant"),
                TranscriptConsequence::new("ENSG02", "stop_gained"),
            ]);
        assert_eq!(check(&a, &b), Err(EligibilityError::NoSharedCodingConsequence));
    }

    #[test]
    fn test_missing_exome() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 1, 1000);
        let mut b = variant("1-200-C-G", "ENSG01", "missense_variant", 1, 1000);
        b.exome = None;
        assert_eq!(
            check(&a, &b),
            Err(EligibilityError::MissingExomeCohort("1-200-C-G".to_string()))
        );
    }

    #[test]
    fn test_frequency_too_high() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 100, 1000);
        let b = variant("1-200-C-G", "ENSG01", "missense_variant", 1, 1000);
        assert!(matches!(
            check(&a, &b),
            Err(EligibilityError::FrequencyTooHigh { variant_id, .. }) if variant_id == "1-100-A-T"
        ));
    }

    #[test]
    fn test_frequency_at_threshold_is_allowed() {
        let a = variant("1-100-A-T", "ENSG01", "missense_variant", 50, 1000);
        let b = variant("1-200-C-G", "ENSG01", "missense_variant", 0, 0);
        assert_eq!(check(&a, &b), Ok(()));
    }
}

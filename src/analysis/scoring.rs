use crate::analysis::haplotype::HaplotypeCounts;

/// Probability that carriers of both variants carry them in trans.
///
/// `p = (aB * Ab) / (AB * ab + aB * Ab)`
///
/// Returns `None` when the denominator is zero or the result is NaN. The value
/// is not clamped to `[0, 1]`.
#[must_use]
pub fn p_compound_heterozygous(haplotypes: &HaplotypeCounts) -> Option<f64> {
    let trans = haplotypes.aB * haplotypes.Ab;
    let denominator = haplotypes.AB * haplotypes.ab + trans;

    if denominator == 0.0 {
        return None;
    }

    let p = trans / denominator;
    (!p.is_nan()).then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cis_scores_zero() {
        let haplotypes = HaplotypeCounts::from([100.0, 0.0, 0.0, 50.0]);
        assert_eq!(p_compound_heterozygous(&haplotypes), Some(0.0));
    }

    #[test]
    fn test_zero_denominator_has_no_value() {
        let haplotypes = HaplotypeCounts::from([0.0, 0.0, 0.0, 0.0]);
        assert_eq!(p_compound_heterozygous(&haplotypes), None);

        let haplotypes = HaplotypeCounts::from([1989.0, 11.0, 0.0, 0.0]);
        assert_eq!(p_compound_heterozygous(&haplotypes), None);
    }

    #[test]
    fn test_nan_has_no_value() {
        let haplotypes = HaplotypeCounts::from([f64::NAN, 1.0, 1.0, 1.0]);
        assert_eq!(p_compound_heterozygous(&haplotypes), None);
    }

    #[test]
    fn test_mixed_phase() {
        let haplotypes = HaplotypeCounts::from([10.0, 2.0, 3.0, 1.0]);
        let p = p_compound_heterozygous(&haplotypes).unwrap();
        assert!((p - 6.0 / 16.0).abs() < 1e-12);
    }
}

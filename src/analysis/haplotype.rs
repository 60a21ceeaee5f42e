//! Two-locus genotype tables and haplotype count estimation.
//!
//! Alleles are written `A`/`a` for the first variant and `B`/`b` for the
//! second, upper case for reference and lower case for alternate.

use serde::{Deserialize, Serialize};

use crate::analysis::genotype::GenotypeCategoryCounts;

/// Default maximum number of EM rounds
pub const DEFAULT_EM_MAX_ITERATIONS: usize = 100;

/// Default convergence threshold on the largest frequency change between rounds
pub const DEFAULT_EM_TOLERANCE: f64 = 1e-7;

#[inline]
#[allow(clippy::cast_precision_loss)]
fn count_to_f64(count: i64) -> f64 {
    count as f64
}

/// Haplotypes carried by one homozygous cell (twice) and two heterozygous cells
fn haplotype_count(homozygous: i64, het_1: i64, het_2: i64) -> f64 {
    count_to_f64(
        homozygous
            .saturating_mul(2)
            .saturating_add(het_1)
            .saturating_add(het_2),
    )
}

/// Settings for the EM haplotype estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for EmSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_EM_MAX_ITERATIONS,
            tolerance: DEFAULT_EM_TOLERANCE,
        }
    }
}

/// Cross-tabulation of two variants' genotype categories.
///
/// Serialized as `[AABB, AABb, AAbb, AaBB, AaBb, Aabb, aaBB, aaBb, aabb]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 9]", into = "[i64; 9]")]
#[allow(non_snake_case)]
pub struct GenotypeTable {
    pub AABB: i64,
    pub AABb: i64,
    pub AAbb: i64,
    pub AaBB: i64,
    pub AaBb: i64,
    pub Aabb: i64,
    pub aaBB: i64,
    pub aaBb: i64,
    pub aabb: i64,
}

impl From<[i64; 9]> for GenotypeTable {
    fn from(c: [i64; 9]) -> Self {
        Self {
            AABB: c[0],
            AABb: c[1],
            AAbb: c[2],
            AaBB: c[3],
            AaBb: c[4],
            Aabb: c[5],
            aaBB: c[6],
            aaBb: c[7],
            aabb: c[8],
        }
    }
}

impl From<GenotypeTable> for [i64; 9] {
    fn from(t: GenotypeTable) -> Self {
        [
            t.AABB, t.AABb, t.AAbb, t.AaBB, t.AaBb, t.Aabb, t.aaBB, t.aaBb, t.aabb,
        ]
    }
}

impl GenotypeTable {
    /// Fill the table from each variant's marginal genotype categories.
    ///
    /// No joint genotypes are observed, so this is an approximation: every
    /// sample carrying variant B is placed in a row where A is homozygous
    /// reference and vice versa, and double heterozygotes are never counted.
    /// Output values depend on this exact layout.
    #[must_use]
    pub fn from_marginals(a: &GenotypeCategoryCounts, b: &GenotypeCategoryCounts) -> Self {
        Self {
            AABB: a.n_hom_ref.min(b.n_hom_ref),
            AABb: b.n_het,
            AAbb: b.n_hom_alt,
            AaBB: a.n_het,
            AaBb: 0,
            Aabb: 0,
            aaBB: a.n_hom_alt,
            aaBb: 0,
            aabb: 0,
        }
    }

    #[must_use]
    pub fn total(&self) -> i64 {
        <[i64; 9]>::from(*self)
            .iter()
            .fold(0_i64, |acc, &count| acc.saturating_add(count))
    }

    /// Haplotype counts implied by every cell except the double heterozygote
    fn unambiguous_haplotypes(&self) -> HaplotypeCounts {
        HaplotypeCounts {
            AB: haplotype_count(self.AABB, self.AABb, self.AaBB),
            aB: haplotype_count(self.aaBB, self.AaBB, self.aaBb),
            Ab: haplotype_count(self.AAbb, self.AABb, self.Aabb),
            ab: haplotype_count(self.aabb, self.Aabb, self.aaBb),
        }
    }
}

/// Estimated chromosome copies carrying each two-locus allele combination.
///
/// Serialized as `[AB, aB, Ab, ab]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
#[allow(non_snake_case)]
pub struct HaplotypeCounts {
    pub AB: f64,
    pub aB: f64,
    pub Ab: f64,
    pub ab: f64,
}

impl From<[f64; 4]> for HaplotypeCounts {
    fn from(c: [f64; 4]) -> Self {
        Self {
            AB: c[0],
            aB: c[1],
            Ab: c[2],
            ab: c[3],
        }
    }
}

impl From<HaplotypeCounts> for [f64; 4] {
    fn from(h: HaplotypeCounts) -> Self {
        [h.AB, h.aB, h.Ab, h.ab]
    }
}

impl HaplotypeCounts {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.AB + self.aB + self.Ab + self.ab
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            AB: self.AB * factor,
            aB: self.aB * factor,
            Ab: self.Ab * factor,
            ab: self.ab * factor,
        }
    }
}

/// Estimate haplotype counts, resolving double heterozygotes with EM when present
#[must_use]
pub fn estimate_haplotype_counts(table: &GenotypeTable, settings: &EmSettings) -> HaplotypeCounts {
    if table.AaBb == 0 {
        table.unambiguous_haplotypes()
    } else {
        em_haplotype_counts(table, settings)
    }
}

/// Expectation-Maximization estimate of haplotype counts.
///
/// Double heterozygotes (`AaBb`) are split between the `AB/ab` and `aB/Ab`
/// phases in proportion to the current frequency estimates. Returns all
/// zeros when every sample is `AABB`. Stops early if the phase weight `k`
/// collapses to zero.
#[must_use]
pub fn em_haplotype_counts(table: &GenotypeTable, settings: &EmSettings) -> HaplotypeCounts {
    let n_samples = table.total();
    if table.AABB == n_samples {
        return HaplotypeCounts::default();
    }

    let n_haplotypes = count_to_f64(n_samples.saturating_mul(2));
    let double_het = count_to_f64(table.AaBb);
    let fixed = table.unambiguous_haplotypes();

    let mut p = HaplotypeCounts {
        AB: (fixed.AB + double_het / 2.0) / n_haplotypes,
        aB: (fixed.aB + double_het / 2.0) / n_haplotypes,
        Ab: (fixed.Ab + double_het / 2.0) / n_haplotypes,
        ab: (fixed.ab + double_het / 2.0) / n_haplotypes,
    };

    for _ in 0..settings.max_iterations {
        let k = p.AB * p.ab + p.aB * p.Ab;
        if k == 0.0 {
            break;
        }

        let cis = p.AB * p.ab * double_het / k;
        let trans = p.aB * p.Ab * double_het / k;
        let next = HaplotypeCounts {
            AB: (cis + fixed.AB) / n_haplotypes,
            aB: (trans + fixed.aB) / n_haplotypes,
            Ab: (trans + fixed.Ab) / n_haplotypes,
            ab: (cis + fixed.ab) / n_haplotypes,
        };

        let max_change = [
            (next.AB - p.AB).abs(),
            (next.aB - p.aB).abs(),
            (next.Ab - p.Ab).abs(),
            (next.ab - p.ab).abs(),
        ]
        .into_iter()
        .fold(0.0_f64, f64::max);

        p = next;
        if max_change <= settings.tolerance {
            break;
        }
    }

    p.scaled(n_haplotypes)
}

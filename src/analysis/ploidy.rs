//! Ploidy-correction rules for deriving diploid sample counts.
//!
//! Upstream frequency data encodes sex chromosomes in two ways that have to be
//! undone before genotype categories can be derived:
//!
//! - Sex-stratified populations use composite IDs (`afr_XX`, `afr_XY`), and
//!   the cohort-wide split uses the bare sentinels `XX` and `XY`.
//! - Hemizygous alternate calls are already counted in `homozygote_count`.

use crate::core::frequency::{AlleleCounts, PopulationFrequency};
use crate::core::variant::Chromosome;

/// Karyotypic sex of a stratified subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SexStratum {
    Xx,
    Xy,
}

impl SexStratum {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "XX" => Some(Self::Xx),
            "XY" => Some(Self::Xy),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xx => "XX",
            Self::Xy => "XY",
        }
    }
}

/// What a population ID refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationKey<'a> {
    /// An ancestry group, e.g. `afr`
    Group(&'a str),
    /// One sex of an ancestry group, e.g. `afr_XX`
    GroupSex(&'a str, SexStratum),
    /// The whole cohort restricted to one sex, `XX` or `XY`
    CohortSex(SexStratum),
}

impl<'a> PopulationKey<'a> {
    #[must_use]
    pub fn parse(id: &'a str) -> Self {
        if let Some(sex) = SexStratum::parse(id) {
            return Self::CohortSex(sex);
        }

        if let Some((group, suffix)) = id.rsplit_once('_') {
            if let Some(sex) = SexStratum::parse(suffix) {
                if !group.is_empty() {
                    return Self::GroupSex(group, sex);
                }
            }
        }

        Self::Group(id)
    }
}

/// An ancestry group with its sex-stratified subsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationGroup<'a> {
    pub id: &'a str,
    pub counts: &'a AlleleCounts,
    pub xx: Option<&'a AlleleCounts>,
    pub xy: Option<&'a AlleleCounts>,
}

impl PopulationGroup<'_> {
    /// AN of one sex subset; zero when that subset is missing
    #[must_use]
    pub fn sex_an(&self, sex: SexStratum) -> u64 {
        let counts = match sex {
            SexStratum::Xx => self.xx,
            SexStratum::Xy => self.xy,
        };
        counts.map_or(0, |c| c.an)
    }
}

/// Cohort-wide AN of one sex from the `XX`/`XY` sentinel entries; zero when missing
#[must_use]
pub fn cohort_sex_an(populations: &[PopulationFrequency], sex: SexStratum) -> u64 {
    populations
        .iter()
        .find(|pop| PopulationKey::parse(&pop.id) == PopulationKey::CohortSex(sex))
        .map_or(0, |pop| pop.counts.an)
}

/// Pair each plain ancestry group with its sex-stratified subsets.
///
/// Groups keep their input order. Sentinel and composite IDs are never
/// returned as groups of their own; composites without a matching plain
/// group are dropped.
#[must_use]
pub fn regroup_populations(populations: &[PopulationFrequency]) -> Vec<PopulationGroup<'_>> {
    let mut groups: Vec<PopulationGroup<'_>> = populations
        .iter()
        .filter_map(|pop| match PopulationKey::parse(&pop.id) {
            PopulationKey::Group(id) => Some(PopulationGroup {
                id,
                counts: &pop.counts,
                xx: None,
                xy: None,
            }),
            _ => None,
        })
        .collect();

    for pop in populations {
        if let PopulationKey::GroupSex(base, sex) = PopulationKey::parse(&pop.id) {
            if let Some(group) = groups.iter_mut().find(|g| g.id == base) {
                match sex {
                    SexStratum::Xx => group.xx = Some(&pop.counts),
                    SexStratum::Xy => group.xy = Some(&pop.counts),
                }
            }
        }
    }

    groups
}

/// Number of samples contributing to AN, correcting for sex-chromosome ploidy.
///
/// - autosomes (and mitochondria): AN / 2
/// - X: AN(XX) / 2 + AN(XY)
/// - Y: AN(XY)
#[must_use]
pub fn diploid_sample_count(chromosome: Chromosome, an: u64, an_xx: u64, an_xy: u64) -> i64 {
    let samples = match chromosome {
        Chromosome::Autosome | Chromosome::Mitochondrial => an / 2,
        Chromosome::X => (an_xx / 2).saturating_add(an_xy),
        Chromosome::Y => an_xy,
    };
    count_to_i64(samples)
}

/// Samples homozygous for the alternate allele.
///
/// Upstream reports hemizygous calls inside `homozygote_count`, so
/// `hemizygote_count` is not added again.
#[must_use]
pub fn hom_alt_count(counts: &AlleleCounts) -> i64 {
    count_to_i64(counts.homozygote_count)
}

#[inline]
pub(crate) fn count_to_i64(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pop(id: &str, ac: u64, an: u64) -> PopulationFrequency {
        PopulationFrequency::new(id, AlleleCounts::new(ac, an, 0))
    }

    #[test]
    fn test_population_key_parsing() {
        assert_eq!(PopulationKey::parse("afr"), PopulationKey::Group("afr"));
        assert_eq!(
            PopulationKey::parse("afr_XX"),
            PopulationKey::GroupSex("afr", SexStratum::Xx)
        );
        assert_eq!(
            PopulationKey::parse("eas_oea_XY"),
            PopulationKey::GroupSex("eas_oea", SexStratum::Xy)
        );
        assert_eq!(
            PopulationKey::parse("XY"),
            PopulationKey::CohortSex(SexStratum::Xy)
        );
        assert_eq!(PopulationKey::parse("eas_oea"), PopulationKey::Group("eas_oea"));
        assert_eq!(PopulationKey::parse("_XX"), PopulationKey::Group("_XX"));
    }

    #[test]
    fn test_regroup_pairs_sex_subsets() {
        let populations = vec![
            pop("afr", 3, 200),
            pop("afr_XX", 2, 120),
            pop("afr_XY", 1, 80),
            pop("XX", 5, 700),
            pop("XY", 4, 500),
            pop("nfe", 6, 1000),
            pop("nfe_XX", 6, 600),
            pop("sas_XY", 1, 10),
        ];

        let groups = regroup_populations(&populations);
        let ids: Vec<_> = groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["afr", "nfe"]);

        assert_eq!(groups[0].sex_an(SexStratum::Xx), 120);
        assert_eq!(groups[0].sex_an(SexStratum::Xy), 80);
        assert_eq!(groups[1].sex_an(SexStratum::Xx), 600);
        assert_eq!(groups[1].sex_an(SexStratum::Xy), 0);
    }

    #[test]
    fn test_cohort_sex_an() {
        let populations = vec![pop("XX", 5, 700), pop("afr_XY", 1, 80)];
        assert_eq!(cohort_sex_an(&populations, SexStratum::Xx), 700);
        assert_eq!(cohort_sex_an(&populations, SexStratum::Xy), 0);
    }

    #[test]
    fn test_diploid_sample_count() {
        assert_eq!(diploid_sample_count(Chromosome::Autosome, 1000, 0, 0), 500);
        assert_eq!(diploid_sample_count(Chromosome::X, 1000, 600, 400), 700);
        assert_eq!(diploid_sample_count(Chromosome::Y, 400, 0, 400), 400);
        assert_eq!(diploid_sample_count(Chromosome::X, 1000, 0, 0), 0);
        assert_eq!(
            diploid_sample_count(Chromosome::X, 0, u64::MAX, u64::MAX),
            i64::MAX
        );
    }

    #[test]
    fn test_hom_alt_ignores_hemizygote_count() {
        let mut counts = AlleleCounts::new(10, 1000, 2);
        counts.hemizygote_count = Some(3);
        assert_eq!(hom_alt_count(&counts), 2);
    }
}

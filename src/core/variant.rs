//! Variant identifier normalization and build-convention validation.
//!
//! Identifiers come in three shapes:
//!
//! | Shape             | Example          | Canonical form   |
//! |-------------------|------------------|------------------|
//! | chrom-pos-ref-alt | `CHR1-100-a-t`   | `chr1-100-A-T`   |
//! | rsID              | `RS12345`        | `rs12345`        |
//! | anything else     | `  foo  `        | `foo`            |

use thiserror::Error;

use crate::core::types::GenomeBuild;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantIdError {
    #[error("Variant ID '{variant_id}' does not follow {build} contig naming")]
    FormatMismatch {
        variant_id: String,
        build: GenomeBuild,
    },
}

/// Components of a chrom-pos-ref-alt identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantIdParts<'a> {
    pub chrom: &'a str,
    pub pos: &'a str,
    pub ref_allele: &'a str,
    pub alt_allele: &'a str,
}

fn is_allele(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == '*')
}

fn is_chrom_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a chrom-pos-ref-alt identifier (separated by `-` or `:`)
#[must_use]
pub fn parse_variant_id(s: &str) -> Option<VariantIdParts<'_>> {
    let mut parts = s.split(['-', ':']);
    let chrom = parts.next()?;
    let pos = parts.next()?;
    let ref_allele = parts.next()?;
    let alt_allele = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let valid = is_chrom_token(chrom)
        && !pos.is_empty()
        && pos.chars().all(|c| c.is_ascii_digit())
        && is_allele(ref_allele)
        && is_allele(alt_allele);

    valid.then_some(VariantIdParts {
        chrom,
        pos,
        ref_allele,
        alt_allele,
    })
}

/// True if `s` is a chrom-pos-ref-alt identifier
#[must_use]
pub fn is_variant_id(s: &str) -> bool {
    parse_variant_id(s.trim()).is_some()
}

/// True if `s` is an rsID (`rs` followed by digits, any case)
#[must_use]
pub fn is_rs_id(s: &str) -> bool {
    let s = s.trim();
    match (s.get(..2), s.get(2..)) {
        (Some(prefix), Some(digits)) => {
            prefix.eq_ignore_ascii_case("rs")
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Canonicalize a variant identifier.
///
/// # Examples
///
/// ```
/// use variant_cooccurrence::core::variant::normalize_variant_id;
///
/// assert_eq!(normalize_variant_id("CHR1-100-a-t"), "chr1-100-A-T");
/// assert_eq!(normalize_variant_id("1:100:a:t"), "1-100-A-T");
/// assert_eq!(normalize_variant_id("RS12345"), "rs12345");
/// assert_eq!(normalize_variant_id("  BRCA1  "), "BRCA1");
/// ```
#[must_use]
pub fn normalize_variant_id(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(parts) = parse_variant_id(trimmed) {
        return format!(
            "{}-{}-{}-{}",
            parts.chrom.to_lowercase(),
            parts.pos,
            parts.ref_allele.to_uppercase(),
            parts.alt_allele.to_uppercase()
        );
    }

    if is_rs_id(trimmed) {
        return trimmed.to_lowercase();
    }

    trimmed.to_string()
}

/// Check a chrom-pos-ref-alt identifier against a build's contig naming.
///
/// GRCh37 forbids a `chr` prefix except on the mitochondrial contig; GRCh38
/// requires it everywhere. Identifiers of other shapes are accepted as-is.
///
/// # Errors
///
/// Returns `VariantIdError::FormatMismatch` when the chromosome token breaks
/// the build's convention.
pub fn validate_variant_id_for_build(
    variant_id: &str,
    build: GenomeBuild,
) -> Result<(), VariantIdError> {
    let Some(parts) = parse_variant_id(variant_id.trim()) else {
        return Ok(());
    };

    let chrom = parts.chrom.to_lowercase();
    let has_prefix = chrom.starts_with("chr");

    let valid = match build {
        GenomeBuild::Grch37 => !has_prefix || Chromosome::parse(&chrom).is_mitochondrial(),
        GenomeBuild::Grch38 => has_prefix,
    };

    if valid {
        Ok(())
    } else {
        Err(VariantIdError::FormatMismatch {
            variant_id: variant_id.to_string(),
            build,
        })
    }
}

/// Ploidy-relevant classification of a chromosome token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chromosome {
    Autosome,
    X,
    Y,
    Mitochondrial,
}

impl Chromosome {
    /// Classify a chromosome token, ignoring case and any `chr` prefix
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let lower = token.trim().to_lowercase();
        let bare = lower.strip_prefix("chr").unwrap_or(&lower);
        match bare {
            "x" => Self::X,
            "y" => Self::Y,
            "m" | "mt" => Self::Mitochondrial,
            _ => Self::Autosome,
        }
    }

    #[must_use]
    pub fn is_mitochondrial(self) -> bool {
        matches!(self, Self::Mitochondrial)
    }
}

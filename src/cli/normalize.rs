use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::GenomeBuild;
use crate::core::variant::{
    is_rs_id, is_variant_id, normalize_variant_id, validate_variant_id_for_build,
};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Variant identifier to normalize
    #[arg(required = true)]
    pub id: String,

    /// Genome build to validate contig naming against
    #[arg(short, long)]
    pub build: Option<GenomeBuild>,
}

/// Shape of an identifier after normalization
fn id_kind(normalized: &str) -> &'static str {
    if is_variant_id(normalized) {
        "variant"
    } else if is_rs_id(normalized) {
        "rsid"
    } else {
        "other"
    }
}

pub fn run(args: NormalizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let normalized = normalize_variant_id(&args.id);
    let kind = id_kind(&normalized);

    if verbose {
        eprintln!("Input: {:?}", args.id);
    }

    if let Some(build) = args.build {
        validate_variant_id_for_build(&normalized, build)?;
    }

    match format {
        OutputFormat::Text => {
            println!("{normalized}");
            if verbose {
                eprintln!("Kind: {kind}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "input": args.id,
                "normalized": normalized,
                "kind": kind,
                "build": args.build,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("input\tnormalized\tkind");
            println!("{}\t{normalized}\t{kind}", args.id);
        }
    }

    Ok(())
}

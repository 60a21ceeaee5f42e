use clap::Args;

use crate::analysis::engine::CooccurrenceResult;
use crate::cli::{format_probability, AnalysisArgs, OutputFormat};
use crate::core::types::DEFAULT_COOCCURRENCE_DATASET;

#[derive(Args)]
pub struct ComputeArgs {
    /// First variant (chrom-pos-ref-alt or rsID)
    #[arg(required = true)]
    pub variant_a: String,

    /// Second variant (chrom-pos-ref-alt or rsID)
    #[arg(required = true)]
    pub variant_b: String,

    /// Dataset to look the variants up in
    #[arg(short, long, default_value = DEFAULT_COOCCURRENCE_DATASET)]
    pub dataset: String,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

pub fn run(args: ComputeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let engine = args.analysis.build_engine()?;

    if verbose {
        eprintln!(
            "Loaded {} dataset(s) from {}",
            engine.registry().len(),
            args.analysis.data.display()
        );
    }

    let variant_ids = vec![args.variant_a.clone(), args.variant_b.clone()];
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(engine.compute(&variant_ids, &args.dataset))?;

    match format {
        OutputFormat::Text => print_text_result(&args.dataset, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Tsv => print_tsv_result(&result),
    }

    Ok(())
}

fn print_text_result(dataset: &str, result: &CooccurrenceResult) {
    let [a, b] = &result.variant_ids;

    println!("Variant Co-occurrence");
    println!("{}", "=".repeat(60));
    println!("\nVariant A: {a}");
    println!("Variant B: {b}");
    println!("Dataset:   {dataset}");

    println!(
        "\nP(compound heterozygous): {}",
        format_probability(result.p_compound_heterozygous)
    );

    let g = &result.genotype_counts;
    println!("\nGenotype counts (exome cohort):");
    println!("  {:>8} {:>8} {:>8}", "BB", "Bb", "bb");
    println!("  AA {:>8} {:>8} {:>8}", g.AABB, g.AABb, g.AAbb);
    println!("  Aa {:>8} {:>8} {:>8}", g.AaBB, g.AaBb, g.Aabb);
    println!("  aa {:>8} {:>8} {:>8}", g.aaBB, g.aaBb, g.aabb);

    let h = &result.haplotype_counts;
    println!("\nEstimated haplotype counts:");
    println!("  AB: {:.2}", h.AB);
    println!("  aB: {:.2}", h.aB);
    println!("  Ab: {:.2}", h.Ab);
    println!("  ab: {:.2}", h.ab);

    if !result.populations.is_empty() {
        println!("\nPopulations:");
        for pop in &result.populations {
            println!(
                "  {:<8} P(compound het) = {}",
                pop.id,
                format_probability(pop.p_compound_heterozygous)
            );
        }
    }
}

fn print_tsv_result(result: &CooccurrenceResult) {
    println!("scope\tgenotype_counts\thaplotype_counts\tp_compound_heterozygous");

    let row = |scope: &str, genotypes: [i64; 9], haplotypes: [f64; 4], p: Option<f64>| {
        let genotypes: Vec<String> = genotypes.iter().map(ToString::to_string).collect();
        let haplotypes: Vec<String> = haplotypes.iter().map(|h| format!("{h:.4}")).collect();
        println!(
            "{scope}\t{}\t{}\t{}",
            genotypes.join(","),
            haplotypes.join(","),
            format_probability(p)
        );
    };

    row(
        "all",
        result.genotype_counts.into(),
        result.haplotype_counts.into(),
        result.p_compound_heterozygous,
    );
    for pop in &result.populations {
        row(
            &pop.id,
            pop.genotype_counts.into(),
            pop.haplotype_counts.into(),
            pop.p_compound_heterozygous,
        );
    }
}

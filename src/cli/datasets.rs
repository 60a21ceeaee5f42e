use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::{DatasetInfo, KNOWN_DATASETS};
use crate::datasets::store::load_registry;

#[derive(Args)]
pub struct DatasetsArgs {
    /// Only list the datasets this data file provides
    #[arg(long, env = "VARIANT_COOCCURRENCE_DATA")]
    pub data: Option<PathBuf>,
}

pub fn run(args: DatasetsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let datasets: Vec<DatasetInfo> = if let Some(path) = &args.data {
        let registry = load_registry(path)?;
        if verbose {
            eprintln!("Loaded {} dataset(s) from {}", registry.len(), path.display());
        }
        registry.datasets().copied().collect()
    } else {
        KNOWN_DATASETS.to_vec()
    };

    match format {
        OutputFormat::Text => {
            let id_width = datasets.iter().map(|d| d.id.len()).max().unwrap_or(2).max(2);
            let total_width = id_width + 8 + 14 + 40 + 3;

            println!("Datasets ({})\n", datasets.len());
            println!(
                "{:<id_w$} {:<8} {:<14} {}",
                "ID",
                "Build",
                "Cohorts",
                "Label",
                id_w = id_width
            );
            println!("{}", "-".repeat(total_width));
            for d in &datasets {
                println!(
                    "{:<id_w$} {:<8} {:<14} {}",
                    d.id,
                    d.build.to_string(),
                    d.schema.to_string(),
                    d.label,
                    id_w = id_width
                );
            }
        }
        OutputFormat::Json => {
            let json: Vec<_> = datasets.iter().map(dataset_json).collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Tsv => {
            println!("id\tbuild\tcohorts\tlabel");
            for d in &datasets {
                println!("{}\t{}\t{}\t{}", d.id, d.build, d.schema, d.label);
            }
        }
    }

    Ok(())
}

pub(crate) fn dataset_json(info: &DatasetInfo) -> serde_json::Value {
    serde_json::json!({
        "id": info.id,
        "label": info.label,
        "build": info.build,
        "schema": info.schema,
        "has_exome_cohort": info.schema.has_exome_cohort(),
    })
}

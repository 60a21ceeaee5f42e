//! Command-line tests

use std::io::Write;

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const DATA: &str = r#"{
  "version": "1.0.0",
  "datasets": [
    {
      "id": "gnomad_r2_1",
      "variants": [
        {
          "variant_id": "1-100-A-T",
          "chrom": "1",
          "rsids": ["rs100"],
          "exome": { "ac": 2, "an": 2000, "homozygote_count": 0 },
          "transcript_consequences": [
            { "gene_id": "ENSG01", "major_consequence": "missense_variant" }
          ]
        },
        {
          "variant_id": "1-200-C-G",
          "chrom": "1",
          "exome": { "ac": 4, "an": 2000, "homozygote_count": 0 },
          "transcript_consequences": [
            { "gene_id": "ENSG01", "major_consequence": "frameshift_variant" }
          ]
        }
      ]
    }
  ]
}"#;

fn data_file() -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(DATA.as_bytes()).unwrap();
    file
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("variant-cooccurrence").unwrap();
    cmd.env_remove("VARIANT_COOCCURRENCE_DATA")
        .env_remove("VARIANT_COOCCURRENCE_PRECOMPUTED");
    cmd
}

#[test]
fn test_compute_text_output() {
    let data = data_file();
    cmd()
        .args(["compute", "1-100-A-T", "1-200-C-G", "--data"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("P(compound heterozygous): 1.000000"))
        .stdout(predicate::str::contains("Variant A: 1-100-A-T"));
}

#[test]
fn test_compute_json_output_with_rsid() {
    let data = data_file();
    let output = cmd()
        .args(["--format", "json", "compute", "rs100", "1-200-C-G", "--data"])
        .arg(data.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["genotype_counts"], serde_json::json!([996, 4, 0, 2, 0, 0, 0, 0, 0]));
    assert_eq!(json["p_compound_heterozygous"], 1.0);
}

#[test]
fn test_compute_reads_data_path_from_env() {
    let data = data_file();
    cmd()
        .env("VARIANT_COOCCURRENCE_DATA", data.path())
        .args(["compute", "1-100-A-T", "1-200-C-G", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "scope\tgenotype_counts\thaplotype_counts\tp_compound_heterozygous",
        ))
        .stdout(predicate::str::contains("all\t996,4,0,2,0,0,0,0,0"));
}

#[test]
fn test_compute_gzipped_data() {
    let mut file = NamedTempFile::with_suffix(".json.gz").unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(DATA.as_bytes()).unwrap();
    file.write_all(&encoder.finish().unwrap()).unwrap();

    cmd()
        .args(["compute", "1-100-A-T", "1-200-C-G", "--data"])
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn test_compute_missing_variant_fails() {
    let data = data_file();
    cmd()
        .args(["compute", "1-100-A-T", "1-999-C-G", "--data"])
        .arg(data.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Variant not found: 1-999-C-G"));
}

#[test]
fn test_compute_unsupported_dataset_fails() {
    let data = data_file();
    cmd()
        .args(["compute", "1-100-A-T", "1-200-C-G", "--dataset", "exac", "--data"])
        .arg(data.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported dataset: exac"));
}

#[test]
fn test_compute_requires_data() {
    cmd()
        .args(["compute", "1-100-A-T", "1-200-C-G"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data"));
}

#[test]
fn test_normalize() {
    cmd()
        .args(["normalize", "CHR1:100:a:t", "--build", "grch38"])
        .assert()
        .success()
        .stdout("chr1-100-A-T\n");
}

#[test]
fn test_normalize_build_mismatch_fails() {
    cmd()
        .args(["normalize", "chr1-100-A-T", "--build", "grch37"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chr1-100-A-T"));
}

#[test]
fn test_datasets_lists_known_datasets() {
    cmd()
        .args(["datasets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gnomad_r2_1"))
        .stdout(predicate::str::contains("gnomad_r4"));
}

#[test]
fn test_datasets_from_data_file() {
    let data = data_file();
    cmd()
        .args(["--format", "tsv", "datasets", "--data"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("gnomad_r2_1\tGRCh37"))
        .stdout(predicate::str::contains("exac").not());
}

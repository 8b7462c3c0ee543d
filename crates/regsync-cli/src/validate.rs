//! # Validate Subcommand
//!
//! Runs the replication policy validator over every policy in the given
//! documents and prints a per-policy verdict.
//!
//! Exit codes: 0 when every policy is well-formed, 1 when any policy has
//! findings. Unreadable or undecodable documents are operational errors.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use regsync_core::FieldError;

use crate::{load_all, LoadedPolicy, OutputFormat};

/// Arguments for the `regsync validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Policy documents or directories to validate.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Verdict for one policy.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyReport {
    /// `path#index`.
    pub location: String,
    /// Policy name as written.
    pub name: String,
    /// Whether no findings were reported.
    pub valid: bool,
    /// Findings in report order.
    pub errors: Vec<FieldError>,
}

impl PolicyReport {
    fn from_loaded(loaded: &LoadedPolicy) -> Self {
        let errors = loaded.policy.validation_errors();
        Self {
            location: loaded.location(),
            name: loaded.policy.name.clone(),
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate every loaded policy.
pub fn validate_policies(policies: &[LoadedPolicy]) -> Vec<PolicyReport> {
    policies.iter().map(PolicyReport::from_loaded).collect()
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let policies = load_all(&args.paths)?;
    let reports = validate_policies(&policies);
    let failed = reports.iter().filter(|r| !r.valid).count();

    tracing::info!(total = reports.len(), failed, "validation complete");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => print_text(&reports, failed),
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

fn print_text(reports: &[PolicyReport], failed: usize) {
    for report in reports {
        if report.valid {
            println!("OK: {} ({})", report.location, report.name);
        } else {
            println!("FAIL: {} ({})", report.location, report.name);
            for error in &report.errors {
                println!("  {error}");
            }
        }
    }

    println!(
        "Policies: {}/{} passed",
        reports.len() - failed,
        reports.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn valid_policy_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "ok.json",
            r#"{"name":"p1","src_registry_id":0,"dest_registry_id":5,"src_namespaces":["library"]}"#,
        );
        let args = ValidateArgs {
            paths: vec![path],
            format: OutputFormat::Text,
        };
        assert_eq!(run_validate(&args).unwrap(), 0);
    }

    #[test]
    fn invalid_policy_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"name":"","src_namespaces":[]}"#);
        let args = ValidateArgs {
            paths: vec![path],
            format: OutputFormat::Json,
        };
        assert_eq!(run_validate(&args).unwrap(), 1);
    }

    #[test]
    fn reports_carry_ordered_findings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "mixed.yaml",
            "- name: good\n  dest_registry_id: 1\n  src_namespaces: [library]\n\
             - name: ''\n  src_namespaces: []\n",
        );
        let loaded = load_all(&[path]).unwrap();
        let reports = validate_policies(&loaded);

        assert_eq!(reports.len(), 2);
        assert!(reports[0].valid);
        assert!(!reports[1].valid);
        let fields: Vec<&str> = reports[1].errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "src_registry_id, dest_registry_id", "src_namespaces"]
        );
    }

    #[test]
    fn report_serializes_for_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"name":"x","dest_registry_id":1,"src_namespaces":["a",""]}"#);
        let reports = validate_policies(&load_all(&[path]).unwrap());
        let json = serde_json::to_value(&reports).unwrap();
        assert_eq!(json[0]["valid"], false);
        assert_eq!(json[0]["errors"][0]["field"], "src_namespaces");
        assert_eq!(json[0]["errors"][0]["message"], "cannot contain empty namespace");
    }

    #[test]
    fn unreadable_document_is_an_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs {
            paths: vec![dir.path().join("missing.json")],
            format: OutputFormat::Text,
        };
        assert!(run_validate(&args).is_err());
    }
}

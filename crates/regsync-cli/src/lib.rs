//! # regsync-cli — CLI Tool for Replication Policies
//!
//! Provides the `regsync` command-line interface over policy documents on
//! disk.
//!
//! ## Subcommands
//!
//! - `regsync validate` — run the policy validator over every policy found.
//! - `regsync list` — filter and paginate policies with a `PolicyQuery`.
//!
//! ## Policy documents
//!
//! A document holds one policy object or an array of them, in JSON or YAML
//! (chosen by the `.yaml` / `.yml` extension). A directory argument is
//! walked recursively for `.json`, `.yaml`, and `.yml` files.
//!
//! ```bash
//! regsync validate policies/
//! regsync list --namespace library --page 1 --page-size 20 policies/
//! ```

pub mod list;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use regsync_core::Policy;

/// How results are printed.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// A JSON document on stdout.
    Json,
}

/// A policy together with where it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedPolicy {
    /// File the policy came from.
    pub source: PathBuf,
    /// Position within the file (0 for single-policy documents).
    pub index: usize,
    /// The decoded policy.
    pub policy: Policy,
}

impl LoadedPolicy {
    /// `path#index`, used to identify a policy in reports.
    pub fn location(&self) -> String {
        format!("{}#{}", self.source.display(), self.index)
    }
}

/// Load every policy from the given files and directories, in argument order.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<LoadedPolicy>> {
    let mut loaded = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in find_policy_files(path) {
                loaded.extend(load_file(&file)?);
            }
        } else {
            loaded.extend(load_file(path)?);
        }
    }
    tracing::info!(policies = loaded.len(), "loaded policy documents");
    Ok(loaded)
}

/// Load the policies held by one document.
pub fn load_file(path: &Path) -> Result<Vec<LoadedPolicy>> {
    if !path.exists() {
        bail!("policy file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file: {}", path.display()))?;

    let document: serde_json::Value = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse policy YAML: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse policy JSON: {}", path.display()))?
    };

    let items = match document {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let policy: Policy = serde_json::from_value(item).with_context(|| {
                format!("failed to decode policy #{index} in {}", path.display())
            })?;
            tracing::debug!(file = %path.display(), index, name = %policy.name, "decoded policy");
            Ok(LoadedPolicy {
                source: path.to_path_buf(),
                index,
                policy,
            })
        })
        .collect()
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn is_policy_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

/// Recursively find policy documents under a directory, sorted by path.
fn find_policy_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    walk_for_files(dir, &mut results);
    results.sort();
    results
}

fn walk_for_files(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during file walk"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk_for_files(&path, acc);
        } else if is_policy_file(&path) {
            acc.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY_JSON: &str = r#"{"name":"p1","dest_registry_id":5,"src_namespaces":["library"]}"#;

    #[test]
    fn load_single_json_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p1.json");
        std::fs::write(&path, POLICY_JSON).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].policy.name, "p1");
        assert_eq!(loaded[0].index, 0);
        assert!(loaded[0].location().ends_with("p1.json#0"));
    }

    #[test]
    fn load_yaml_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.yaml");
        std::fs::write(
            &path,
            "- name: a\n  dest_registry_id: 1\n  src_namespaces: [library]\n\
             - name: b\n  src_registry_id: 2\n  src_namespaces: [up]\n  \
             trigger:\n    type: scheduled\n    trigger_settings:\n      cron: '0 0 * * *'\n",
        )
        .unwrap();

        let loaded = load_file(&path).unwrap();
        let names: Vec<&str> = loaded.iter().map(|l| l.policy.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(loaded[1].index, 1);
        assert!(loaded[1].policy.trigger.is_some());
    }

    #[test]
    fn load_all_walks_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("team");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("b.json"), POLICY_JSON.replace("p1", "b")).unwrap();
        std::fs::write(nested.join("a.yml"), "name: nested\nsrc_registry_id: 3\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "not a policy").unwrap();

        let loaded = load_all(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = loaded.iter().map(|l| l.policy.name.as_str()).collect();
        assert_eq!(names, vec!["b", "nested"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse policy JSON"));
    }

    #[test]
    fn bad_filter_payload_names_the_policy_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"[{"name":"ok"},{"name":"x","filters":[{"type":"name","value":7}]}]"#,
        )
        .unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("policy #1"));
    }
}

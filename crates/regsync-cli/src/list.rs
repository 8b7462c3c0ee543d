//! # List Subcommand
//!
//! Loads policies and prints those selected by a name/namespace query, one
//! page at a time.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use regsync_core::{Direction, Pagination, Policy, PolicyQuery};

use crate::{load_all, OutputFormat};

/// Arguments for the `regsync list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Policy documents or directories to read.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Only policies whose name contains this string.
    #[arg(long, default_value = "")]
    pub name: String,

    /// Only policies that replicate from or into this namespace.
    #[arg(long, default_value = "")]
    pub namespace: String,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Policies per page; 0 lists everything.
    #[arg(long, default_value_t = 0)]
    pub page_size: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ListArgs {
    /// The query these arguments describe.
    pub fn query(&self) -> PolicyQuery {
        PolicyQuery {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            pagination: Pagination::new(self.page, self.page_size),
        }
    }
}

/// Execute the list subcommand.
pub fn run_list(args: &ListArgs) -> Result<u8> {
    let loaded = load_all(&args.paths)?;
    let query = args.query();
    let selected = query.apply(loaded.iter().map(|l| &l.policy));

    tracing::debug!(
        total = loaded.len(),
        selected = selected.len(),
        "applied policy query"
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&selected)?),
        OutputFormat::Text => {
            for policy in &selected {
                println!("{}", summarize(policy));
            }
        }
    }
    Ok(0)
}

/// One-line description of a policy.
pub fn summarize(policy: &Policy) -> String {
    let direction = match policy.direction() {
        Some(Direction::Push) => "push",
        Some(Direction::Pull) => "pull",
        None => "invalid",
    };
    let destination = if policy.flattens_namespaces() {
        policy.dest_namespace.as_str()
    } else {
        "<mirror>"
    };
    let trigger = policy
        .trigger
        .as_ref()
        .map_or("manual", |t| t.kind.as_str());
    format!(
        "{}\t{}\t{}\t[{}] -> {}\t{}{}",
        policy.id.get(),
        policy.name,
        direction,
        policy.src_namespaces.join(","),
        destination,
        trigger,
        if policy.enabled { "" } else { "\t(disabled)" },
    )
}

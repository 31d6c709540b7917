//! `aynorica status`: the status line plus a per-node table.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use aynorica_core::{NodeId, Registry, RegistryReader};
use aynorica_detector::Marker;
use aynorica_sync::staleness::{self, Staleness};
use aynorica_watch::status_line;

use super::open_workspace;

/// Arguments for `aynorica status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let workspace = open_workspace(root)?;
        let now = Utc::now();
        let snapshot = workspace.reader.snapshot();

        if self.json {
            let payload = build_json(workspace.node.marker, snapshot.as_ref(), now);
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        let Some((registry, current)) = snapshot else {
            println!("{}", status_line(None, None, now).text);
            println!("Registry not found. Run ay:sync to initialize.");
            return Ok(());
        };
        println!("{}", status_line(Some(&registry), current.as_ref(), now).text);
        print_table(&registry, current.as_ref(), now);
        Ok(())
    }
}

/// Print just the status line, re-reading the registry.
pub fn print_line(reader: &RegistryReader) {
    let now = Utc::now();
    let text = match reader.snapshot() {
        Some((registry, current)) => status_line(Some(&registry), current.as_ref(), now).text,
        None => status_line(None, None, now).text,
    };
    println!("{text}");
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusJson {
    initialized: bool,
    /// Which marker file made this directory a node.
    marker: &'static str,
    status: String,
    current_node: Option<String>,
    prime_node: Option<String>,
    total_nodes: usize,
    nodes: Vec<NodeJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeJson {
    id: String,
    branch: String,
    status: String,
    last_sync: String,
    elapsed: String,
    stale: bool,
    current: bool,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "node")]
    id: String,
    #[tabled(rename = "branch")]
    branch: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "last sync")]
    last_sync: String,
}

fn marker_name(marker: Marker) -> &'static str {
    match marker {
        Marker::Manifest => "manifest",
        Marker::Config => "config",
        Marker::Both => "both",
    }
}

fn build_json(
    marker: Marker,
    snapshot: Option<&(Registry, Option<NodeId>)>,
    now: DateTime<Utc>,
) -> StatusJson {
    let marker = marker_name(marker);
    let Some((registry, current)) = snapshot else {
        return StatusJson {
            initialized: false,
            marker,
            status: status_line(None, None, now).text,
            current_node: None,
            prime_node: None,
            total_nodes: 0,
            nodes: Vec::new(),
        };
    };

    let nodes = registry
        .nodes
        .iter()
        .map(|(id, node)| NodeJson {
            id: id.to_string(),
            branch: node.branch.clone(),
            status: node.status.clone(),
            last_sync: node.last_sync.clone(),
            elapsed: staleness::elapsed(&node.last_sync, now),
            stale: staleness::check(&node.last_sync, now).is_stale(),
            current: Some(id) == current.as_ref(),
        })
        .collect();

    StatusJson {
        initialized: current.is_some(),
        marker,
        status: status_line(Some(registry), current.as_ref(), now).text,
        current_node: current.as_ref().map(NodeId::to_string),
        prime_node: Some(registry.prime_node.to_string()).filter(|id| !id.is_empty()),
        total_nodes: registry.node_count(),
        nodes,
    }
}

fn print_table(registry: &Registry, current: Option<&NodeId>, now: DateTime<Utc>) {
    if registry.nodes.is_empty() {
        println!("No nodes registered.");
        return;
    }

    let rows: Vec<NodeRow> = registry
        .nodes
        .iter()
        .map(|(id, node)| {
            let marker = if Some(id) == current {
                "●".green().bold().to_string()
            } else {
                String::new()
            };
            let last_sync = match staleness::check(&node.last_sync, now) {
                Staleness::Stale { .. } => staleness::elapsed(&node.last_sync, now)
                    .yellow()
                    .to_string(),
                _ => staleness::elapsed(&node.last_sync, now),
            };
            NodeRow {
                marker,
                id: id.to_string(),
                branch: node.branch.clone(),
                status: node.status.clone(),
                last_sync,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

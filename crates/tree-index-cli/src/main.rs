// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `tree-index` command-line front end.
//!
//! Loads a flat JSON record list (`[{"id": 1, "parent": "root"}, ...]`),
//! indexes it, and answers one query on stdout as JSON.
//!
//! # Usage
//! ```text
//! tree-index --input records.json children 2
//! tree-index --input - ancestry 7 < records.json
//! ```
//!
//! Absent results (`item`/`ancestry` of an unknown id) print `null` and exit
//! with status 1. Logs go to stderr; set `RUST_LOG` to raise verbosity.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tree_index::{RecordId, TreeIndex};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query a flat JSON record list as a tree")]
struct Args {
    /// JSON file holding the record array (`-` reads stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,
    /// Emit single-line JSON instead of pretty-printed output
    #[arg(long)]
    compact: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print every record in input order
    All,
    /// Print the record with the given id
    Item {
        /// Record id
        id: RecordId,
    },
    /// Print the direct children of an id (empty list if none)
    Children {
        /// Parent id
        id: RecordId,
    },
    /// Print the ancestor chain, top-most ancestor first
    Ancestry {
        /// Record id
        id: RecordId,
    },
    /// Print records whose parent is the root sentinel
    Roots,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let bytes = read_input(&args.input)?;
    let index = TreeIndex::from_json_slice(&bytes)
        .with_context(|| format!("decode records from {}", args.input.display()))?;
    info!(records = index.len(), cmd = ?args.cmd, "index loaded");

    let result = query(&index, args.cmd)?;
    let mut out = io::stdout().lock();
    let code = match result {
        Some(value) => {
            if args.compact {
                serde_json::to_writer(&mut out, &value)?;
            } else {
                serde_json::to_writer_pretty(&mut out, &value)?;
            }
            ExitCode::SUCCESS
        }
        None => {
            out.write_all(b"null")?;
            ExitCode::FAILURE
        }
    };
    writeln!(out)?;
    Ok(code)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf).context("read stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("read {}", path.display()))
}

/// Run one query; `None` means the id did not resolve.
fn query(index: &TreeIndex, cmd: Command) -> serde_json::Result<Option<Value>> {
    match cmd {
        Command::All => serde_json::to_value(index.all()).map(Some),
        Command::Item { id } => index.item(id).map(serde_json::to_value).transpose(),
        Command::Children { id } => serde_json::to_value(index.children(id)).map(Some),
        Command::Ancestry { id } => index.ancestry(id).map(serde_json::to_value).transpose(),
        Command::Roots => serde_json::to_value(index.roots()).map(Some),
    }
}

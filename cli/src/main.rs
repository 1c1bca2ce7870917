//! warden: answer one permission question with the WASM decision guest.
//!
//! Loads the key/value database and the compiled guest module from
//! disk, runs a single `hasPerm` check, and prints one line with the
//! outcome.
//!
//! # Usage
//!
//! ```bash
//! warden 3 44 day.view
//! warden --data db.json --module module.wasm 3 44 day.view
//! ```
//!
//! Exit status: 0 on a completed check, 2 on argument errors (clap),
//! 1 on any operational failure.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::error;

use warden_bridge::{PermissionBridge, PermissionQuery};
use warden_datasource::MemSource;

/// Check whether a subject holds a permission in a context.
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subject identifier (non-negative)
    #[arg(value_name = "SUBJECT_ID")]
    subject_id: u32,

    /// Context identifier (non-negative)
    #[arg(value_name = "CONTEXT_ID")]
    context_id: u32,

    /// Permission name to check
    #[arg(value_name = "PERMISSION")]
    permission: String,

    /// Path to the JSON database consulted by the guest
    #[arg(long, default_value = "db.json")]
    data: PathBuf,

    /// Path to the compiled guest module
    #[arg(long, default_value = "module.wasm")]
    module: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = MemSource::from_json_file(&args.data)
        .with_context(|| format!("init database {}", args.data.display()))?;

    let wasm = std::fs::read(&args.module)
        .with_context(|| format!("reading module {}", args.module.display()))?;

    let bridge = PermissionBridge::new(&wasm, Arc::new(source))
        .context("creating wasm runtime")?;

    let query = PermissionQuery {
        subject_id: args.subject_id,
        context_id: args.context_id,
        permission: args.permission.clone(),
    };
    let decision = bridge.evaluate(&query).context("calling hasPerm")?;
    bridge.shutdown();

    let attr = if decision.is_granted() { "has" } else { "has not" };
    println!("subject {} {} {}", args.subject_id, attr, args.permission);

    Ok(())
}

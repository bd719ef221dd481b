#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod args;

use std::io::Read;
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::Parser;
use tablevend_catalog::{AwsPermissionAuthority, grant_and_vend};
use tablevend_core::{StorageScheme, TableAccess};
use tablevend_object::ConnectOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::args::{Cli, Command, ReadArgs, VendArgs};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "tablevend_cli::startup";
pub const TRACING_TARGET_OUTPUT: &str = "tablevend_cli::output";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(error = %error, "command failed");
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting tablevend"
    );

    match cli.command {
        Command::Vend(args) => vend(args).await,
        Command::Read(args) => read(args).await,
    }
}

/// Runs the vending flow and writes the access record as JSON.
async fn vend(args: VendArgs) -> anyhow::Result<()> {
    let request = args.to_request();
    let authority = AwsPermissionAuthority::from_env().await;

    let access = grant_and_vend(&authority, &request)
        .await
        .context("credential vending failed")?;

    let json = serde_json::to_string_pretty(&access).context("cannot encode access record")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("cannot write access record to {}", path.display()))?;
            tracing::info!(
                target: TRACING_TARGET_OUTPUT,
                path = %path.display(),
                "access record written"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Loads a vended access record and prints the authorized column subset.
async fn read(args: ReadArgs) -> anyhow::Result<()> {
    let access = load_access(&args.access)?;

    let scheme = if args.s3a {
        StorageScheme::S3a
    } else {
        StorageScheme::S3
    };
    let mut options = ConnectOptions::default().region(&args.region);
    if let Some(endpoint) = &args.endpoint {
        options = options.endpoint(endpoint);
    }

    let df = tablevend_frame::read(&access, args.engine.into(), scheme, &options)
        .await
        .context("authorized read failed")?;

    println!("{df}");
    Ok(())
}

/// Reads the access record from a file, or stdin when the path is `-`.
fn load_access(path: &Path) -> anyhow::Result<TableAccess> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read access record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("cannot read access record from {}", path.display()))?
    };
    serde_json::from_str(&json).context("cannot decode access record")
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tablevend_catalog::{DEFAULT_DURATION_SECONDS, DEFAULT_TAG_KEY, VendRequest};
use tablevend_frame::ReadEngine;

/// Vend short-lived column-scoped credentials and read the authorized
/// column subset of a cataloged table.
#[derive(Debug, Parser)]
#[command(name = "tablevend", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grant column permissions and vend temporary table credentials.
    Vend(VendArgs),
    /// Read the authorized columns using a previously vended record.
    Read(ReadArgs),
}

#[derive(Debug, Args)]
pub struct VendArgs {
    /// ARN of the role receiving the grant and being assumed.
    #[arg(long)]
    pub role: String,

    /// Catalog database name.
    #[arg(long)]
    pub database: String,

    /// Catalog table name.
    #[arg(long)]
    pub table: String,

    /// Comma-separated column names to authorize.
    #[arg(long, value_delimiter = ',', required = true)]
    pub columns: Vec<String>,

    /// Session-tag value the access-control service authorizes.
    #[arg(long)]
    pub tag_value: String,

    /// Session-tag key.
    #[arg(long, default_value = DEFAULT_TAG_KEY)]
    pub tag_key: String,

    /// Credential lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_DURATION_SECONDS)]
    pub duration_seconds: u32,

    /// Write the access record to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl VendArgs {
    /// Builds the vending-flow request from the parsed arguments.
    pub fn to_request(&self) -> VendRequest {
        VendRequest::new(
            &self.role,
            &self.database,
            &self.table,
            self.columns.clone(),
            &self.tag_value,
        )
        .tag_key(&self.tag_key)
        .duration_seconds(self.duration_seconds)
    }
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Path to the access record JSON, or `-` for stdin.
    #[arg(long)]
    pub access: PathBuf,

    /// Execution engine for the read.
    #[arg(long, value_enum, default_value_t = EngineArg::Eager)]
    pub engine: EngineArg,

    /// Report the table location with the `s3a://` scheme.
    #[arg(long)]
    pub s3a: bool,

    /// AWS region of the data bucket.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Endpoint URL for S3-compatible services.
    #[arg(long)]
    pub endpoint: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// Parse and project each file eagerly.
    Eager,
    /// Run projection and concatenation through the lazy engine.
    Lazy,
}

impl From<EngineArg> for ReadEngine {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Eager => ReadEngine::Eager,
            EngineArg::Lazy => ReadEngine::Lazy,
        }
    }
}

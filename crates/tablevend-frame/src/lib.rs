#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for read operations.
pub const TRACING_TARGET_READ: &str = "tablevend_frame::read";

mod engine;
mod read;

pub use engine::ReadEngine;
pub use polars::frame::DataFrame;
pub use read::{read, read_table};

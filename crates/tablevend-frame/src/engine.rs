//! CSV parsing and column projection for the two read-engine variants.

use std::io::Cursor;

use bytes::Bytes;
use polars::prelude::*;
use tablevend_core::{Error, Result};

/// Execution strategy for materializing the authorized table.
///
/// Both variants return the projected [`DataFrame`]; they differ only in
/// whether projection and concatenation run eagerly per file or through the
/// lazy query engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadEngine {
    /// Parse, project, and vstack each file as it arrives.
    #[default]
    Eager,
    /// Build a lazy plan per file, concatenate, and collect once.
    Lazy,
}

/// Parses one CSV object (header row expected) into a [`DataFrame`].
pub(crate) fn parse_csv(key: &str, data: &Bytes) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(data.to_vec()))
        .finish()
        .map_err(|e| from_polars(&format!("cannot parse csv object `{key}`"), e))
}

/// Projects and concatenates the parsed frames down to exactly `columns`.
///
/// Projection happens per file before concatenation, so no unauthorized
/// column survives into the result even transiently.
pub(crate) fn materialize(
    frames: Vec<DataFrame>,
    columns: &[String],
    engine: ReadEngine,
) -> Result<DataFrame> {
    match engine {
        ReadEngine::Eager => {
            let mut projected = frames
                .into_iter()
                .map(|df| {
                    df.select(columns.iter().map(String::as_str))
                        .map_err(|e| from_polars("cannot project authorized columns", e))
                })
                .collect::<Result<Vec<_>>>()?
                .into_iter();
            // At least one frame is guaranteed by the caller.
            let mut out = projected.next().ok_or_else(|| {
                Error::internal().with_message("materialize called with no frames")
            })?;
            for df in projected {
                out = out
                    .vstack(&df)
                    .map_err(|e| from_polars("cannot concatenate data files", e))?;
            }
            Ok(out)
        }
        ReadEngine::Lazy => {
            let exprs: Vec<Expr> = columns.iter().map(|c| col(c.as_str())).collect();
            let plans: Vec<LazyFrame> = frames
                .into_iter()
                .map(|df| df.lazy().select(exprs.clone()))
                .collect();
            concat(plans, UnionArgs::default())
                .and_then(LazyFrame::collect)
                .map_err(|e| from_polars("cannot collect lazy plan", e))
        }
    }
}

/// Wraps a [`PolarsError`] into the workspace taxonomy.
fn from_polars(context: &str, err: PolarsError) -> Error {
    let base = match &err {
        PolarsError::ColumnNotFound(_) => {
            Error::internal().with_message(format!("{context}: authorized column missing from data"))
        }
        _ => Error::serialization().with_message(format!("{context}: {err}")),
    };
    base.with_source(err)
}

//! Transaction ledger loader for CSV files
//!
//! Reads the whole ledger in one pass and falls back to fixed-size chunks
//! when the bulk read fails on an allocation error. Column dtypes are pinned
//! up front so schema inference cannot drift between chunks.

use anyhow::{ensure, Context, Result};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Rows per chunk when falling back to chunked reading
pub const DEFAULT_CHUNK_ROWS: usize = 300_000;

/// How a ledger ended up in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Single bulk read
    Bulk,
    /// Chunked fallback after the bulk read hit an allocation failure
    Chunked,
}

/// Column dtypes pinned before reading, keyed by header name.
/// Columns are matched by name, so ledger column order does not matter,
/// and extra columns in the file keep their inferred dtypes.
pub fn transaction_schema() -> Schema {
    let mut schema = Schema::default();
    schema.with_column("step".into(), DataType::Int32);
    schema.with_column("type".into(), DataType::String);
    schema.with_column("amount".into(), DataType::Float64);
    schema.with_column("nameOrig".into(), DataType::String);
    schema.with_column("oldbalanceOrg".into(), DataType::Float64);
    schema.with_column("newbalanceOrig".into(), DataType::Float64);
    schema.with_column("nameDest".into(), DataType::String);
    schema.with_column("oldbalanceDest".into(), DataType::Float64);
    schema.with_column("newbalanceDest".into(), DataType::Float64);
    schema.with_column("isFraud".into(), DataType::Int8);
    schema.with_column("isFlaggedFraud".into(), DataType::Int8);
    schema
}

fn csv_scan(path: &Path, infer_schema_length: usize) -> LazyCsvReader {
    // 0 means scan the whole file for inference, matching the CLI contract
    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    LazyCsvReader::new(path)
        .with_infer_schema_length(infer)
        .with_dtype_overwrite(Some(Arc::new(transaction_schema())))
}

/// Load the full ledger in a single read
pub fn load_transactions(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let df = csv_scan(path, infer_schema_length)
        .finish()
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?;

    Ok(df)
}

/// Load the ledger in fixed-size row chunks and stack them into one table.
///
/// Each chunk is read with low_memory set so the reader trades speed for a
/// smaller peak allocation. The final table still has to fit in memory.
pub fn load_transactions_chunked(
    path: &Path,
    infer_schema_length: usize,
    chunk_rows: usize,
) -> Result<DataFrame> {
    ensure!(chunk_rows > 0, "chunk size must be at least 1 row");

    let mut table = read_chunk(path, infer_schema_length, 0, chunk_rows)?;

    if table.height() == chunk_rows {
        loop {
            let offset = table.height();
            let chunk = read_chunk(path, infer_schema_length, offset, chunk_rows)?;
            let last = chunk.height() < chunk_rows;

            if chunk.height() > 0 {
                table
                    .vstack_mut(&chunk)
                    .with_context(|| format!("Failed to stack chunk at row {}", offset))?;
            }
            if last {
                break;
            }
        }
        table.as_single_chunk_par();
    }

    Ok(table)
}

fn read_chunk(
    path: &Path,
    infer_schema_length: usize,
    offset: usize,
    chunk_rows: usize,
) -> Result<DataFrame> {
    let df = csv_scan(path, infer_schema_length)
        .with_skip_rows_after_header(offset)
        .with_n_rows(Some(chunk_rows))
        .with_low_memory(true)
        .finish()
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?
        .collect()
        .with_context(|| {
            format!(
                "Failed to read rows {}..{} of {}",
                offset,
                offset + chunk_rows,
                path.display()
            )
        })?;

    Ok(df)
}

/// Bulk read with a chunked retry when the bulk read exhausts memory.
///
/// Only allocation-flavored errors trigger the retry; parse errors and
/// missing files propagate unchanged. A hard OOM kill happens below the
/// process and never reaches this check, so the retry only fires when the
/// allocator itself reports the failure.
pub fn load_with_fallback(
    path: &Path,
    infer_schema_length: usize,
    chunk_rows: usize,
) -> Result<(DataFrame, LoadMode)> {
    match load_transactions(path, infer_schema_length) {
        Ok(df) => Ok((df, LoadMode::Bulk)),
        Err(err) if is_allocation_failure(&err) => {
            let df = load_transactions_chunked(path, infer_schema_length, chunk_rows)
                .context("Chunked retry after out-of-memory bulk read failed")?;
            Ok((df, LoadMode::Chunked))
        }
        Err(err) => Err(err),
    }
}

fn is_allocation_failure(err: &anyhow::Error) -> bool {
    let message = format!("{:#}", err).to_lowercase();
    message.contains("memory") || message.contains("alloc")
}

//! Receipt Export Loading
//!
//! The analyze path works from a warehouse export: a JSON array of receipt
//! rows, one object per receipt, matching the per-receipt detail query's
//! output columns.

use anyhow::Context;
use corlift_warehouse::ReceiptRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load a receipt export from a JSON file.
pub fn load_receipts(path: &Path) -> anyhow::Result<Vec<ReceiptRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open receipt export {}", path.display()))?;
    parse_receipts(BufReader::new(file))
        .with_context(|| format!("failed to parse receipt export {}", path.display()))
}

/// Parse a receipt export from any reader.
pub fn parse_receipts(reader: impl Read) -> Result<Vec<ReceiptRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}

//! JSON output formatting

use super::RunSummary;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a run summary to `output_path`
pub fn write_summary(output_path: &Path, summary: &RunSummary, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;
    let writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(writer, summary)?;
    } else {
        serde_json::to_writer(writer, summary)?;
    }

    Ok(())
}

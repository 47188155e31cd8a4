//! Copy command implementation.

use super::{CliError, CliResult, OutputFormat};
use bufstream_core::{copy, parse_mode, CopyStats, Stream, StreamConfig};
use std::path::Path;
use tracing::info;

/// Runs the copy command.
pub fn run(
    src: &Path,
    dst: &Path,
    limit: Option<u64>,
    format: OutputFormat,
    config: StreamConfig,
) -> CliResult<()> {
    let stats = copy_file(src, dst, limit, config)?;
    info!(?src, ?dst, read = stats.read, written = stats.written, "copy finished");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("Read:    {} bytes", stats.read);
            println!("Written: {} bytes", stats.written);
        }
    }

    if stats.is_complete() {
        Ok(())
    } else {
        Err(CliError::ShortWrite {
            read: stats.read,
            written: stats.written,
        })
    }
}

/// Copies `src` into a truncated `dst` and closes both streams.
pub fn copy_file(
    src: &Path,
    dst: &Path,
    limit: Option<u64>,
    config: StreamConfig,
) -> CliResult<CopyStats> {
    let mut input = Stream::open_with(src, &parse_mode("r")?.to_open_options(), config)?;
    let mut output = Stream::open_with(dst, &parse_mode("w")?.to_open_options(), config)?;

    let stats = copy(&mut input, &mut output, limit)?;
    output.close()?;
    input.close()?;
    Ok(stats)
}

//! Inspect command implementation.

use super::{CliResult, OutputFormat};
use bufstream_core::{parse_mode, Stream, StreamConfig};
use serde::Serialize;
use std::io::SeekFrom;
use std::path::Path;

/// File inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// File path.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Stream buffer capacity in bytes.
    pub buffer_size: usize,
    /// Bytes a single readahead fetched from the start of the file.
    pub prefetched: usize,
    /// Number of newline bytes.
    pub lines: u64,
    /// Number of reads issued while scanning the file.
    pub reads: u64,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: OutputFormat, config: StreamConfig) -> CliResult<()> {
    let result = inspect(path, config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text_output(&result),
    }
    Ok(())
}

/// Collects statistics about the file at `path`.
pub fn inspect(path: &Path, config: StreamConfig) -> CliResult<InspectResult> {
    let mut stream = Stream::open_with(path, &parse_mode("r")?.to_open_options(), config)?;

    let size = stream.seek(SeekFrom::End(0))?;
    stream.rewind()?;
    stream.readahead(config.buffer_size)?;
    let prefetched = stream.buffered_read_len();

    let mut lines = 0u64;
    let mut reads = 0u64;
    let mut chunk = [0u8; 256];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        reads += 1;
        lines += chunk[..n].iter().filter(|&&b| b == b'\n').count() as u64;
    }
    stream.close()?;

    Ok(InspectResult {
        path: path.display().to_string(),
        size,
        buffer_size: config.buffer_size,
        prefetched,
        lines,
        reads,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("File: {}", result.path);
    println!();
    println!("Size:        {} bytes", result.size);
    println!("Buffer size: {} bytes", result.buffer_size);
    println!("Prefetched:  {} bytes", result.prefetched);
    println!("Lines:       {}", result.lines);
    println!("Reads:       {}", result.reads);
}

//! Demo command implementation.
//!
//! Writes "Hello" 100 times through one stream, closes it, then reads the
//! result back through a fresh one.

use super::{CliError, CliResult};
use bufstream_core::{parse_mode, MemoryBackend, Stream, StreamConfig, StreamResult};
use std::path::Path;
use tracing::info;

const GREETING: &[u8] = b"Hello";
const REPEAT: usize = 100;

/// Runs the demo command against `path`, or in memory when `None`.
pub fn run(path: Option<&Path>, config: StreamConfig) -> CliResult<()> {
    let text = match path {
        Some(path) => {
            let writer = Stream::open_with(path, &parse_mode("w")?.to_open_options(), config)?;
            let read_options = parse_mode("r")?.to_open_options();
            round_trip(writer, || Stream::open_with(path, &read_options, config))?
        }
        None => {
            let backend = MemoryBackend::new();
            let writer = Stream::memory(backend.reopen(), config)?;
            round_trip(writer, move || Stream::memory(backend.reopen(), config))?
        }
    };

    info!(bytes = text.len(), "demo finished");
    println!("{}", String::from_utf8_lossy(&text));
    println!("Read back {} bytes", text.len());
    Ok(())
}

/// Writes the greeting through `writer`, closes it and reads everything
/// back through the stream returned by `reopen`.
pub fn round_trip<F>(mut writer: Stream, reopen: F) -> CliResult<Vec<u8>>
where
    F: FnOnce() -> StreamResult<Stream>,
{
    for _ in 0..REPEAT {
        writer.write(GREETING)?;
    }
    writer.close()?;

    let mut reader = reopen()?;
    let mut text = vec![0u8; GREETING.len() * REPEAT];
    let mut done = 0;
    while done < text.len() {
        let n = reader.read(&mut text[done..])?;
        if n == 0 {
            break;
        }
        done += n;
    }
    reader.close()?;

    if done != text.len() {
        return Err(CliError::Mismatch {
            expected: text.len(),
            actual: done,
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_round_trip() {
        let backend = MemoryBackend::new();
        let writer = Stream::memory(backend.reopen(), StreamConfig::new().buffer_size(16)).unwrap();
        let text = round_trip(writer, || Stream::memory(backend.reopen(), StreamConfig::default())).unwrap();
        assert_eq!(text, GREETING.repeat(REPEAT));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.txt");
        run(Some(&path), StreamConfig::default()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), 500);
    }
}

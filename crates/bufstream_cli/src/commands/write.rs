//! Write command implementation.

use super::CliResult;
use bufstream_core::{parse_mode, Stream, StreamConfig};
use std::path::Path;
use tracing::info;

/// Runs the write command.
pub fn run(
    path: &Path,
    text: &str,
    repeat: usize,
    append: bool,
    config: StreamConfig,
) -> CliResult<()> {
    let total = write_repeated(path, text.as_bytes(), repeat, append, config)?;
    info!(?path, bytes = total, "write finished");
    println!("Wrote {} bytes to {}", total, path.display());
    Ok(())
}

/// Writes `data` `repeat` times and closes the file, returning the byte
/// count.
pub fn write_repeated(
    path: &Path,
    data: &[u8],
    repeat: usize,
    append: bool,
    config: StreamConfig,
) -> CliResult<u64> {
    let options = parse_mode(if append { "a" } else { "w" })?.to_open_options();
    let mut stream = Stream::open_with(path, &options, config)?;

    let mut total = 0u64;
    for _ in 0..repeat {
        let n = stream.write(data)?;
        total += n as u64;
        if n < data.len() {
            break;
        }
    }
    stream.close()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_repeated_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let n = write_repeated(&path, b"ab", 3, false, StreamConfig::new().buffer_size(4)).unwrap();
        assert_eq!(n, 6);
        assert_eq!(std::fs::read(&path).unwrap(), b"ababab");
    }

    #[test]
    fn append_keeps_existing_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"start-").unwrap();

        write_repeated(&path, b"end", 1, true, StreamConfig::default()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"start-end");
    }
}

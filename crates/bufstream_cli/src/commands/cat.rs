//! Cat command implementation.

use super::CliResult;
use bufstream_core::{parse_mode, Stream, StreamConfig, DEFAULT_BUFFER_SIZE};
use std::io::{self, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// Runs the cat command.
pub fn run(path: &Path, offset: u64, config: StreamConfig) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let total = cat_to(path, offset, config, &mut out)?;
    out.flush()?;
    debug!(?path, bytes = total, "cat finished");
    Ok(())
}

/// Streams the file at `path` from `offset` into `out`.
pub fn cat_to(path: &Path, offset: u64, config: StreamConfig, out: &mut impl Write) -> CliResult<u64> {
    let mut stream = Stream::open_with(path, &parse_mode("r")?.to_open_options(), config)?;
    if offset > 0 {
        stream.seek(SeekFrom::Start(offset))?;
    }

    let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    stream.close()?;
    Ok(total)
}

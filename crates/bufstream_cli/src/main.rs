//! bufstream CLI
//!
//! Command-line tools for exercising buffered streams.
//!
//! # Commands
//!
//! - `write` - Write text to a file, optionally repeated
//! - `cat` - Stream a file to stdout
//! - `copy` - Copy one file into another through two streams
//! - `demo` - Write "Hello" 100 times, reopen and read it back
//! - `inspect` - Show file size and buffering statistics

mod commands;

use clap::{Parser, Subcommand};
use commands::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// bufstream command-line tools.
#[derive(Parser)]
#[command(name = "bufstream")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Stream buffer size in bytes (0 disables buffering)
    #[arg(global = true, short, long, default_value_t = bufstream_core::DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write text to a file
    Write {
        /// Destination file
        path: PathBuf,

        /// Text to write
        text: String,

        /// Number of times to write the text
        #[arg(short, long, default_value = "1")]
        repeat: usize,

        /// Append instead of truncating
        #[arg(short, long)]
        append: bool,
    },

    /// Stream a file to stdout
    Cat {
        /// File to read
        path: PathBuf,

        /// Start reading at this offset
        #[arg(short, long, default_value = "0")]
        offset: u64,
    },

    /// Copy a file through two streams
    Copy {
        /// Source file
        src: PathBuf,

        /// Destination file (truncated)
        dst: PathBuf,

        /// Copy at most this many bytes
        #[arg(short, long)]
        limit: Option<u64>,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write "Hello" 100 times, reopen and read it back
    Demo {
        /// Use this file instead of an in-memory backend
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Show file size and buffering statistics
    Inspect {
        /// File to inspect
        path: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = bufstream_core::StreamConfig::new().buffer_size(cli.buffer_size);

    match cli.command {
        Commands::Write {
            path,
            text,
            repeat,
            append,
        } => {
            commands::write::run(&path, &text, repeat, append, config)?;
        }
        Commands::Cat { path, offset } => {
            commands::cat::run(&path, offset, config)?;
        }
        Commands::Copy {
            src,
            dst,
            limit,
            format,
        } => {
            commands::copy::run(&src, &dst, limit, format, config)?;
        }
        Commands::Demo { path } => {
            commands::demo::run(path.as_deref(), config)?;
        }
        Commands::Inspect { path, format } => {
            commands::inspect::run(&path, format, config)?;
        }
        Commands::Version => {
            println!("bufstream CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("bufstream core v{}", bufstream_core::VERSION);
        }
    }

    Ok(())
}

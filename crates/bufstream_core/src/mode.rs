//! fopen-style mode strings.
//!
//! `"r"`, `"w"` and `"a"`, optionally followed by `+` (read and write),
//! `b` (accepted and ignored, there is no text mode) and `x` (fail if the
//! file exists) in any order.

use crate::error::{StreamError, StreamResult};
use std::fs::OpenOptions;

/// How a file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    /// Open for reading.
    pub readable: bool,
    /// Open for writing.
    pub writable: bool,
    /// Every write goes to the end of the file.
    pub append: bool,
    /// Truncate an existing file to zero length.
    pub truncate: bool,
    /// Create the file if it does not exist.
    pub create: bool,
    /// Fail if the file already exists.
    pub exclusive: bool,
}

impl OpenFlags {
    /// Converts the flags into [`OpenOptions`].
    #[must_use]
    pub fn to_open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options
            .read(self.readable)
            .write(self.writable && !self.append)
            .append(self.append)
            .truncate(self.truncate);
        if self.exclusive {
            options.create_new(true);
        } else {
            options.create(self.create);
        }
        options
    }
}

/// Parses a mode string such as `"r"`, `"w+"`, `"rb"` or `"a+x"`.
///
/// # Errors
///
/// Returns [`StreamError::InvalidMode`] for an empty string, an unknown base
/// mode or an unknown modifier.
pub fn parse_mode(mode: &str) -> StreamResult<OpenFlags> {
    let invalid = || StreamError::InvalidMode(mode.to_string());
    let mut chars = mode.chars();
    let mut flags = OpenFlags::default();

    match chars.next().ok_or_else(invalid)? {
        'r' => {
            flags.readable = true;
        }
        'w' => {
            flags.writable = true;
            flags.create = true;
            flags.truncate = true;
        }
        'a' => {
            flags.writable = true;
            flags.create = true;
            flags.append = true;
        }
        _ => return Err(invalid()),
    }

    for modifier in chars {
        match modifier {
            '+' => {
                flags.readable = true;
                flags.writable = true;
            }
            'b' => {}
            'x' => flags.exclusive = true,
            _ => return Err(invalid()),
        }
    }

    Ok(flags)
}

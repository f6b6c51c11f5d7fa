//! Document sources and sinks: standard streams or files.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::CliError;

/// Placeholder argument meaning "use the standard stream".
pub const STREAM_PLACEHOLDER: &str = "-";

/// Where a document is read from or written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Standard input or standard output.
    Stream,
    /// A file on disk.
    File(PathBuf),
}

impl Location {
    /// Interpret a positional argument; missing or `-` means the stream.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != STREAM_PLACEHOLDER => Self::File(path.to_path_buf()),
            _ => Self::Stream,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => f.write_str("<stdio>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read the whole document.
pub fn read_source(location: &Location) -> Result<String, CliError> {
    let result = match location {
        Location::Stream => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map(|_| text)
        }
        Location::File(path) => fs::read_to_string(path),
    };

    result.map_err(|source| CliError::Read {
        location: location.clone(),
        source,
    })
}

/// Write the whole document.
///
/// Files are written to a temporary sibling and renamed over the target, so
/// a failed run never leaves a truncated file behind.
pub fn write_sink(location: &Location, text: &str) -> Result<(), CliError> {
    let result = match location {
        Location::Stream => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
        }
        Location::File(path) => write_atomic(path, text),
    };

    result.map_err(|source| CliError::Write {
        location: location.clone(),
        source,
    })
}

fn write_atomic(path: &Path, text: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;

    debug!(path = %path.display(), bytes = text.len(), "Wrote document");
    Ok(())
}

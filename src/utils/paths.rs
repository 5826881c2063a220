use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::dom::Snapshot;

// Maximum snapshot size: 50MB
const MAX_SNAPSHOT_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Path argument meaning "read from standard input"
pub const STDIN_PATH: &str = "-";

/// On-disk representation of a captured tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Serialized node dump, see [`Snapshot::from_json`]
    Json,
    /// Saved page markup, see [`Snapshot::from_html`]
    Html,
}

impl SnapshotFormat {
    /// `.json` files (any case) are node dumps; everything else, stdin included, is HTML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Html,
        }
    }
}

/// Validates that a file's size is within acceptable limits (50MB)
///
/// Takes an open file handle so the checked file is the one subsequently read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 50MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_SNAPSHOT_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_SNAPSHOT_SIZE_BYTES
        );
    }

    Ok(())
}

/// Read a snapshot from `path`, or from stdin when the path is `-`
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, exceeds the size limit, or (for
/// JSON dumps) does not describe a node tree.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let input = if path.as_os_str() == STDIN_PATH {
        read_limited(io::stdin().lock(), path)?
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;
        validate_file_size(&file, path)?;
        read_limited(file, path)?
    };

    let format = SnapshotFormat::from_path(path);
    debug!(path = %path.display(), ?format, bytes = input.len(), "Loaded snapshot input");

    match format {
        SnapshotFormat::Json => Snapshot::from_json(&input)
            .with_context(|| format!("Invalid snapshot JSON: {}", path.display())),
        SnapshotFormat::Html => Ok(Snapshot::from_html(&input)),
    }
}

/// Read at most the size limit; streams without metadata (stdin) are checked here
fn read_limited(reader: impl Read, path: &Path) -> Result<String> {
    let mut input = String::new();
    reader
        .take(MAX_SNAPSHOT_SIZE_BYTES + 1)
        .read_to_string(&mut input)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

    if input.len() as u64 > MAX_SNAPSHOT_SIZE_BYTES {
        bail!("Input too large: {} (max {} bytes)", path.display(), MAX_SNAPSHOT_SIZE_BYTES);
    }

    Ok(input)
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

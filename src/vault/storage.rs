//! Reading and atomically replacing the vault file on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{PwVaultError, Result};

/// Read the raw envelope bytes from `path`.
pub fn read_envelope(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(PwVaultError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write `bytes` to `path` **atomically**.
///
/// 1. Write to a temp file in the same directory.
/// 2. Flush it to disk.
/// 3. Rename the temp file over the target path.
///
/// A crash or error before the rename leaves the previous vault intact.
pub fn write_envelope(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path);

    let result = write_synced(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        // Best effort: the temp file is garbage either way.
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!(path = %path.display(), len = bytes.len(), "vault written");
    Ok(())
}

/// Sibling temp path: `dir/.name.tmp`.  Same directory, so the rename
/// stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = create_private(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Create a fresh file readable only by its owner.
///
/// A temp file left by an interrupted save is removed first: the mode
/// only applies to newly created files, so reusing it would keep
/// whatever permissions it had.
fn create_private(path: &Path) -> std::io::Result<File> {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed stale temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

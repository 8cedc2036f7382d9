//! Atomic file writes.
//!
//! Every artifact (PNG images and the manifest) is written to a hidden
//! sibling temp file and renamed into place, so a reader never observes a
//! half-written file and an aborted build leaves the previous artifact intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Hidden temp sibling for `path`: `dir/name.png` → `dir/.name.png.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `contents` to `path` via temp file + rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

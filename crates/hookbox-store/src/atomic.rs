// ABOUTME: Crash-safe whole-file replacement used for every collection write.
// ABOUTME: Writes to a sibling .tmp file, fsyncs, renames over the target, then fsyncs the directory.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling path used as the staging file for `path`.
pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `bytes` atomically. Readers see either the previous
/// contents or the new contents, never a truncated file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = tmp_path_for(path);

    let result = File::create(&tmp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    // Fsync the parent directory so the rename itself is durable.
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    tolerate_unsupported_sync(File::open(parent).and_then(|dir| dir.sync_all()))?;

    Ok(())
}

/// Some filesystems reject fsync on a directory handle. Treat that as a
/// no-op and pass every other failure through.
fn tolerate_unsupported_sync(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if matches!(e.kind(), io::ErrorKind::Unsupported | io::ErrorKind::InvalidInput) => {
            tracing::debug!("directory fsync not supported: {}", e);
            Ok(())
        }
        other => other,
    }
}

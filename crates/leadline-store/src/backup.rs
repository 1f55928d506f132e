use crate::error::{Result, StoreError};
use crate::paths;
use rusqlite::backup::Backup;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Copy in modest slices so readers of the live database stay unblocked
// while a backup runs.
const PAGES_PER_STEP: i32 = 200;
const PAUSE_BETWEEN_STEPS: Duration = Duration::from_millis(25);

/// Online backup of the open database into `path`. The live database, its
/// WAL/SHM sidecars, and any hardlinked alias of them are refused as
/// targets: a backup into its own source truncates the lead data it is
/// copying.
pub fn backup_to(conn: &Connection, path: &Path) -> Result<()> {
    paths::ensure_parent_dir(path)?;
    let target = resolve_target(path)?;
    for protected in protected_paths(conn)? {
        if target == protected || same_inode(&target, &protected)? {
            return Err(StoreError::InvalidBackupPath(path.to_path_buf()));
        }
    }
    let mut dest = Connection::open(&target)?;
    Backup::new(conn, &mut dest)?.run_to_completion(PAGES_PER_STEP, PAUSE_BETWEEN_STEPS, None)?;
    paths::restrict_file_permissions(&target)?;
    Ok(())
}

/// The live database path as SQLite reports it, plus its journal sidecars.
/// Empty for an in-memory database, which has nothing on disk to protect.
fn protected_paths(conn: &Connection) -> Result<Vec<PathBuf>> {
    let file: String = conn.query_row(
        "SELECT file FROM pragma_database_list WHERE name = 'main';",
        [],
        |row| row.get(0),
    )?;
    if file.is_empty() {
        return Ok(Vec::new());
    }
    let live = resolve_target(Path::new(&file))?;
    let sidecar = |suffix: &str| {
        let mut name = live.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };
    Ok(vec![sidecar("-wal"), sidecar("-shm"), live])
}

/// Canonicalizes as far as the filesystem allows: the file itself when it
/// exists, otherwise its parent directory plus the final component.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::canonicalize(dir)?,
        _ => fs::canonicalize(Path::new("."))?,
    };
    let name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidBackupPath(path.to_path_buf()))?;
    Ok(parent.join(name))
}

#[cfg(unix)]
fn same_inode(a: &Path, b: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    let (a, b) = match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => (a, b),
        // Either side missing means they cannot be the same file.
        _ => return Ok(false),
    };
    Ok(a.dev() == b.dev() && a.ino() == b.ino())
}

#[cfg(not(unix))]
fn same_inode(_a: &Path, _b: &Path) -> Result<bool> {
    Ok(false)
}

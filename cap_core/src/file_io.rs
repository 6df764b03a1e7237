//! # Session Files
//!
//! Sessions are saved as `.pcap` files containing pretty JSON.
//!
//! - Saves are atomic: write to `.pcap.tmp`, sync, re-read, rename.
//! - A `.pcap.lock` sidecar holds an OS-level exclusive lock plus a note of
//!   who holds it, so a second user opening the file gets it read-only.
//! - Loading validates the schema version.
//!
//! ```rust,no_run
//! use cap_core::file_io::{save_session, SessionLock};
//! use cap_core::session::DesignSession;
//! use std::path::Path;
//!
//! let session = DesignSession::new("Engineer", "25-001", "Client");
//! let path = Path::new("pier3.pcap");
//!
//! let lock = SessionLock::acquire(path, "engineer")?;
//! save_session(&session, path)?;
//! drop(lock);
//! # Ok::<(), cap_core::errors::CapError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CapError, CapResult};
use crate::session::{DesignSession, SCHEMA_VERSION};

pub const SESSION_EXTENSION: &str = "pcap";

/// Locks older than this are ignored.
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.pcap.lock` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// "user (machine)", as shown to whoever is locked out.
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }

    fn is_stale(&self) -> bool {
        if (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS {
            return true;
        }
        // Same machine and the process is gone
        hostname().is_some_and(|ours| ours == self.machine) && !process_alive(self.pid)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive edit lock on a session file, released on drop.
#[derive(Debug)]
pub struct SessionLock {
    session_path: PathBuf,
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl SessionLock {
    /// Take the lock for `path`, or fail with `FileLocked` naming the holder.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CapResult<Self> {
        if let Some(existing) = SessionLock::check(path) {
            return Err(CapError::file_locked(
                path.display().to_string(),
                existing.holder(),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let lock_path = lock_path_for(path);
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CapError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CapError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info)?;
        lock_file
            .write_all(json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CapError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "session lock acquired");
        Ok(SessionLock {
            session_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current live lock on `path`, if any.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(lock_path_for(path)).ok()?;
        let info: LockInfo = serde_json::from_str(&contents).ok()?;
        (!info.is_stale()).then_some(info)
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    path.with_extension(extension)
}

/// Path with the `.pcap` extension added when it has none.
pub fn with_session_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(SESSION_EXTENSION)
    }
}

/// Atomically write `session` to `path`.
pub fn save_session(session: &DesignSession, path: &Path) -> CapResult<()> {
    let json = serde_json::to_string_pretty(session)?;
    let tmp_path = path.with_extension(format!("{}.tmp", SESSION_EXTENSION));
    let tmp_display = tmp_path.display().to_string();

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| CapError::file_error("create temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CapError::file_error("write temp file", &tmp_display, e.to_string()))?;
    drop(tmp_file);

    let written = fs::read_to_string(&tmp_path).map_err(|e| CapError::file_error("verify temp file", &tmp_display, e.to_string()))?;
    if written != json {
        let _ = fs::remove_file(&tmp_path);
        return Err(CapError::file_error("verify temp file", tmp_display, "contents differ after write"));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CapError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), job = %session.meta.job_id, "session saved");
    Ok(())
}

pub fn load_session(path: &Path) -> CapResult<DesignSession> {
    let contents =
        fs::read_to_string(path).map_err(|e| CapError::file_error("read", path.display().to_string(), e.to_string()))?;

    let session: DesignSession = serde_json::from_str(&contents).map_err(|e| CapError::Serialization {
        reason: format!("Invalid session file {}: {}", path.display(), e),
    })?;
    validate_version(&session.meta.version)?;

    tracing::info!(path = %path.display(), job = %session.meta.job_id, "session loaded");
    Ok(session)
}

/// Load a session along with any live lock another user holds on it.
pub fn load_session_with_lock_check(path: &Path) -> CapResult<(DesignSession, Option<LockInfo>)> {
    let session = load_session(path)?;
    Ok((session, SessionLock::check(path)))
}

/// Major versions must match; while on 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> CapResult<()> {
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(|p| p.parse::<u32>().ok());
        Some((parts.next()??, parts.next().flatten().unwrap_or(0)))
    };
    let mismatch = || CapError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;
    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

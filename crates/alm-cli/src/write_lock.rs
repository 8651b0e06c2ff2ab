//! Project-wide lock held by commands that rewrite collection files.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use alm_config::PROJECT_DIR;

const LOCK_FILE: &str = "write.lock";
const WAIT_LIMIT: Duration = Duration::from_secs(60);
const RETRY_EVERY: Duration = Duration::from_millis(250);

/// Removes the lock file when dropped.
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Block until this process owns `.almanac/write.lock`.
///
/// A lock left behind by a dead process is removed; a live holder is waited
/// on for up to [`WAIT_LIMIT`].
pub fn acquire_for_project(project_root: &Path) -> anyhow::Result<WriteLockGuard> {
    let lock_path = project_root.join(PROJECT_DIR).join(LOCK_FILE);
    let deadline = Instant::now() + WAIT_LIMIT;

    loop {
        let holder = match try_acquire(&lock_path) {
            Ok(guard) => {
                tracing::debug!(path = %lock_path.display(), "acquired write lock");
                return Ok(guard);
            }
            Err(LockState::Stale(pid)) => {
                tracing::warn!(pid, path = %lock_path.display(), "removing write lock left by a dead process");
                let _ = std::fs::remove_file(&lock_path);
                continue;
            }
            Err(LockState::HeldBy(pid)) => Some(pid),
            Err(LockState::Unknown) => None,
        };

        if Instant::now() >= deadline {
            match holder {
                Some(pid) => anyhow::bail!(
                    "dataset is being rewritten by another alm process (pid {pid}); retry once it exits"
                ),
                None => anyhow::bail!(
                    "write lock {} is unreadable; delete it if no alm process is running",
                    lock_path.display()
                ),
            }
        }
        std::thread::sleep(RETRY_EVERY);
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(u32),
    Stale(u32),
    Unknown,
}

fn try_acquire(lock_path: &Path) -> Result<WriteLockGuard, LockState> {
    if let Some(dir) = lock_path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }

    let created = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path);
    match created {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(match read_holder(lock_path) {
                Some(pid) if is_alive(pid) => LockState::HeldBy(pid),
                Some(pid) => LockState::Stale(pid),
                None => LockState::Unknown,
            })
        }
        Err(_) => Err(LockState::Unknown),
    }
}

/// Pid recorded in an existing lock file.
fn read_holder(lock_path: &Path) -> Option<u32> {
    let mut contents = String::new();
    std::fs::File::open(lock_path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .ok()?;
    contents.trim().parse().ok()
}

fn is_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

//! All-or-nothing publication of a rendered snapshot.
//!
//! Modules are written into a staging directory next to the output
//! directory, which is then swapped in. On Linux an existing output is
//! exchanged with the staging directory in one `renameat2(RENAME_EXCHANGE)`
//! call, so the output path never disappears. Elsewhere, or when the
//! filesystem refuses the exchange, renames are used:
//!
//! 1. `output` → `.output.previous` (if it exists)
//! 2. staging → `output`
//! 3. remove `.output.previous`
//!
//! If step 2 fails the previous directory is renamed back. Readers therefore
//! see either the complete old snapshot or the complete new one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{debug_event, log_event};

use super::error::{WriteError, WriteResult};
use super::module::RenderedModule;

/// Result of a successful [`CacheWriter::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { modules: usize },
    /// Rendered modules matched the published ones byte for byte.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct CacheWriter {
    output: PathBuf,
}

impl CacheWriter {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn write(&self, modules: &[RenderedModule]) -> WriteResult<WriteOutcome> {
        if self.is_current(modules) {
            debug_event!("cache", "unchanged", "{}", self.output.display());
            return Ok(WriteOutcome::Unchanged);
        }

        let parent = self
            .output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent).map_err(|source| WriteError::Staging {
            path: parent.clone(),
            source,
        })?;

        let staging = tempfile::Builder::new()
            .prefix(".docgen-staging-")
            .tempdir_in(&parent)
            .map_err(|source| WriteError::Staging {
                path: parent.clone(),
                source,
            })?;

        for module in modules {
            let path = staging.path().join(module.file_name());
            fs::write(&path, &module.contents).map_err(|source| WriteError::WriteFile { path, source })?;
        }

        // From here the staging directory must outlive the TempDir guard
        let staged = staging.keep();
        if let Err(e) = self.publish(&staged) {
            if let Err(cleanup) = fs::remove_dir_all(&staged) {
                log_event!("cache", "staging cleanup failed", "{}: {cleanup}", staged.display());
            }
            return Err(e);
        }

        debug_event!("cache", "published", "{} modules to {}", modules.len(), self.output.display());
        Ok(WriteOutcome::Written {
            modules: modules.len(),
        })
    }

    fn publish(&self, staged: &Path) -> WriteResult<()> {
        let publish_error = |source| WriteError::Publish {
            path: self.output.clone(),
            source,
        };

        let backup = self.backup_path();
        if backup.exists() {
            // left behind by an interrupted run
            fs::remove_dir_all(&backup).map_err(publish_error)?;
        }

        let had_previous = self.output.exists();
        if had_previous {
            match exchange(staged, &self.output) {
                Ok(()) => {
                    // the staging path now holds the previous snapshot
                    if let Err(e) = fs::remove_dir_all(staged) {
                        log_event!("cache", "previous cleanup failed", "{}: {e}", staged.display());
                    }
                    return Ok(());
                }
                Err(e) => debug_event!("cache", "exchange unavailable", "{e}"),
            }

            fs::rename(&self.output, &backup).map_err(publish_error)?;
        }

        if let Err(source) = fs::rename(staged, &self.output) {
            if had_previous && let Err(restore) = fs::rename(&backup, &self.output) {
                log_event!(
                    "cache",
                    "restore failed",
                    "previous snapshot left at {}: {restore}",
                    backup.display()
                );
            }
            return Err(publish_error(source));
        }

        if had_previous && let Err(e) = fs::remove_dir_all(&backup) {
            log_event!("cache", "backup cleanup failed", "{}: {e}", backup.display());
        }
        Ok(())
    }

    /// True when every module already exists on disk with identical contents
    /// and no other module files are present.
    fn is_current(&self, modules: &[RenderedModule]) -> bool {
        let Ok(entries) = fs::read_dir(&self.output) else {
            return false;
        };
        let on_disk = entries.filter_map(Result::ok).count();
        on_disk == modules.len()
            && modules.iter().all(|module| {
                fs::read_to_string(self.output.join(module.file_name()))
                    .is_ok_and(|existing| existing == module.contents)
            })
    }

    fn backup_path(&self) -> PathBuf {
        let name = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        self.output.with_file_name(format!(".{name}.previous"))
    }
}

/// Atomically swap two existing directories.
#[cfg(target_os = "linux")]
fn exchange(from: &Path, to: &Path) -> std::io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = |p: &Path| {
        CString::new(p.as_os_str().as_bytes())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    };
    let from = c_path(from)?;
    let to = c_path(to)?;
    // SAFETY: both pointers come from live CStrings and AT_FDCWD needs no descriptor.
    let rc = unsafe {
        libc::renameat2(
            libc::AT_FDCWD,
            from.as_ptr(),
            libc::AT_FDCWD,
            to.as_ptr(),
            libc::RENAME_EXCHANGE,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(target_os = "linux"))]
fn exchange(_from: &Path, _to: &Path) -> std::io::Result<()> {
    Err(std::io::ErrorKind::Unsupported.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module(name: &'static str, contents: &str) -> RenderedModule {
        RenderedModule {
            name,
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_write_then_unchanged() {
        let temp = TempDir::new().unwrap();
        let writer = CacheWriter::new(temp.path().join(".data"));
        let modules = vec![module("hooks", "export const allHooks = []\n")];

        assert_eq!(writer.write(&modules).unwrap(), WriteOutcome::Written { modules: 1 });
        assert_eq!(writer.write(&modules).unwrap(), WriteOutcome::Unchanged);
        assert_eq!(
            fs::read_to_string(temp.path().join(".data/hooks.ts")).unwrap(),
            "export const allHooks = []\n"
        );
    }

    #[test]
    fn test_replaces_previous_snapshot_wholesale() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join(".data");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.ts"), "old").unwrap();

        let writer = CacheWriter::new(&output);
        writer.write(&[module("utils", "new")]).unwrap();

        assert!(!output.join("stale.ts").exists());
        assert_eq!(fs::read_to_string(output.join("utils.ts")).unwrap(), "new");
        // no staging or backup directories left behind
        let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().filter_map(Result::ok).collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_keeps_previous_output() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let parent = temp.path().join("site");
        let output = parent.join(".data");
        let writer = CacheWriter::new(&output);
        writer.write(&[module("hooks", "v1")]).unwrap();

        // a read-only parent makes staging impossible
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o555)).unwrap();
        let result = writer.write(&[module("hooks", "v2")]);
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();

        // running as root bypasses permission checks
        if result.is_err() {
            assert_eq!(fs::read_to_string(output.join("hooks.ts")).unwrap(), "v1");
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_exchange_swaps_directories() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("new.ts"), "new").unwrap();
        fs::write(b.join("old.ts"), "old").unwrap();

        exchange(&a, &b).unwrap();
        assert_eq!(fs::read_to_string(b.join("new.ts")).unwrap(), "new");
        assert_eq!(fs::read_to_string(a.join("old.ts")).unwrap(), "old");
        assert!(exchange(&a, &temp.path().join("missing")).is_err());
    }
}

use crate::error::{AutobumpError, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Whether the installed hook is stale relative to the tracked template.
///
/// A missing template means the repository does not ship one: no update.
/// A missing installed hook with a template present always installs.
pub fn self_update_needed(template: &Path, installed: &Path) -> Result<bool> {
    if !template.is_file() {
        return Ok(false);
    }
    if !installed.is_file() {
        return Ok(true);
    }

    let template_mtime = fs::metadata(template)?.modified()?;
    let installed_mtime = fs::metadata(installed)?.modified()?;
    Ok(template_mtime > installed_mtime)
}

/// Copies the template over the installed hook path and marks it executable.
pub fn install(template: &Path, installed: &Path) -> Result<()> {
    if let Some(parent) = installed.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(template, installed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(installed)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(installed, perms)?;
    }

    Ok(())
}

/// Re-invokes the freshly installed hook, delegating the rest of this
/// commit to the new version. Returns the child's exit code so the caller
/// can terminate with it.
pub fn reexec(installed: &Path) -> Result<i32> {
    let status = Command::new(installed).status().map_err(|e| {
        AutobumpError::hook(format!(
            "Failed to re-run installed hook {}: {}",
            installed.display(),
            e
        ))
    })?;

    Ok(status.code().unwrap_or(1))
}

use crate::error::{AutobumpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Whether the current environment looks like a commit started from the
/// affected IDE family.
///
/// Checks each probed environment variable's value for any of the vendor
/// name fragments, case-insensitively.
pub fn ide_session_detected(probe_env_vars: &[String], signatures: &[String]) -> bool {
    probe_env_vars
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .any(|value| matches_signature(&value, signatures))
}

/// Case-insensitive fragment match against a single value.
pub fn matches_signature(value: &str, signatures: &[String]) -> bool {
    let lowered = value.to_lowercase();
    signatures
        .iter()
        .any(|fragment| lowered.contains(&fragment.to_lowercase()))
}

/// Persisted record of an in-flight two-phase commit attempt.
///
/// Replaces the legacy bare lock file: existence still carries the one-shot
/// signal between the two hook invocations, but the content records how it
/// got there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitAttempt {
    pub attempts: u32,
}

/// The two-phase commit-attempt gate.
///
/// State lives in the system temp directory under a name derived from the
/// repository root, so two checkouts of the same project cannot collide.
pub struct AttemptGate {
    path: PathBuf,
}

/// Outcome of inspecting the gate on hook entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// No IDE signature: run normally, exit 0.
    Inactive,
    /// IDE signature, no pending attempt: run fully, then fail the commit
    /// on purpose so the IDE retries.
    FirstAttempt,
    /// IDE signature and a pending attempt: clear it and exit 0 without
    /// doing any work.
    SecondAttempt,
}

impl AttemptGate {
    /// Gate for the given repository root.
    pub fn for_repo(repo_root: &Path) -> Self {
        let canonical = repo_root
            .canonicalize()
            .unwrap_or_else(|_| repo_root.to_path_buf());

        let mut hasher = DefaultHasher::new();
        canonical.hash(&mut hasher);

        let path = std::env::temp_dir().join(format!("git-autobump-{:016x}.state", hasher.finish()));
        AttemptGate { path }
    }

    /// Where the attempt state is persisted.
    pub fn state_path(&self) -> &Path {
        &self.path
    }

    /// Whether an attempt from a previous invocation is pending.
    pub fn pending(&self) -> bool {
        self.path.is_file()
    }

    /// Records the first attempt.
    pub fn arm(&self) -> Result<()> {
        let state = CommitAttempt { attempts: 1 };
        let encoded = toml::to_string(&state)
            .map_err(|e| AutobumpError::hook(format!("Failed to encode attempt state: {}", e)))?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }

    /// Clears any pending attempt.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Decides the gate phase for this invocation.
pub fn evaluate(gate: &AttemptGate, ide_detected: bool) -> GatePhase {
    if !ide_detected {
        GatePhase::Inactive
    } else if gate.pending() {
        GatePhase::SecondAttempt
    } else {
        GatePhase::FirstAttempt
    }
}

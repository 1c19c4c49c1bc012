use crate::error::{AutobumpError, Result};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string (e.g., "1.2.3" or "v1.2.3" -> Version(1,2,3))
    ///
    /// Strict: exactly three dot-separated fields, every field a non-empty
    /// run of ASCII digits. Signs, whitespace, and extra fields are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        // Remove 'v' or 'V' prefix
        let clean = raw.trim_start_matches('v').trim_start_matches('V');

        let parts: Vec<&str> = clean.split('.').collect();
        if parts.len() != 3 {
            return Err(AutobumpError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                raw
            )));
        }

        let major = parse_component(parts[0], "major", raw)?;
        let minor = parse_component(parts[1], "minor", raw)?;
        let patch = parse_component(parts[2], "patch", raw)?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Suggested next version: patch incremented, major/minor untouched
    pub fn bump_patch(&self) -> Self {
        Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch + 1,
        }
    }
}

fn parse_component(field: &str, name: &str, raw: &str) -> Result<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AutobumpError::version(format!(
            "Invalid {} component '{}' in version '{}'",
            name, field, raw
        )));
    }
    field.parse::<u32>().map_err(|_| {
        AutobumpError::version(format!(
            "Version {} component '{}' out of range in '{}'",
            name, field, raw
        ))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Read the current version from the version source file.
///
/// Extracts the first match of `pattern` from the file and strict-parses it.
/// A missing file or a file without a match is fatal: the hook must not
/// proceed to rewrite anything.
pub fn read_version(path: &Path, pattern: &str) -> Result<Version> {
    let re = Regex::new(pattern)
        .map_err(|e| AutobumpError::config(format!("Invalid version pattern '{}': {}", pattern, e)))?;

    let content = fs::read_to_string(path).map_err(|_| {
        AutobumpError::version(format!(
            "Version source not found: {}",
            path.display()
        ))
    })?;

    let caps = re.captures(&content).ok_or_else(|| {
        AutobumpError::version(format!(
            "No version matching '{}' in {}",
            pattern,
            path.display()
        ))
    })?;

    // An explicit capture group narrows the match, e.g. a version embedded
    // in an assignment. Otherwise the whole match is the version.
    let matched = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str());
    Version::parse(matched.unwrap_or_default())
}

/// Rewrite every occurrence of `old` with `new` in the file, in place.
///
/// Returns whether any substitution happened.
pub fn rewrite_version(path: &Path, old: &Version, new: &Version) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    let old_str = old.to_string();

    if !content.contains(&old_str) {
        return Ok(false);
    }

    let updated = content.replace(&old_str, &new.to_string());
    fs::write(path, updated)?;
    Ok(true)
}

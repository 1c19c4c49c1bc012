use crate::error::Result;
use crate::git_ops::CommitInfo;
use crate::version::Version;
use std::fs;
use std::path::Path;

/// Column width for the commit subject
const SUBJECT_WIDTH: usize = 69;
/// Column width for the author name
const AUTHOR_WIDTH: usize = 15;

/// The minor version whose branch marks the start of changelog history.
///
/// Normally the current minor. When the README carries the master-tracking
/// marker (the legacy branching convention: development happens on master
/// before the minor's own branch is cut), history starts one minor back.
pub fn history_minor(version: &Version, readme: Option<&str>, marker: &str) -> u32 {
    match readme {
        Some(content) if content.contains(marker) => version.minor.saturating_sub(1),
        _ => version.minor,
    }
}

/// Instantiates the history branch name from the configured pattern.
///
/// The pattern uses `{major}` and `{minor}` placeholders, e.g.
/// `"{major}.{minor}.x"` yields `"0.14.x"`.
pub fn history_branch_name(pattern: &str, version: &Version, minor: u32) -> String {
    pattern
        .replace("{major}", &version.major.to_string())
        .replace("{minor}", &minor.to_string())
}

/// Formats one changelog line: ISO timestamp, subject (69 cols), author
/// (15 cols), abbreviated hash.
pub fn format_entry(commit: &CommitInfo) -> String {
    format!(
        "{} {} {} {}",
        commit.when.format("%Y-%m-%d %H:%M:%S %z"),
        fit_column(&commit.subject, SUBJECT_WIDTH),
        fit_column(&commit.author, AUTHOR_WIDTH),
        commit.short_hash
    )
}

/// Renders the full changelog body, newest commit first.
pub fn render(commits: &[CommitInfo]) -> String {
    let mut out = String::new();
    for commit in commits {
        out.push_str(&format_entry(commit));
        out.push('\n');
    }
    out
}

/// Overwrites the changelog artifact wholesale.
pub fn write_changelog(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

/// Truncates to `width` columns with a `..` marker, or pads with spaces.
fn fit_column(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > width {
        let mut truncated: String = chars[..width - 2].iter().collect();
        truncated.push_str("..");
        truncated
    } else {
        let mut padded: String = text.to_string();
        padded.extend(std::iter::repeat(' ').take(width - chars.len()));
        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn sample_commit(subject: &str, author: &str) -> CommitInfo {
        let offset = FixedOffset::east_opt(3600).unwrap();
        CommitInfo {
            short_hash: "abc1234".to_string(),
            subject: subject.to_string(),
            author: author.to_string(),
            when: offset.with_ymd_and_hms(2015, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_history_minor_without_marker() {
        let v = Version::new(0, 14, 2);
        assert_eq!(history_minor(&v, Some("nothing special"), "(master)"), 14);
        assert_eq!(history_minor(&v, None, "(master)"), 14);
    }

    #[test]
    fn test_history_minor_with_marker() {
        let v = Version::new(0, 14, 2);
        let readme = "Current release: 0.14.2 (master)";
        assert_eq!(history_minor(&v, Some(readme), "(master)"), 13);
    }

    #[test]
    fn test_history_minor_saturates_at_zero() {
        let v = Version::new(1, 0, 5);
        assert_eq!(history_minor(&v, Some("(master)"), "(master)"), 0);
    }

    #[test]
    fn test_history_branch_name() {
        let v = Version::new(0, 14, 2);
        assert_eq!(history_branch_name("{major}.{minor}.x", &v, 13), "0.13.x");
        assert_eq!(history_branch_name("release-{minor}", &v, 14), "release-14");
    }

    #[test]
    fn test_format_entry_columns() {
        let line = format_entry(&sample_commit("fix: a thing", "Alice"));
        assert!(line.starts_with("2015-03-09 14:05:00 +0100"));

        // timestamp(25) + space + subject(69) + space + author(15) + space + hash(7)
        assert_eq!(line.chars().count(), 25 + 1 + 69 + 1 + 15 + 1 + 7);
        assert!(line.ends_with("abc1234"));
    }

    #[test]
    fn test_subject_truncated_with_marker() {
        let long = "a".repeat(100);
        let line = format_entry(&sample_commit(&long, "Bob"));
        let subject_col: String = line.chars().skip(26).take(SUBJECT_WIDTH).collect();
        assert!(subject_col.ends_with(".."));
        assert_eq!(subject_col.chars().count(), SUBJECT_WIDTH);
    }

    #[test]
    fn test_author_truncated_with_marker() {
        let line = format_entry(&sample_commit("s", "A Very Long Author Name Indeed"));
        let author_col: String = line
            .chars()
            .skip(26 + SUBJECT_WIDTH + 1)
            .take(AUTHOR_WIDTH)
            .collect();
        assert!(author_col.ends_with(".."));
    }

    #[test]
    fn test_render_newline_per_commit() {
        let commits = vec![
            sample_commit("first", "Alice"),
            sample_commit("second", "Bob"),
        ];
        let body = render(&commits);
        assert_eq!(body.lines().count(), 2);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}

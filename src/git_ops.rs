use crate::error::{AutobumpError, Result};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{BranchType, Commit, Oid, Repository};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One commit record destined for the changelog.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// Abbreviated commit hash
    pub short_hash: String,
    /// First line of the commit message
    pub subject: String,
    /// Author name
    pub author: String,
    /// Author timestamp with its original offset
    pub when: DateTime<FixedOffset>,
}

impl CommitInfo {
    fn from_commit(commit: &Commit) -> Self {
        let oid = commit.id().to_string();
        let short_hash = oid.chars().take(7).collect();

        let subject = commit
            .summary()
            .unwrap_or("(invalid utf-8 in subject)")
            .to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();

        let time = commit.time();
        let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
        let when = offset
            .timestamp_opt(time.seconds(), 0)
            .single()
            .unwrap_or_else(|| Utc::now().fixed_offset());

        CommitInfo {
            short_hash,
            subject,
            author,
            when,
        }
    }
}

/// Wrapper around git2 Repository for the hook's git operations.
///
/// Covers repository discovery, history-branch tracking, the
/// cherry-pick-aware commit delta behind the changelog, and staging.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Creates a new GitRepo for the current working directory.
    ///
    /// Discovers the git repository in the current directory or parents.
    pub fn new() -> Result<Self> {
        let repo = Repository::discover(".")?;
        Ok(GitRepo { repo })
    }

    /// Opens a repository at an explicit path.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    /// The repository's working directory root.
    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| AutobumpError::config("Repository has no working directory"))
    }

    /// OID of the current HEAD commit.
    pub fn head_oid(&self) -> Result<Oid> {
        let head = self.repo.head()?;
        head.target()
            .ok_or_else(|| git2::Error::from_str("HEAD is detached or invalid").into())
    }

    /// OID of a local branch's head commit.
    pub fn branch_head_oid(&self, branch_name: &str) -> Result<Oid> {
        let branch = self.repo.find_branch(branch_name, BranchType::Local)?;
        let commit = branch.into_reference().peel_to_commit()?;
        Ok(commit.id())
    }

    /// Ensures the history branch is tracked locally.
    ///
    /// If a local branch of that name already exists, nothing happens.
    /// Otherwise a local branch is created from the remote-tracking
    /// reference `refs/remotes/<remote>/<name>`. Fails if neither exists.
    pub fn ensure_history_branch(&self, branch_name: &str, remote: &str) -> Result<()> {
        if self.repo.find_branch(branch_name, BranchType::Local).is_ok() {
            return Ok(());
        }

        let remote_ref = self
            .repo
            .find_reference(&format!("refs/remotes/{}/{}", remote, branch_name))?;
        let remote_oid = remote_ref.target().ok_or_else(|| {
            git2::Error::from_str(&format!(
                "Remote reference {}/{} is invalid",
                remote, branch_name
            ))
        })?;

        let remote_commit = self.repo.find_commit(remote_oid)?;
        self.repo.branch(branch_name, &remote_commit, false)?;
        Ok(())
    }

    /// Commits reachable from HEAD but not from the history branch,
    /// excluding cherry-picked duplicates.
    ///
    /// A commit on the HEAD side is dropped when its patch-id matches a
    /// commit reachable only from the history branch, even if the hashes
    /// differ (the `git log --cherry-pick --right-only branch...HEAD`
    /// contract). Returned newest first, the order the changelog shows.
    pub fn commits_unique_to_head(&self, branch_name: &str) -> Result<Vec<CommitInfo>> {
        let branch_oid = self.branch_head_oid(branch_name)?;
        let head_oid = self.head_oid()?;

        // Patch-ids of commits only the history branch has
        let mut upstream_patch_ids = HashSet::new();
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(branch_oid)?;
        revwalk.hide(head_oid)?;
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if let Some(patch_id) = self.patch_id(&commit)? {
                upstream_patch_ids.insert(patch_id);
            }
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(head_oid)?;
        revwalk.hide(branch_oid)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if let Some(patch_id) = self.patch_id(&commit)? {
                if upstream_patch_ids.contains(&patch_id) {
                    continue;
                }
            }
            commits.push(CommitInfo::from_commit(&commit));
        }

        Ok(commits)
    }

    /// Patch-id of a commit's change against its first parent.
    ///
    /// Root commits diff against the empty tree. Returns `None` when the
    /// diff has no stable patch-id (e.g. an empty commit).
    fn patch_id(&self, commit: &Commit) -> Result<Option<Oid>> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        Ok(diff.patchid(None).ok())
    }

    /// Stages every tracked file with worktree modifications (`git add -u`),
    /// plus the explicitly named artifacts even when not yet tracked (the
    /// changelog on its first run).
    ///
    /// Returns the number of paths staged.
    pub fn stage_changes(&self, explicit: &[PathBuf]) -> Result<usize> {
        let workdir = self.workdir()?;
        let mut index = self.repo.index()?;

        let mut staged = 0usize;
        {
            let mut counter = |_path: &Path, _spec: &[u8]| -> i32 {
                staged += 1;
                0
            };
            index.update_all(["*"].iter(), Some(&mut counter))?;
        }

        for path in explicit {
            let rel = path.strip_prefix(&workdir).unwrap_or(path.as_path());
            if workdir.join(rel).is_file() && index.get_path(rel, 0).is_none() {
                index.add_path(rel)?;
                staged += 1;
            }
        }

        index.write()?;
        Ok(staged)
    }
}

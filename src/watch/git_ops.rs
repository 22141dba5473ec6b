use super::errors::Result;
use chrono::DateTime;
use git2::{DiffFormat, Oid, Repository};
use log::debug;
use std::path::Path;

/// The only branch this program watches.
pub const WATCH_BRANCH: &str = "master";

/// Owned snapshot of the commit fields the watch loop needs. The diff is
/// rendered lazily, per commit, via [`CommitSource::render_diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full hex object id.
    pub id: String,
    /// Author name, `unknown` if the signature is not valid UTF-8.
    pub author: String,
    /// Committer timestamp, seconds since epoch.
    pub committed_at: i64,
}

/// Read-only view over the repository history, kept behind a trait so the
/// orchestrator can be driven by a fake in tests.
pub trait CommitSource {
    /// All commits reachable from `branch`, in the repository's natural
    /// walk order. No re-sorting is performed.
    fn commits(&self, branch: &str) -> Result<Vec<CommitInfo>>;

    /// `git show`-like text: commit header followed by the unified diff
    /// against the first parent (or the empty tree for a root commit).
    fn render_diff(&self, commit: &CommitInfo) -> Result<String>;
}

pub struct GitCommitSource {
    repo: Repository,
}

impl GitCommitSource {
    pub fn open(path: &Path) -> Result<GitCommitSource> {
        debug!("Opening repository at {}", path.display());
        let repo = Repository::open(path)?;
        Ok(GitCommitSource { repo })
    }
}

impl CommitSource for GitCommitSource {
    fn commits(&self, branch: &str) -> Result<Vec<CommitInfo>> {
        let mut walk = self.repo.revwalk()?;
        walk.push_ref(&format!("refs/heads/{branch}"))?;

        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitInfo {
                id: oid.to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
                committed_at: commit.time().seconds(),
            });
        }
        debug!("Found {} commits on '{branch}'", commits.len());
        Ok(commits)
    }

    fn render_diff(&self, info: &CommitInfo) -> Result<String> {
        let oid = Oid::from_str(&info.id)?;
        let commit = self.repo.find_commit(oid)?;

        let date = DateTime::from_timestamp(commit.time().seconds(), 0)
            .map(|d| d.to_rfc2822())
            .unwrap_or_default();
        let mut out = format!(
            "commit {}\nAuthor: {} <{}>\nDate:   {}\n\n{}\n",
            oid,
            commit.author().name().unwrap_or("unknown"),
            commit.author().email().unwrap_or(""),
            date,
            commit.message().unwrap_or("").trim_end(),
        );

        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => out.push(line.origin()),
                _ => {}
            }
            if let Ok(text) = std::str::from_utf8(line.content()) {
                out.push_str(text);
            }
            true
        })?;
        Ok(out)
    }
}

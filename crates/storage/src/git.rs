//! Git commit lookup for benchmark entries

use std::path::Path;
use tracing::debug;

/// Length of the abbreviated commit id recorded with each run
const SHORT_COMMIT_LEN: usize = 8;

/// Short id of the commit checked out in the repository containing `path`
///
/// Returns `None` outside a repository or when HEAD does not point at a commit.
pub fn current_commit(path: &Path) -> Option<String> {
    let repo = match git2::Repository::discover(path) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("No git repository at {}: {e}", path.display());
            return None;
        }
    };
    let commit = repo.head().ok()?.peel_to_commit().ok()?;
    let id = commit.id().to_string();
    Some(id.chars().take(SHORT_COMMIT_LEN).collect())
}

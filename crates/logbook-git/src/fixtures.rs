//! Repository fixtures shared by the tests of this crate

use std::path::Path;

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

pub fn init_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path()).unwrap();
    (temp, repo)
}

/// Write `relative` and commit it on HEAD at the current time
pub fn commit_file(temp: &TempDir, repo: &Repository, relative: &str, content: &str, message: &str) -> Oid {
    let sig = Signature::now("Test", "test@example.com").unwrap();
    commit_file_as(temp, repo, relative, content, message, &sig)
}

/// Write `relative` and commit it on HEAD at `seconds` since the epoch
pub fn commit_file_at(
    temp: &TempDir,
    repo: &Repository,
    relative: &str,
    content: &str,
    message: &str,
    seconds: i64,
) -> Oid {
    let sig = Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap();
    commit_file_as(temp, repo, relative, content, message, &sig)
}

fn commit_file_as(
    temp: &TempDir,
    repo: &Repository,
    relative: &str,
    content: &str,
    message: &str,
    sig: &Signature<'_>,
) -> Oid {
    let path = temp.path().join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(relative)).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<_> = parents.iter().collect();

    repo.commit(Some("HEAD"), sig, sig, message, &tree, &parent_refs)
        .unwrap()
}

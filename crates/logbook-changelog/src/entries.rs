//! Change lines built from commits

use logbook_core::RepoSlug;
use logbook_git::CommitLog;

use crate::patterns::PULL_REFERENCE;

/// One change line per commit with a title, in the order given
pub fn change_lines(commits: &[CommitLog], repo: Option<&RepoSlug>) -> Vec<String> {
    commits
        .iter()
        .map(|commit| link_pull_reference(&commit.title, repo))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Turn a trailing `(#123)` into a Markdown link to the pull request
pub fn link_pull_reference(title: &str, repo: Option<&RepoSlug>) -> String {
    let title = title.trim();
    let (Some(repo), Some(caps)) = (repo, PULL_REFERENCE.captures(title)) else {
        return title.to_string();
    };

    let number = &caps["number"];
    let url = match number.parse::<u64>() {
        Ok(n) => repo.pull_url(n),
        Err(_) => return title.to_string(),
    };

    format!("{} ([#{}]({}))", caps["title"].trim_end(), number, url)
}

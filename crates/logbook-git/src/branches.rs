//! Branch and commit operations used when proposing changelog updates

use std::path::Path;

use git2::{build::CheckoutBuilder, BranchType, Oid, Signature};
use tracing::{info, instrument};

use logbook_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Create `name` from the local branch `base`, or from `<remote>/<base>`
    /// when no local branch exists, and check it out.
    #[instrument(skip(self))]
    pub fn checkout_new_branch(&self, name: &str, base: &str, remote: &str) -> Result<()> {
        if self.repo.find_branch(name, BranchType::Local).is_ok() {
            return Err(GitError::BranchExists(name.to_string()));
        }

        let start = match self.repo.find_branch(base, BranchType::Local) {
            Ok(branch) => branch.get().peel_to_commit()?,
            Err(_) => self
                .repo
                .find_branch(&format!("{}/{}", remote, base), BranchType::Remote)
                .map_err(|_| GitError::BranchNotFound(base.to_string()))?
                .get()
                .peel_to_commit()?,
        };

        self.repo.branch(name, &start, false)?;
        self.checkout_branch(name)?;

        info!(branch = name, base, start = %start.id(), "created branch");
        Ok(())
    }

    /// Check out an existing local branch
    #[instrument(skip(self))]
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let branch = self
            .repo
            .find_branch(name, BranchType::Local)
            .map_err(|_| GitError::BranchNotFound(name.to_string()))?;
        let reference = branch.get();
        let target = reference.peel_to_commit()?;

        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        self.repo
            .checkout_tree(target.as_object(), Some(&mut checkout))?;

        let refname = reference
            .name()
            .ok_or_else(|| GitError::BranchNotFound(name.to_string()))?;
        self.repo.set_head(refname)?;

        Ok(())
    }

    /// Stage `paths` (relative to the working directory) and commit them on HEAD
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub fn commit_paths(
        &self,
        paths: &[&Path],
        message: &str,
        author_name: &str,
        author_email: &str,
    ) -> Result<Oid> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.head_commit()?;
        let signature = Signature::now(author_name, author_email)?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        info!(commit = %oid, "committed");
        Ok(oid)
    }
}

//! Checking out branches and commits

use crate::commands::content::find_commit;
use crate::error::{Result, TidelineError};
use crate::services::repository::parse_oid;
use crate::services::Repository;

/// Check out the local branch `name` and point HEAD at it.
///
/// Uses the safe strategy, so local changes that would be overwritten abort
/// the checkout.
pub fn checkout_branch(repo: &Repository, name: &str) -> Result<()> {
    repo.perform_writing(|git| {
        let branch = git
            .find_branch(name, git2::BranchType::Local)
            .map_err(|e| TidelineError::from_lookup(e, name.to_string()))?;
        let reference = branch.get();
        let ref_name = reference
            .name()
            .ok_or_else(|| TidelineError::Unexpected(format!("branch {} has a non UTF-8 name", name)))?;
        let commit = reference.peel_to_commit()?;

        let mut checkout_opts = git2::build::CheckoutBuilder::new();
        checkout_opts.safe();
        git.checkout_tree(commit.as_object(), Some(&mut checkout_opts))?;
        git.set_head(ref_name)?;

        tracing::info!("Checked out branch {}", name);
        Ok(())
    })
}

/// Check out `oid` with a detached HEAD
pub fn checkout_commit(repo: &Repository, oid: &str) -> Result<()> {
    let oid = parse_oid(oid)?;

    repo.perform_writing(|git| {
        let commit = find_commit(git, oid)?;

        let mut checkout_opts = git2::build::CheckoutBuilder::new();
        checkout_opts.safe();
        git.checkout_tree(commit.as_object(), Some(&mut checkout_opts))?;
        git.set_head_detached(oid)?;

        tracing::info!("Checked out {} (detached)", oid);
        Ok(())
    })
}

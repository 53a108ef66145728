//! Submodules

use crate::error::Result;
use crate::models::Submodule;
use crate::services::repository::workdir;
use crate::services::Repository;
use crate::utils::run_git;

/// Submodules recorded in `.gitmodules`
pub fn get_submodules(repo: &Repository) -> Result<Vec<Submodule>> {
    let git = repo.git()?;

    let submodules = git
        .submodules()?
        .iter()
        .map(|submodule| Submodule {
            name: submodule.name().unwrap_or("").to_string(),
            path: submodule.path().to_string_lossy().to_string(),
            url: submodule.url().map(|s| s.to_string()),
            head_oid: submodule.head_id().map(|id| id.to_string()),
            workdir_oid: submodule.workdir_id().map(|id| id.to_string()),
        })
        .collect();

    Ok(submodules)
}

/// Clone `url` into `path` and register it as a submodule.
///
/// Delegates to `git submodule add -f`, which the engine cannot do on its own
/// without network support.
pub fn add_submodule(repo: &Repository, url: &str, path: &str) -> Result<()> {
    repo.perform_writing(|git| {
        run_git(
            &repo.options().git_executable,
            workdir(git)?,
            &["submodule", "add", "-f", url, path],
            None,
        )?;
        tracing::info!("Added submodule {} from {}", path, url);
        Ok(())
    })
}

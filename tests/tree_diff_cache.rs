//! Integration tests for commit tree diffs and the hunk patcher
//!
//! Tree diffs are checked for cache consistency and first-parent fallback on
//! merges. Hunks produced from real file histories are checked to round-trip
//! through the patcher.

use git2::Repository as GitRepository;
use tempfile::TempDir;
use tideline_lib::commands::diff::{diff, tree_diff};
use tideline_lib::commands::patch::apply_hunk;
use tideline_lib::models::{ContentSource, DiffResult};
use tideline_lib::services::DiffKey;
use tideline_lib::{Repository, RepositoryOptions};

fn setup_repo() -> (TempDir, GitRepository) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repo = GitRepository::init(dir.path()).expect("Failed to init repo");

    let mut config = repo.config().expect("Failed to get config");
    config
        .set_str("user.name", "Test User")
        .expect("Failed to set user.name");
    config
        .set_str("user.email", "test@example.com")
        .expect("Failed to set user.email");

    (dir, repo)
}

/// Commit `files` on top of `parents` without moving HEAD unless `update_head`
fn commit_on(
    repo: &GitRepository,
    parents: &[git2::Oid],
    files: &[(&str, &str)],
    update_head: bool,
) -> git2::Oid {
    let mut builder = match parents.first() {
        Some(oid) => {
            let tree = repo.find_commit(*oid).unwrap().tree().unwrap();
            repo.treebuilder(Some(&tree)).unwrap()
        }
        None => repo.treebuilder(None).unwrap(),
    };
    for (name, content) in files {
        let blob = repo.blob(content.as_bytes()).unwrap();
        builder.insert(name, blob, 0o100644).unwrap();
    }
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();

    let sig = repo.signature().expect("Failed to get signature");
    let parent_commits: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();
    let parent_refs: Vec<&git2::Commit> = parent_commits.iter().collect();

    repo.commit(
        if update_head { Some("HEAD") } else { None },
        &sig,
        &sig,
        "commit",
        &tree,
        &parent_refs,
    )
    .expect("Failed to create commit")
}

#[test]
fn repeated_tree_diff_is_stable() {
    let (dir, git) = setup_repo();
    let root = commit_on(&git, &[], &[("a.txt", "a\n")], true);
    let next = commit_on(&git, &[root], &[("a.txt", "a2\n"), ("b.txt", "b\n")], true);

    let warm = Repository::open(dir.path()).unwrap();
    let first = tree_diff(&warm, &next.to_string(), None).unwrap();
    let second = tree_diff(&warm, &next.to_string(), None).unwrap();
    assert_eq!(first, second);
    assert!(warm.diff_cache().contains(&DiffKey::new(next, None)));

    let cold = Repository::open(dir.path()).unwrap();
    let fresh = tree_diff(&cold, &next.to_string(), None).unwrap();
    assert_eq!(*fresh, *first);
    assert_eq!(fresh.deltas.len(), 2);
}

#[test]
fn merge_without_parent_uses_first_parent() {
    let (dir, git) = setup_repo();
    let base = commit_on(&git, &[], &[("shared.txt", "base\n")], true);
    let p1 = commit_on(&git, &[base], &[("left.txt", "left\n")], true);
    let p2 = commit_on(&git, &[base], &[("right.txt", "right\n")], false);
    let merge = commit_on(&git, &[p1, p2], &[("right.txt", "right\n")], true);
    let repo = Repository::open(dir.path()).unwrap();

    let implicit = tree_diff(&repo, &merge.to_string(), None).unwrap();
    let explicit = tree_diff(&repo, &merge.to_string(), Some(&p1.to_string())).unwrap();
    assert_eq!(*implicit, *explicit);
    assert_eq!(implicit.parent.as_deref(), Some(p1.to_string().as_str()));

    let against_p2 = tree_diff(&repo, &merge.to_string(), Some(&p2.to_string())).unwrap();
    assert_ne!(*against_p2, *implicit);
    assert!(against_p2.delta("left.txt").is_some());
}

#[test]
fn eviction_recomputes_equal_diffs() {
    let (dir, git) = setup_repo();
    let root = commit_on(&git, &[], &[("a.txt", "1\n")], true);
    let second = commit_on(&git, &[root], &[("a.txt", "2\n")], true);
    let third = commit_on(&git, &[second], &[("a.txt", "3\n")], true);

    let options = RepositoryOptions {
        diff_cache_capacity: 1,
        ..Default::default()
    };
    let repo = Repository::open_with_options(dir.path(), options).unwrap();

    let before = tree_diff(&repo, &second.to_string(), None).unwrap();
    tree_diff(&repo, &third.to_string(), None).unwrap();
    assert!(!repo.diff_cache().contains(&DiffKey::new(second, None)));

    let after = tree_diff(&repo, &second.to_string(), None).unwrap();
    assert_eq!(*before, *after);
}

#[test]
fn binary_paths_skip_content_resolution() {
    let (dir, git) = setup_repo();
    let root = commit_on(&git, &[], &[("d.bin", "\u{0}\u{1}\u{2}")], true);
    let repo = Repository::open(dir.path()).unwrap();

    assert_eq!(diff(&repo, "d.bin", &root.to_string(), None).unwrap(), DiffResult::Binary);
}

#[test]
fn generated_hunks_round_trip_through_patcher() {
    let (dir, git) = setup_repo();
    let old = "alpha\nbeta\ngamma\ndelta\nepsilon\nzeta\neta\ntheta\niota\nkappa\nlambda\nmu\n";
    let new = "alpha\nBETA\ngamma\ndelta\nepsilon\nzeta\neta\ntheta\niota\nkappa\nmu\nnu\n";
    let root = commit_on(&git, &[], &[("greek.txt", old)], true);
    let next = commit_on(&git, &[root], &[("greek.txt", new)], true);

    let options = RepositoryOptions {
        context_lines: 1,
        ..Default::default()
    };
    let repo = Repository::open_with_options(dir.path(), options).unwrap();
    let result = diff(&repo, "greek.txt", &next.to_string(), None).unwrap();
    let text = result.as_text().unwrap();
    assert!(matches!(text.from, ContentSource::CommittedBlob(_)));

    let hunks = text.hunks(&repo).unwrap();
    assert_eq!(hunks.len(), 2);

    // Hunks apply bottom-up so earlier positions stay valid
    let mut patched = old.to_string();
    for hunk in hunks.iter().rev() {
        patched = apply_hunk(hunk, &patched, false).unwrap();
    }
    assert_eq!(patched, new);

    for hunk in &hunks {
        let forward = apply_hunk(hunk, old, false).unwrap();
        assert_eq!(apply_hunk(hunk, &forward, true).unwrap(), old);
    }
}

//! Tag operations

use crate::commands::content::find_commit;
use crate::error::Result;
use crate::models::{Signature, Tag};
use crate::services::repository::parse_oid;
use crate::services::Repository;

/// All tags, sorted by name
pub fn get_tags(repo: &Repository) -> Result<Vec<Tag>> {
    let git = repo.git()?;
    let mut tags = Vec::new();

    git.tag_foreach(|oid, name| {
        let name_str = String::from_utf8_lossy(name).to_string();
        let short_name = name_str
            .strip_prefix("refs/tags/")
            .unwrap_or(&name_str)
            .to_string();

        let tag = match git.find_tag(oid) {
            Ok(tag) => Tag {
                name: short_name,
                target_oid: tag.target_id().to_string(),
                message: tag.message().map(|s| s.to_string()),
                tagger: tag.tagger().map(Signature::from),
                is_annotated: true,
            },
            Err(_) => Tag {
                name: short_name,
                target_oid: oid.to_string(),
                message: None,
                tagger: None,
                is_annotated: false,
            },
        };
        tags.push(tag);
        true
    })?;

    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
}

/// Tag the commit `target`.
///
/// With a message the tag is annotated and signed with the configured
/// identity, otherwise it is lightweight.
pub fn create_tag(repo: &Repository, name: &str, target: &str, message: Option<&str>) -> Result<Tag> {
    let target_oid = parse_oid(target)?;

    repo.perform_writing(|git| {
        let commit = find_commit(git, target_oid)?;

        let tagger = match message {
            Some(msg) => {
                let signature = git.signature()?;
                git.tag(name, commit.as_object(), &signature, msg, false)?;
                Some(Signature::from(signature))
            }
            None => {
                git.tag_lightweight(name, commit.as_object(), false)?;
                None
            }
        };

        tracing::info!("Created tag {} at {}", name, target_oid);
        Ok(Tag {
            name: name.to_string(),
            target_oid: target_oid.to_string(),
            message: message.map(|m| m.to_string()),
            is_annotated: tagger.is_some(),
            tagger,
        })
    })
}

pub fn delete_tag(repo: &Repository, name: &str) -> Result<()> {
    repo.perform_writing(|git| {
        git.tag_delete(name)?;
        tracing::info!("Deleted tag {}", name);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TidelineError;
    use crate::test_utils::TestRepo;

    #[test]
    fn test_get_tags_sorted_with_details() {
        let test_repo = TestRepo::with_initial_commit();
        test_repo.create_tag("v2.0");
        test_repo.create_lightweight_tag("v1.0");
        let repo = test_repo.open();

        let tags = get_tags(&repo).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "v1.0");
        assert!(!tags[0].is_annotated);
        assert_eq!(tags[0].target_oid, test_repo.head_oid().to_string());

        assert_eq!(tags[1].name, "v2.0");
        assert!(tags[1].is_annotated);
        assert_eq!(tags[1].message.as_deref(), Some("Tag v2.0"));
        assert_eq!(tags[1].tagger.as_ref().unwrap().name, "Test User");
        assert_eq!(tags[1].target_oid, test_repo.head_oid().to_string());
    }

    #[test]
    fn test_create_annotated_tag() {
        let test_repo = TestRepo::with_initial_commit();
        let repo = test_repo.open();
        let head = test_repo.head_oid().to_string();

        let tag = create_tag(&repo, "release", &head, Some("First release")).unwrap();
        assert!(tag.is_annotated);
        assert_eq!(tag.target_oid, head);
        assert_eq!(tag.tagger.unwrap().email, "test@example.com");

        let listed = get_tags(&repo).unwrap();
        assert_eq!(listed[0].message.as_deref(), Some("First release"));
    }

    #[test]
    fn test_create_lightweight_tag() {
        let test_repo = TestRepo::with_initial_commit();
        let repo = test_repo.open();
        let head = test_repo.head_oid().to_string();

        let tag = create_tag(&repo, "light", &head, None).unwrap();
        assert!(!tag.is_annotated);
        assert!(tag.tagger.is_none());
        assert!(test_repo.repo().find_reference("refs/tags/light").is_ok());
    }

    #[test]
    fn test_create_tag_on_non_commit() {
        let test_repo = TestRepo::with_initial_commit();
        let repo = test_repo.open();
        let blob = test_repo.repo().blob(b"not a commit").unwrap().to_string();

        let result = create_tag(&repo, "bad", &blob, None);
        assert!(matches!(result, Err(TidelineError::ObjectNotFound(_))));
        assert!(get_tags(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_delete_tag() {
        let test_repo = TestRepo::with_initial_commit();
        test_repo.create_tag("v1.0");
        let repo = test_repo.open();

        delete_tag(&repo, "v1.0").unwrap();
        assert!(get_tags(&repo).unwrap().is_empty());
        assert!(delete_tag(&repo, "v1.0").is_err());
    }
}

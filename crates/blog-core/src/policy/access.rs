//! Mutation rights over posts and comments.

use uuid::Uuid;

use crate::domain::{Comment, Post, Viewer};
use crate::error::DomainError;

/// Only the author may edit or delete a post.
pub fn can_mutate_post(post: &Post, viewer: &Viewer) -> bool {
    viewer.is(post.author_id)
}

/// Only the author may edit or delete a comment.
pub fn can_mutate_comment(comment: &Comment, viewer: &Viewer) -> bool {
    viewer.is(comment.author_id)
}

/// Result of an edit or delete request against a post.
///
/// A non-author is not an error: the request degrades to viewing the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    Applied(T),
    Redirect { post_id: Uuid },
}

impl<T> MutationOutcome<T> {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Gate for post edits and deletes: `None` means proceed.
pub fn post_mutation_gate<T>(post: &Post, viewer: &Viewer) -> Option<MutationOutcome<T>> {
    if can_mutate_post(post, viewer) {
        None
    } else {
        tracing::debug!(post_id = %post.id, "Non-author post mutation redirected to detail");
        Some(MutationOutcome::Redirect { post_id: post.id })
    }
}

/// Gate for comment edits and deletes: another author's comment does not
/// exist as far as this viewer is concerned.
pub fn ensure_comment_owner(comment: &Comment, viewer: &Viewer) -> Result<(), DomainError> {
    if can_mutate_comment(comment, viewer) {
        Ok(())
    } else {
        tracing::debug!(comment_id = %comment.id, "Non-author comment mutation rejected");
        Err(DomainError::not_found("comment", comment.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            title: "Title".into(),
            text: "Text".into(),
            pub_date: Utc::now(),
            image: None,
            location_id: None,
            category_id: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_author_mutates_post() {
        let bob = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let p = post(bob);

        assert!(can_mutate_post(&p, &Viewer::user(bob)));
        assert!(!can_mutate_post(&p, &Viewer::user(alice)));
        assert!(!can_mutate_post(&p, &Viewer::anonymous()));
    }

    #[test]
    fn test_post_gate_redirects_non_author() {
        let bob = Uuid::new_v4();
        let p = post(bob);

        assert!(post_mutation_gate::<()>(&p, &Viewer::user(bob)).is_none());
        assert_eq!(
            post_mutation_gate::<()>(&p, &Viewer::user(Uuid::new_v4())),
            Some(MutationOutcome::Redirect { post_id: p.id })
        );
    }

    #[test]
    fn test_comment_gate_is_not_found_for_non_author() {
        let bob = Uuid::new_v4();
        let comment = Comment::new(Uuid::new_v4(), bob, "hi".into(), Utc::now());

        assert!(can_mutate_comment(&comment, &Viewer::user(bob)));
        assert!(ensure_comment_owner(&comment, &Viewer::user(bob)).is_ok());

        let err = ensure_comment_owner(&comment, &Viewer::user(Uuid::new_v4())).unwrap_err();
        assert!(err.is_not_found());
    }
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::BlogService;
use crate::domain::{
    Comment, CommentDraft, NewAccount, Post, PostDraft, ProfileChanges, User, Viewer,
};
use crate::error::DomainError;
use crate::policy::{MutationOutcome, ensure_comment_owner, post_mutation_gate};
use crate::ports::{AuthError, PasswordService};

impl BlogService {
    pub async fn create_post(
        &self,
        viewer: &Viewer,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<Post, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;
        draft.validate()?;
        self.check_references(&draft).await?;

        let post = self.repos.posts.save(Post::new(author_id, draft, now)).await?;
        tracing::info!(post_id = %post.id, %author_id, "Post created");

        Ok(post)
    }

    /// Edit a post. Non-authors are sent back to the post instead.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
        draft: PostDraft,
    ) -> Result<MutationOutcome<Post>, DomainError> {
        let mut post = self.existing_post(post_id).await?;
        if let Some(redirect) = post_mutation_gate(&post, viewer) {
            return Ok(redirect);
        }

        draft.validate()?;
        self.check_references(&draft).await?;
        post.apply(draft);

        let post = self.repos.posts.save(post).await?;
        tracing::info!(%post_id, "Post updated");

        Ok(MutationOutcome::Applied(post))
    }

    /// Delete a post and, through the store, its comments.
    pub async fn delete_post(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
    ) -> Result<MutationOutcome<()>, DomainError> {
        let post = self.existing_post(post_id).await?;
        if let Some(redirect) = post_mutation_gate(&post, viewer) {
            return Ok(redirect);
        }

        self.repos.posts.delete(post.id).await?;
        tracing::info!(%post_id, "Post deleted");

        Ok(MutationOutcome::Applied(()))
    }

    /// Comment on a post. The post only has to exist.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
        draft: CommentDraft,
        now: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;
        let post = self.existing_post(post_id).await?;
        draft.validate()?;

        let comment = Comment::new(post.id, author_id, draft.text, now);
        let comment = self.repos.comments.save(comment).await?;
        tracing::info!(comment_id = %comment.id, %post_id, "Comment added");

        Ok(comment)
    }

    /// Edit one's own comment.
    ///
    /// Invalid text is reported as NotFound, the same as a foreign comment.
    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        viewer: &Viewer,
        draft: CommentDraft,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.owned_comment(comment_id, viewer).await?;

        if let Err(e) = draft.validate() {
            tracing::debug!(%comment_id, error = %e, "Rejected comment edit");
            return Err(DomainError::not_found("comment", comment_id));
        }
        comment.text = draft.text;

        let comment = self.repos.comments.save(comment).await?;
        tracing::info!(%comment_id, "Comment updated");

        Ok(comment)
    }

    /// Delete one's own comment, returning it.
    pub async fn delete_comment(
        &self,
        comment_id: Uuid,
        viewer: &Viewer,
    ) -> Result<Comment, DomainError> {
        let comment = self.owned_comment(comment_id, viewer).await?;

        self.repos.comments.delete(comment.id).await?;
        tracing::info!(%comment_id, "Comment deleted");

        Ok(comment)
    }

    /// Update the signed-in user's own profile.
    pub async fn update_profile(
        &self,
        viewer: &Viewer,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        let user_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;
        changes.validate()?;

        let mut user = self
            .repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;

        if changes.username != user.username {
            self.ensure_username_free(&changes.username, Some(user.id))
                .await?;
        }

        user.username = changes.username;
        user.email = changes.email;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.updated_at = now;

        let user = self.repos.users.save(user).await?;
        tracing::info!(%user_id, "Profile updated");

        Ok(user)
    }

    pub async fn register(
        &self,
        account: NewAccount,
        passwords: &dyn PasswordService,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        account.validate()?;
        self.ensure_username_free(&account.username, None).await?;

        let password_hash = passwords.hash(&account.password).map_err(auth_failure)?;
        let user = User::new(account.username, account.email, password_hash, now);
        let user = self.repos.users.save(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// are indistinguishable.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let Some(user) = self.repos.users.find_by_username(username).await? else {
            return Err(DomainError::Unauthorized);
        };

        if passwords
            .verify(password, &user.password_hash)
            .map_err(auth_failure)?
        {
            Ok(user)
        } else {
            Err(DomainError::Unauthorized)
        }
    }

    async fn existing_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn owned_comment(
        &self,
        comment_id: Uuid,
        viewer: &Viewer,
    ) -> Result<Comment, DomainError> {
        let author_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;
        let comment = self
            .repos
            .comments
            .find_owned(comment_id, author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        ensure_comment_owner(&comment, viewer)?;
        Ok(comment)
    }

    async fn check_references(&self, draft: &PostDraft) -> Result<(), DomainError> {
        if let Some(category_id) = draft.category_id {
            if self.repos.categories.find_by_id(category_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Unknown category {category_id}"
                )));
            }
        }
        if let Some(location_id) = draft.location_id {
            if self.repos.locations.find_by_id(location_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Unknown location {location_id}"
                )));
            }
        }
        Ok(())
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        owner: Option<Uuid>,
    ) -> Result<(), DomainError> {
        match self.repos.users.find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(
                format!("Username '{username}' is already taken"),
            )),
            _ => Ok(()),
        }
    }
}

fn auth_failure(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}

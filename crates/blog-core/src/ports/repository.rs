use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentEntry, Location, Post, PostEntry, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Published categories ordered by title.
    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// Published locations ordered by name.
    async fn list_published(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository. Listings are always ordered by `pub_date`, newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, RepoError>;

    async fn count_entries(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    async fn fetch_entries(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostEntry>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, RepoError>;

    /// A comment, but only if `author_id` wrote it.
    async fn find_owned(
        &self,
        comment_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError>;
}

/// Predicate set applied to post listings. Empty means "all posts".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// `is_published = true`
    pub published_only: bool,
    /// `pub_date <= t`
    pub published_before: Option<DateTime<Utc>>,
    /// Post has a category and that category is published.
    pub require_published_category: bool,
}

impl PostFilter {
    /// Published posts whose publication date has been reached.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            published_only: true,
            published_before: Some(now),
            ..Self::default()
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_published_category(mut self) -> Self {
        self.require_published_category = true;
        self
    }

    /// Evaluate the filter against a post and its (optional) category.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| post.author_id != id) {
            return false;
        }
        if self.category_id.is_some() && post.category_id != self.category_id {
            return false;
        }
        if self.published_only && !post.is_published {
            return false;
        }
        if self.published_before.is_some_and(|t| post.pub_date > t) {
            return false;
        }
        if self.require_published_category && !category.is_some_and(|c| c.is_published) {
            return false;
        }
        true
    }
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::BlogService;
use crate::domain::{Category, CommentEntry, Location, PostEntry, User, Viewer};
use crate::error::DomainError;
use crate::pagination::{Page, PageNumber, PageRequest};
use crate::policy::{is_category_browsable, is_post_visible};
use crate::ports::{BaseRepository, PostFilter};

/// A browsable category and one page of its posts.
#[derive(Debug, Clone)]
pub struct CategoryListing {
    pub category: Category,
    pub posts: Page<PostEntry>,
}

/// A user profile and one page of the posts this viewer may see on it.
#[derive(Debug, Clone)]
pub struct ProfileListing {
    pub profile: User,
    pub posts: Page<PostEntry>,
}

impl BlogService {
    /// Front page: published, due posts in published categories.
    pub async fn list_public_posts(
        &self,
        page: PageNumber,
        now: DateTime<Utc>,
    ) -> Result<Page<PostEntry>, DomainError> {
        let filter = PostFilter::public(now).with_published_category();
        self.page_of(&filter, PageRequest::strict(page)).await
    }

    /// Posts of one category. A hidden category has no listing at all.
    pub async fn list_category_posts(
        &self,
        slug: &str,
        page: PageNumber,
        now: DateTime<Utc>,
    ) -> Result<CategoryListing, DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        if !is_category_browsable(&category) {
            tracing::debug!(slug, "Category is not published");
            return Err(DomainError::not_found("category", slug));
        }

        // The category check above already covers the category flag.
        let filter = PostFilter::public(now).in_category(category.id);
        let posts = self.page_of(&filter, PageRequest::strict(page)).await?;

        Ok(CategoryListing { category, posts })
    }

    /// A user's posts. The owner sees drafts and scheduled posts; everyone
    /// else sees published, due posts regardless of category state.
    pub async fn list_profile_posts(
        &self,
        username: &str,
        viewer: &Viewer,
        page: PageNumber,
        now: DateTime<Utc>,
    ) -> Result<ProfileListing, DomainError> {
        let profile = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let filter = if viewer.is(profile.id) {
            PostFilter::default().by_author(profile.id)
        } else {
            PostFilter::public(now).by_author(profile.id)
        };
        let posts = self.page_of(&filter, PageRequest::lenient(page)).await?;

        Ok(ProfileListing { profile, posts })
    }

    /// A single post, if this viewer may see it.
    pub async fn get_post_detail(
        &self,
        post_id: Uuid,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Result<PostEntry, DomainError> {
        let entry = self
            .repos
            .posts
            .find_entry(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if !is_post_visible(&entry.post, entry.category.as_ref(), viewer, now) {
            tracing::debug!(%post_id, "Post hidden from viewer");
            return Err(DomainError::not_found("post", post_id));
        }

        Ok(entry)
    }

    /// Comments of a post, oldest first.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, DomainError> {
        Ok(self.repos.comments.list_for_post(post_id).await?)
    }

    /// The signed-in user's own account.
    pub async fn current_user(&self, viewer: &Viewer) -> Result<User, DomainError> {
        let user_id = viewer.user_id().ok_or(DomainError::Unauthorized)?;

        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.repos.categories.list_published().await?)
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.repos.locations.list_published().await?)
    }

    async fn page_of(
        &self,
        filter: &PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostEntry>, DomainError> {
        let total = self.repos.posts.count_entries(filter).await?;
        let window = request
            .resolve(total)
            .ok_or_else(|| DomainError::not_found("page", request.number))?;
        let items = self
            .repos
            .posts
            .fetch_entries(filter, window.offset, window.limit)
            .await?;

        Ok(Page::new(items, window, total))
    }
}

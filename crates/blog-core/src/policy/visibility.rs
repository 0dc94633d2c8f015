//! Read visibility of posts and categories.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post, Viewer};

/// Whether `viewer` may read `post` at instant `now`.
///
/// Authors always see their own posts, including drafts and scheduled
/// ones. Everyone else needs the post published, its publication date
/// reached and its category (if it still has one) published.
pub fn is_post_visible(
    post: &Post,
    category: Option<&Category>,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> bool {
    if viewer.is(post.author_id) {
        return true;
    }
    post.is_published && post.pub_date <= now && category.is_none_or(|c| c.is_published)
}

/// Whether a category's post listing exists for viewers at all.
pub fn is_category_browsable(category: &Category) -> bool {
    category.is_published
}

//! Mapping from domain types to wire DTOs.

use blog_core::domain::{
    Author, Category, Comment, CommentEntry, Location, Post, PostEntry, User,
};
use blog_core::pagination::{Page, PageNumber};
use blog_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PageQuery,
    PageResponse, PostResponse, PostSummary, UserResponse,
};

pub fn page_number(query: &PageQuery) -> PageNumber {
    PageNumber::parse(query.page.as_deref())
}

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
        display_name: author.display_name,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        location_id: post.location_id,
        category_id: post.category_id,
        is_published: post.is_published,
        created_at: post.created_at,
    }
}

pub fn post_summary(entry: PostEntry) -> PostSummary {
    PostSummary {
        id: entry.post.id,
        title: entry.post.title,
        text: entry.post.text,
        pub_date: entry.post.pub_date,
        image: entry.post.image,
        is_published: entry.post.is_published,
        author: author(entry.author),
        category: entry.category.map(category),
        location: entry.location.map(location),
        comment_count: entry.comment_count,
    }
}

pub fn comment_entry(entry: CommentEntry) -> CommentResponse {
    CommentResponse {
        author: Some(author(entry.author)),
        ..comment(entry.comment)
    }
}

/// A comment without its author, for write responses.
pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        text: comment.text,
        created_at: comment.created_at,
        author: None,
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(f);

    PageResponse {
        items: page.items,
        page: page.number,
        page_size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next,
        has_previous,
    }
}

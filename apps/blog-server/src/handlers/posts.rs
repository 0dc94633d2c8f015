//! Post handlers.

use actix_web::{HttpResponse, http::header, web};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use blog_core::domain::PostDraft;
use blog_core::policy::MutationOutcome;
use blog_shared::dto::{PageQuery, PostDetailResponse, PostRequest};

use super::presenters;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn post_location(post_id: Uuid) -> String {
    format!("/api/posts/{}", post_id)
}

/// 303 back to the post's detail view.
pub(crate) fn see_post(post_id: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, post_location(post_id)))
        .finish()
}

fn draft_from(req: PostRequest, now: DateTime<Utc>) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date.unwrap_or(now),
        image: req.image,
        location_id: req.location_id,
        category_id: req.category_id,
        is_published: req.is_published,
    }
}

/// GET /api/posts?page=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .list_public_posts(presenters::page_number(&query), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(presenters::page(page, presenters::post_summary)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    tracing::debug!(username = %identity.username, "Creating post");

    let now = Utc::now();
    let post = state
        .blog
        .create_post(&identity.viewer(), draft_from(body.into_inner(), now), now)
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, post_location(post.id)))
        .json(presenters::post(post)))
}

/// GET /api/posts/{id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let entry = state
        .blog
        .get_post_detail(post_id, &identity.viewer(), Utc::now())
        .await?;
    let comments = state.blog.list_comments(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: presenters::post_summary(entry),
        comments: comments.into_iter().map(presenters::comment_entry).collect(),
    }))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = draft_from(body.into_inner(), Utc::now());

    match state
        .blog
        .update_post(path.into_inner(), &identity.viewer(), draft)
        .await?
    {
        MutationOutcome::Applied(post) => Ok(HttpResponse::Ok().json(presenters::post(post))),
        MutationOutcome::Redirect { post_id } => Ok(see_post(post_id)),
    }
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    match state
        .blog
        .delete_post(path.into_inner(), &identity.viewer())
        .await?
    {
        MutationOutcome::Applied(()) => Ok(HttpResponse::NoContent().finish()),
        MutationOutcome::Redirect { post_id } => Ok(see_post(post_id)),
    }
}

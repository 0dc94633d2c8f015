//! Comment handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blog_core::domain::CommentDraft;
use blog_shared::dto::CommentRequest;

use super::presenters;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{id}/comments
///
/// Same visibility as the post itself.
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state
        .blog
        .get_post_detail(post_id, &identity.viewer(), Utc::now())
        .await?;

    let comments = state.blog.list_comments(post_id).await?;

    Ok(HttpResponse::Ok().json(
        comments
            .into_iter()
            .map(presenters::comment_entry)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let draft = CommentDraft {
        text: body.into_inner().text,
    };
    let comment = state
        .blog
        .add_comment(path.into_inner(), &identity.viewer(), draft, Utc::now())
        .await?;

    Ok(HttpResponse::Created().json(presenters::comment(comment)))
}

/// PUT /api/posts/{id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (_post_id, comment_id) = path.into_inner();
    let draft = CommentDraft {
        text: body.into_inner().text,
    };
    let comment = state
        .blog
        .update_comment(comment_id, &identity.viewer(), draft)
        .await?;

    Ok(HttpResponse::Ok().json(presenters::comment(comment)))
}

/// DELETE /api/posts/{id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (_post_id, comment_id) = path.into_inner();
    state
        .blog
        .delete_comment(comment_id, &identity.viewer())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

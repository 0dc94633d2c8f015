//! Profile handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::domain::ProfileChanges;
use blog_shared::dto::{PageQuery, ProfileResponse, ProfileUpdateRequest};

use super::presenters;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = presenters::page_number(&query);
    let listing = state
        .blog
        .list_profile_posts(&path.into_inner(), &identity.viewer(), page, Utc::now())
        .await?;
    let profile = listing.profile;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        display_name: profile.display_name(),
        username: profile.username,
        first_name: profile.first_name,
        last_name: profile.last_name,
        joined_at: profile.created_at,
        posts: presenters::page(listing.posts, presenters::post_summary),
    }))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = ProfileChanges {
        username: req.username,
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
    };

    let user = state
        .blog
        .update_profile(&identity.viewer(), changes, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(presenters::user(user)))
}

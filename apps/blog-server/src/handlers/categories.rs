//! Category and location handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_shared::dto::{CategoryPostsResponse, PageQuery};

use super::presenters;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.blog.list_categories().await?;

    Ok(HttpResponse::Ok().json(
        categories
            .into_iter()
            .map(presenters::category)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/categories/{slug}/posts?page=
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .blog
        .list_category_posts(&path.into_inner(), presenters::page_number(&query), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: presenters::category(listing.category),
        posts: presenters::page(listing.posts, presenters::post_summary),
    }))
}

/// GET /api/locations
pub async fn locations(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations = state.blog.list_locations().await?;

    Ok(HttpResponse::Ok().json(
        locations
            .into_iter()
            .map(presenters::location)
            .collect::<Vec<_>>(),
    ))
}

//! Authentication handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::domain::{NewAccount, User};
use blog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::presenters;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let account = NewAccount {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let user = state
        .blog
        .register(account, state.passwords.as_ref(), Utc::now())
        .await?;

    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .blog
        .authenticate(&req.username, &req.password, state.passwords.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.blog.current_user(&identity.viewer()).await?;

    Ok(HttpResponse::Ok().json(presenters::user(user)))
}

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use blog_core::domain::{Category, CommentDraft, Post, PostDraft, User, Viewer};
use blog_core::ports::BaseRepository;
use blog_infra::{Argon2PasswordService, InMemoryBlogStore, JwtConfig, JwtTokenService};

use super::{configure_routes, not_found};
use crate::state::AppState;

struct Harness {
    state: AppState,
    travel: Category,
}

async fn harness() -> Harness {
    let store = InMemoryBlogStore::new();
    let repos = store.repositories();
    let travel = repos
        .categories
        .save(Category::new("Travel".into(), "Trips".into(), "travel".into(), Utc::now()))
        .await
        .unwrap();

    let tokens = JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".into(),
        expiration_hours: 1,
        issuer: "blog-test".into(),
    });
    let passwords = Argon2PasswordService::with_params(1024, 1, 1).unwrap();

    Harness {
        state: AppState::with_repositories(repos, "memory", Arc::new(tokens), Arc::new(passwords)),
        travel,
    }
}

impl Harness {
    async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .state
            .blog
            .repositories()
            .users
            .save(User::new(
                username.into(),
                format!("{username}@example.com"),
                "unused".into(),
                Utc::now(),
            ))
            .await
            .unwrap();
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        (user, token)
    }

    async fn post(&self, author: &User, is_published: bool) -> Post {
        let draft = PostDraft {
            title: "A trip".into(),
            text: "It was long".into(),
            pub_date: Utc::now() - TimeDelta::hours(1),
            image: None,
            location_id: None,
            category_id: Some(self.travel.id),
            is_published,
        };
        self.state
            .blog
            .create_post(&Viewer::user(author.id), draft, Utc::now())
            .await
            .unwrap()
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes)
                .default_service(web::to(not_found)),
        )
        .await
    };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_unknown_route_is_json_404() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["instance"], "/nowhere");
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "long enough"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "carol", "password": "long enough"}))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let token = login["access_token"].as_str().unwrap().to_string();
    assert_eq!(login["token_type"], "Bearer");

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "carol");
    assert!(me.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "carol", "password": "wrong password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_duplicate_username_is_conflict() {
    let h = harness().await;
    h.user("bob").await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "bob",
            "email": "other@example.com",
            "password": "long enough"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_anonymous_cannot_create_post() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "t", "text": "x", "category_id": h.travel.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_post_then_list() {
    let h = harness().await;
    let (_bob, token) = h.user("bob").await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "Hello",
            "text": "First post",
            "pub_date": (Utc::now() - TimeDelta::minutes(5)).to_rfc3339(),
            "category_id": h.travel.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(header::LOCATION));

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["title"], "Hello");
    assert_eq!(page["items"][0]["author"]["username"], "bob");
}

#[actix_web::test]
async fn test_invalid_post_is_unprocessable() {
    let h = harness().await;
    let (_bob, token) = h.user("bob").await;
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({"title": "   ", "text": "x", "category_id": h.travel.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_index_page_out_of_range_is_404() {
    let h = harness().await;
    let app = app!(h.state);

    let req = test::TestRequest::get().uri("/api/posts?page=2").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_page_out_of_range_falls_back() {
    let h = harness().await;
    let (bob, _) = h.user("bob").await;
    h.post(&bob, true).await;
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/profile/bob?page=99")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["username"], "bob");
    assert_eq!(body["posts"]["page"], 1);
    assert_eq!(body["posts"]["items"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_non_numeric_index_page() {
    let h = harness().await;
    let (bob, _) = h.user("bob").await;
    h.post(&bob, true).await;
    let app = app!(h.state);

    let req = test::TestRequest::get().uri("/api/posts?page=abc").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/posts?page=last").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_non_numeric_profile_page_is_first_page() {
    let h = harness().await;
    let (bob, _) = h.user("bob").await;
    for _ in 0..12 {
        h.post(&bob, true).await;
    }
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/profile/bob?page=abc")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"]["page"], 1);
    assert_eq!(body["posts"]["items"].as_array().unwrap().len(), 10);

    let req = test::TestRequest::get()
        .uri("/api/profile/bob?page=last")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"]["page"], 2);
    assert_eq!(body["posts"]["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_draft_detail_visible_only_to_author() {
    let h = harness().await;
    let (bob, bob_token) = h.user("bob").await;
    let (_alice, alice_token) = h.user("alice").await;
    let draft = h.post(&bob, false).await;
    let app = app!(h.state);
    let uri = format!("/api/posts/{}", draft.id);

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&alice_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&bob_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], json!(draft.id));
    assert!(body["comments"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("{uri}/comments"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_non_author_post_edit_redirects_to_detail() {
    let h = harness().await;
    let (bob, _) = h.user("bob").await;
    let (_alice, alice_token) = h.user("alice").await;
    let post = h.post(&bob, true).await;
    let app = app!(h.state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&alice_token))
        .set_json(json!({"title": "Mine now", "text": "x", "category_id": h.travel.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/api/posts/{}", post.id).as_str()
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&alice_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);

    let unchanged = h
        .state
        .blog
        .get_post_detail(post.id, &Viewer::anonymous(), Utc::now())
        .await
        .unwrap();
    assert_eq!(unchanged.post.title, "A trip");
}

#[actix_web::test]
async fn test_non_author_partial_edit_redirects() {
    let h = harness().await;
    let (bob, _) = h.user("bob").await;
    let (_alice, alice_token) = h.user("alice").await;
    let post = h.post(&bob, true).await;
    let app = app!(h.state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&alice_token))
        .set_json(json!({"text": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/api/posts/{}", post.id).as_str()
    );
}

#[actix_web::test]
async fn test_author_deletes_post() {
    let h = harness().await;
    let (bob, bob_token) = h.user("bob").await;
    let post = h.post(&bob, true).await;
    let app = app!(h.state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_foreign_comment_edit_is_404() {
    let h = harness().await;
    let (bob, bob_token) = h.user("bob").await;
    let (alice, alice_token) = h.user("alice").await;
    let post = h.post(&bob, true).await;
    let comment = h
        .state
        .blog
        .add_comment(
            post.id,
            &Viewer::user(alice.id),
            CommentDraft { text: "nice".into() },
            Utc::now(),
        )
        .await
        .unwrap();
    let app = app!(h.state);
    let uri = format!("/api/posts/{}/comments/{}", post.id, comment.id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&bob_token))
        .set_json(json!({"text": "edited by bob"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&alice_token))
        .set_json(json!({"text": "edited"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["text"], "edited");

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/comments", post.id))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments[0]["author"]["username"], "alice");
}

#[actix_web::test]
async fn test_owner_empty_comment_edit_is_404() {
    let h = harness().await;
    let (bob, _) = h.user("bob").await;
    let (alice, alice_token) = h.user("alice").await;
    let post = h.post(&bob, true).await;
    let comment = h
        .state
        .blog
        .add_comment(
            post.id,
            &Viewer::user(alice.id),
            CommentDraft { text: "nice".into() },
            Utc::now(),
        )
        .await
        .unwrap();
    let app = app!(h.state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{}/comments/{}", post.id, comment.id))
        .insert_header(bearer(&alice_token))
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_hidden_category_listing_is_404() {
    let h = harness().await;
    let mut secret = Category::new("Secret".into(), "".into(), "secret".into(), Utc::now());
    secret.is_published = false;
    h.state
        .blog
        .repositories()
        .categories
        .save(secret)
        .await
        .unwrap();
    let app = app!(h.state);

    let req = test::TestRequest::get()
        .uri("/api/categories/secret/posts")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let categories: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(categories.as_array().unwrap().len(), 1);
    assert_eq!(categories[0]["slug"], "travel");
}

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait, Value};
use uuid::Uuid;

use blog_core::domain::{Category, Post};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostFilter, PostRepository,
};

use super::entity::{category, post, user};
use super::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    comments_query, filtered_posts, listing_query,
};

fn postgres_sql(query: impl QueryTrait) -> String {
    query.build(DatabaseBackend::Postgres).to_string()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: now.into(),
            image: None,
            location_id: None,
            category_id: None,
            is_published: true,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let now = Utc::now();
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![category::Model {
            id,
            title: "Travel".to_owned(),
            description: "Trips".to_owned(),
            slug: "travel".to_owned(),
            is_published: false,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let found = repo.find_by_slug("travel").await.unwrap().unwrap();

    assert_eq!(found.id, id);
    assert!(!found.is_published);
}

#[tokio::test]
async fn test_find_owned_comment_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<super::entity::comment::Model>::new()])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let found = repo.find_owned(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let result = BaseRepository::<Category, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[test]
fn test_index_query_joins_published_categories() {
    let filter = PostFilter::public(Utc::now()).with_published_category();

    let sql = postgres_sql(listing_query(&filter, 20, 10));

    assert!(sql.contains(
        r#"INNER JOIN "categories" ON "posts"."category_id" = "categories"."id""#
    ));
    assert!(sql.contains(r#""categories"."is_published" = TRUE"#));
    assert!(sql.contains(r#""posts"."is_published" = TRUE"#));
    assert!(sql.contains(r#""posts"."pub_date" <= "#));
    assert!(sql.contains(r#"ORDER BY "posts"."pub_date" DESC, "posts"."created_at" DESC"#));
    assert!(sql.contains("LIMIT 10 OFFSET 20"));
}

#[test]
fn test_category_and_profile_queries_skip_category_join() {
    let now = Utc::now();
    let category_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let sql = postgres_sql(filtered_posts(&PostFilter::public(now).in_category(category_id)));
    assert!(!sql.contains("JOIN"));
    assert!(sql.contains(&format!(r#""posts"."category_id" = '{category_id}'"#)));

    let sql = postgres_sql(filtered_posts(&PostFilter::default().by_author(author_id)));
    assert!(!sql.contains("JOIN"));
    assert!(!sql.contains("is_published"));
    assert!(sql.contains(&format!(r#""posts"."author_id" = '{author_id}'"#)));
}

#[test]
fn test_comments_query_is_oldest_first_with_authors() {
    let post_id = Uuid::new_v4();

    let sql = postgres_sql(comments_query(post_id));

    assert!(sql.contains(r#"LEFT JOIN "users" ON "comments"."author_id" = "users"."id""#));
    assert!(sql.contains(&format!(r#""comments"."post_id" = '{post_id}'"#)));
    assert!(sql.contains(r#"ORDER BY "comments"."created_at" ASC"#));
}

#[tokio::test]
async fn test_find_entry_hydrates_author_category_and_comment_count() {
    let now = Utc::now();
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();

    let count_row = BTreeMap::from([
        ("post_id", Value::from(post_id)),
        ("total_comments", Value::from(3i64)),
    ]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: now.into(),
            image: None,
            location_id: None,
            category_id: Some(category_id),
            is_published: true,
            created_at: now.into(),
        }]])
        .append_query_results(vec![vec![user::Model {
            id: author_id,
            username: "bob".to_owned(),
            email: "bob@example.com".to_owned(),
            first_name: "Bob".to_owned(),
            last_name: "Smith".to_owned(),
            password_hash: "hash".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results(vec![vec![category::Model {
            id: category_id,
            title: "Travel".to_owned(),
            description: "Trips".to_owned(),
            slug: "travel".to_owned(),
            is_published: true,
            created_at: now.into(),
        }]])
        .append_query_results(vec![vec![count_row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let entry = repo.find_entry(post_id).await.unwrap().unwrap();

    assert_eq!(entry.post.id, post_id);
    assert_eq!(entry.author.username, "bob");
    assert_eq!(entry.category.map(|c| c.slug).as_deref(), Some("travel"));
    assert!(entry.location.is_none());
    assert_eq!(entry.comment_count, 3);

    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 4);
    let counts = &log[3].statements()[0].sql;
    assert!(counts.contains(r#"COUNT("comments"."id") AS "total_comments""#));
    assert!(counts.contains(r#"GROUP BY "comments"."post_id""#));
}

#[tokio::test]
async fn test_find_entry_without_comments_counts_zero() {
    let now = Utc::now();
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            title: "Quiet".to_owned(),
            text: "Nobody replied".to_owned(),
            pub_date: now.into(),
            image: None,
            location_id: None,
            category_id: None,
            is_published: true,
            created_at: now.into(),
        }]])
        .append_query_results(vec![vec![user::Model {
            id: author_id,
            username: "bob".to_owned(),
            email: "bob@example.com".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "hash".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results(vec![Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let entry = repo.find_entry(post_id).await.unwrap().unwrap();

    assert!(entry.category.is_none());
    assert_eq!(entry.comment_count, 0);
}

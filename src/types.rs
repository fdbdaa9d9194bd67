use actix_web::web;
use libsql::Database;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

pub const PER_PAGE: u32 = 15;

// DB Types

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub profile_image: String,
    pub blur_hash: String,
    pub date_of_birth: Option<String>,
    pub description: Option<String>,
    pub localization: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub image: Option<String>,
    pub blur_hash: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub comment: String,
    pub author_id: i64,
    pub post_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LikedPost {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LikedComment {
    pub id: i64,
    pub user_id: i64,
    pub comment_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SharedPost {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Follower {
    pub id: i64,
    pub user_id: i64,
    pub follower_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Tag {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Single-post response shape: the post row plus its tag rows.
#[derive(Serialize, Debug)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub tags: Vec<Tag>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTag {
    pub content: String,
    pub tag_count: i64,
}

// Feed Types

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Post,
    SharedPost,
}

/// One entry of an activity feed. `post_id` is always the identity of the
/// underlying original post, also for reshares. Built per request, never
/// stored.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ActivityItem {
    pub fn from_post(post: &Post) -> Self {
        ActivityItem {
            kind: ActivityKind::Post,
            id: post.id,
            post_id: post.id,
            user_id: post.author_id,
            created_at: post.created_at,
        }
    }

    pub fn from_shared_post(shared: &SharedPost) -> Self {
        ActivityItem {
            kind: ActivityKind::SharedPost,
            id: shared.id,
            post_id: shared.post_id,
            user_id: shared.user_id,
            created_at: shared.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, current_page: u32) -> Self {
        let last_page = ((total.div_ceil(PER_PAGE as u64)) as u32).max(1);
        Page {
            items,
            total,
            per_page: PER_PAGE,
            current_page,
            last_page,
        }
    }
}

// JSON Types

#[derive(Deserialize)]
pub struct RegisterInfo {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginInfo {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct NewPost {
    pub title: String,
    pub slug: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: i64,
    pub comment: String,
}

#[derive(Deserialize)]
pub struct UpdateComment {
    pub comment: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub description: Option<String>,
    pub localization: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Serialize)]
pub struct SearchResults {
    pub query: String,
    pub users: Vec<User>,
    pub posts: Vec<Post>,
}

// Server Types

#[derive(Serialize)]
pub struct Success {
    pub message: String,
}

#[derive(Serialize)]
pub struct Failure {
    pub errors: String,
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct StringError(pub String);

pub struct AppState {
    pub db: Database,
}

pub type AppData = web::Data<AppState>;

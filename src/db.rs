use std::env;

use libsql::{Builder, Connection, Database, OpenFlags};

use crate::types::StringError;

pub async fn get_database() -> Database {
    let use_local = env::var("USE_LOCAL").unwrap_or("false".into());
    if use_local == "false" {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let auth_key = env::var("DATABASE_AUTH_KEY").expect("DATABASE_AUTH_KEY must be set");
        Builder::new_remote(database_url, auth_key)
            .build()
            .await
            .unwrap()
    } else {
        Builder::new_local(env::var("LOCAL_DB_URL").expect("LOCAL_DB_URL must be set"))
            .flags(OpenFlags::default())
            .build()
            .await
            .unwrap()
    }
}

pub const USERS_T: &str = "users";
pub const POSTS_T: &str = "posts";
pub const COMMENTS_T: &str = "comments";
pub const LIKED_POSTS_T: &str = "liked_posts";
pub const LIKED_COMMENTS_T: &str = "liked_comments";
pub const SHARED_POSTS_T: &str = "shared_posts";
pub const FOLLOWER_USER_T: &str = "follower_user";
pub const TAGS_T: &str = "tags";
pub const TOKENS_T: &str = "tokens";

pub const VERSION_T: &str = "db_version";

async fn v1(conn: Connection) -> anyhow::Result<()> {
    #[rustfmt::skip]
    let stmnts = [
        format!(
            "CREATE TABLE IF NOT EXISTS `{USERS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `name` TEXT NOT NULL,
                `nickname` TEXT NOT NULL UNIQUE,
                `email` TEXT NOT NULL UNIQUE,
                `password` TEXT NOT NULL,
                `profile_image` TEXT NOT NULL,
                `blur_hash` TEXT NOT NULL,
                `date_of_birth` TEXT,
                `description` TEXT,
                `localization` TEXT,
                `created_at` TEXT NOT NULL,
                `updated_at` TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{POSTS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `title` TEXT NOT NULL,
                `slug` TEXT NOT NULL,
                `author_id` INTEGER NOT NULL,
                `image` TEXT,
                `blur_hash` TEXT,
                `created_at` TEXT NOT NULL,
                `updated_at` TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{COMMENTS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `comment` TEXT NOT NULL,
                `author_id` INTEGER NOT NULL,
                `post_id` INTEGER NOT NULL,
                `created_at` TEXT NOT NULL,
                `updated_at` TEXT NOT NULL
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{LIKED_POSTS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `user_id` INTEGER NOT NULL,
                `post_id` INTEGER NOT NULL,
                `created_at` TEXT NOT NULL,
                UNIQUE(`user_id`, `post_id`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{LIKED_COMMENTS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `user_id` INTEGER NOT NULL,
                `comment_id` INTEGER NOT NULL,
                `created_at` TEXT NOT NULL,
                UNIQUE(`user_id`, `comment_id`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{SHARED_POSTS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `user_id` INTEGER NOT NULL,
                `post_id` INTEGER NOT NULL,
                `created_at` TEXT NOT NULL,
                UNIQUE(`user_id`, `post_id`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{FOLLOWER_USER_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `user_id` INTEGER NOT NULL,
                `follower_id` INTEGER NOT NULL,
                `created_at` TEXT NOT NULL,
                UNIQUE(`user_id`, `follower_id`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{TAGS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `post_id` INTEGER NOT NULL,
                `content` TEXT NOT NULL,
                `created_at` TEXT NOT NULL
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_tags_content ON {TAGS_T} (content)"),
        format!(
            "CREATE TABLE IF NOT EXISTS `{TOKENS_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `user_id` INTEGER NOT NULL,
                `key` TEXT NOT NULL UNIQUE,
                `timestamp` TEXT NOT NULL
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_tokens_key ON {TOKENS_T} (key)"),
        format!(
            "CREATE TABLE IF NOT EXISTS `{VERSION_T}`(
                `id` INTEGER NOT NULL PRIMARY KEY,
                `version_number` INTEGER NOT NULL
            )"
        ),
    ];

    let mut _res = conn
        .execute_transactional_batch(&stmnts.join(";\n"))
        .await?;

    Ok(())
}

async fn get_version_number(conn: Connection) -> anyhow::Result<u32> {
    let mut res = conn
        .query(&format!("SELECT * FROM {VERSION_T} WHERE id = ?1"), [1])
        .await?;

    debug_assert_eq!(
        "version_number",
        res.column_name(1)
            .ok_or_else(|| StringError("Missing second column in version table".into()))?
    );

    let Some(row) = res.next().await? else {
        return Ok(1);
    };

    Ok(row.get(1)?)
}

async fn v2(conn: Connection) -> anyhow::Result<()> {
    #[rustfmt::skip]
    let stmnts = [
        format!("INSERT INTO {VERSION_T} (version_number) VALUES (2)"),
        format!("CREATE INDEX IF NOT EXISTS idx_posts_author ON {POSTS_T} (author_id)"),
        format!("CREATE INDEX IF NOT EXISTS idx_shared_posts_user ON {SHARED_POSTS_T} (user_id)"),
        format!("CREATE INDEX IF NOT EXISTS idx_follower_user_follower ON {FOLLOWER_USER_T} (follower_id)"),
    ];

    let mut _res = conn
        .execute_transactional_batch(&stmnts.join(";\n"))
        .await?;

    Ok(())
}

pub async fn migrate_db(conn: Connection) -> anyhow::Result<()> {
    v1(conn.clone()).await?;

    let version_number = get_version_number(conn.clone()).await?;

    if version_number < 2 {
        v2(conn.clone()).await?;
    }

    Ok(())
}

use libsql::{Connection, params};

use crate::{
    db::{LIKED_COMMENTS_T, LIKED_POSTS_T},
    filters::Condition,
    types::{LikedComment, LikedPost, Page},
    utils::now_rfc3339,
};

// Post likes

pub async fn find_post_like(
    db: Connection,
    user_id: i64,
    post_id: i64,
) -> anyhow::Result<Option<LikedPost>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {LIKED_POSTS_T} WHERE user_id = ?1 AND post_id = ?2"),
            [user_id, post_id],
        )
        .await?;
    super::first_row(rows).await
}

pub async fn insert_post_like(db: Connection, user_id: i64, post_id: i64) -> anyhow::Result<()> {
    db.execute(
        &format!(
            "INSERT INTO {LIKED_POSTS_T} (user_id, post_id, created_at) VALUES (?1, ?2, ?3)"
        ),
        params![user_id, post_id, now_rfc3339()],
    )
    .await?;
    Ok(())
}

pub async fn delete_post_like(db: Connection, user_id: i64, post_id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(
            &format!("DELETE FROM {LIKED_POSTS_T} WHERE user_id = ?1 AND post_id = ?2"),
            [user_id, post_id],
        )
        .await?;
    Ok(affected)
}

pub async fn list_post_likes(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<LikedPost>> {
    super::list_page(&db, LIKED_POSTS_T, conditions, page).await
}

// Comment likes

pub async fn find_comment_like(
    db: Connection,
    user_id: i64,
    comment_id: i64,
) -> anyhow::Result<Option<LikedComment>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {LIKED_COMMENTS_T} WHERE user_id = ?1 AND comment_id = ?2"),
            [user_id, comment_id],
        )
        .await?;
    super::first_row(rows).await
}

pub async fn insert_comment_like(
    db: Connection,
    user_id: i64,
    comment_id: i64,
) -> anyhow::Result<()> {
    db.execute(
        &format!(
            "INSERT INTO {LIKED_COMMENTS_T} (user_id, comment_id, created_at) VALUES (?1, ?2, ?3)"
        ),
        params![user_id, comment_id, now_rfc3339()],
    )
    .await?;
    Ok(())
}

pub async fn delete_comment_like(
    db: Connection,
    user_id: i64,
    comment_id: i64,
) -> anyhow::Result<u64> {
    let affected = db
        .execute(
            &format!("DELETE FROM {LIKED_COMMENTS_T} WHERE user_id = ?1 AND comment_id = ?2"),
            [user_id, comment_id],
        )
        .await?;
    Ok(affected)
}

pub async fn list_comment_likes(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<LikedComment>> {
    super::list_page(&db, LIKED_COMMENTS_T, conditions, page).await
}

use libsql::{Connection, params};

use crate::{
    db::FOLLOWER_USER_T,
    filters::Condition,
    types::{Follower, Page},
    utils::now_rfc3339,
};

pub async fn is_following(db: Connection, follower_id: i64, user_id: i64) -> anyhow::Result<bool> {
    let mut rows = db
        .query(
            &format!(
                "SELECT id FROM {FOLLOWER_USER_T} WHERE follower_id = ?1 AND user_id = ?2 LIMIT 1"
            ),
            [follower_id, user_id],
        )
        .await?;
    Ok(rows.next().await?.is_some())
}

pub async fn insert_follow(db: Connection, follower_id: i64, user_id: i64) -> anyhow::Result<()> {
    db.execute(
        &format!(
            "INSERT INTO {FOLLOWER_USER_T} (user_id, follower_id, created_at) VALUES (?1, ?2, ?3)"
        ),
        params![user_id, follower_id, now_rfc3339()],
    )
    .await?;
    Ok(())
}

pub async fn delete_follow(db: Connection, follower_id: i64, user_id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(
            &format!("DELETE FROM {FOLLOWER_USER_T} WHERE follower_id = ?1 AND user_id = ?2"),
            [follower_id, user_id],
        )
        .await?;
    Ok(affected)
}

/// Rows where the given user is the one being followed.
pub async fn followers_of(
    db: Connection,
    user_id: i64,
    page: u32,
) -> anyhow::Result<Page<Follower>> {
    let conditions = [Condition {
        column: "user_id".into(),
        op: "=".into(),
        value: user_id.to_string(),
    }];
    super::list_page(&db, FOLLOWER_USER_T, &conditions, page).await
}

/// Rows where the given user is the follower.
pub async fn followings_of(
    db: Connection,
    follower_id: i64,
    page: u32,
) -> anyhow::Result<Page<Follower>> {
    let conditions = [Condition {
        column: "follower_id".into(),
        op: "=".into(),
        value: follower_id.to_string(),
    }];
    super::list_page(&db, FOLLOWER_USER_T, &conditions, page).await
}

/// Ids of everyone the given user follows, for the following feed.
pub async fn following_ids(db: Connection, follower_id: i64) -> anyhow::Result<Vec<i64>> {
    let mut rows = db
        .query(
            &format!(
                "SELECT user_id FROM {FOLLOWER_USER_T} WHERE follower_id = ?1 ORDER BY id DESC"
            ),
            [follower_id],
        )
        .await?;

    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<i64>(0)?);
    }
    Ok(ids)
}

pub async fn list_follows(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<Follower>> {
    super::list_page(&db, FOLLOWER_USER_T, conditions, page).await
}

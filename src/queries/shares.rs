use libsql::{Connection, Value, params, params_from_iter};

use crate::{
    db::SHARED_POSTS_T,
    filters::Condition,
    types::{Page, SharedPost},
    utils::now_rfc3339,
};

pub async fn find_share(
    db: Connection,
    user_id: i64,
    post_id: i64,
) -> anyhow::Result<Option<SharedPost>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {SHARED_POSTS_T} WHERE user_id = ?1 AND post_id = ?2"),
            [user_id, post_id],
        )
        .await?;
    super::first_row(rows).await
}

pub async fn insert_share(db: Connection, user_id: i64, post_id: i64) -> anyhow::Result<()> {
    db.execute(
        &format!(
            "INSERT INTO {SHARED_POSTS_T} (user_id, post_id, created_at) VALUES (?1, ?2, ?3)"
        ),
        params![user_id, post_id, now_rfc3339()],
    )
    .await?;
    Ok(())
}

pub async fn delete_share(db: Connection, user_id: i64, post_id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(
            &format!("DELETE FROM {SHARED_POSTS_T} WHERE user_id = ?1 AND post_id = ?2"),
            [user_id, post_id],
        )
        .await?;
    Ok(affected)
}

pub async fn list_shares(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<SharedPost>> {
    super::list_page(&db, SHARED_POSTS_T, conditions, page).await
}

/// All reshares created by any of the given users, newest first. The other
/// half of the activity-feed merge.
pub async fn shares_by_users(db: Connection, user_ids: &[i64]) -> anyhow::Result<Vec<SharedPost>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT * FROM {SHARED_POSTS_T} WHERE user_id IN ({}) ORDER BY created_at DESC",
        super::placeholders(1, user_ids.len())
    );
    let values: Vec<Value> = user_ids.iter().map(|id| Value::Integer(*id)).collect();

    let rows = db.query(&sql, params_from_iter(values)).await?;
    super::collect_rows(rows).await
}

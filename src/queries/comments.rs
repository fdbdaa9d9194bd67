use libsql::{Connection, params};

use crate::{
    db::COMMENTS_T,
    filters::Condition,
    types::{Comment, Page, StringError},
    utils::now_rfc3339,
};

pub async fn insert_comment(
    db: Connection,
    author_id: i64,
    post_id: i64,
    comment: &str,
) -> anyhow::Result<Comment> {
    let now = now_rfc3339();
    db.execute(
        &format!(
            "INSERT INTO {COMMENTS_T} (comment, author_id, post_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)"
        ),
        params![comment, author_id, post_id, now],
    )
    .await?;

    let id = db.last_insert_rowid();
    get_comment(db, id)
        .await?
        .ok_or_else(|| StringError("Inserted comment not found".into()).into())
}

pub async fn get_comment(db: Connection, id: i64) -> anyhow::Result<Option<Comment>> {
    let rows = db
        .query(&format!("SELECT * FROM {COMMENTS_T} WHERE id = ?1"), [id])
        .await?;
    super::first_row(rows).await
}

pub async fn comment_exists(db: Connection, id: i64) -> anyhow::Result<bool> {
    Ok(get_comment(db, id).await?.is_some())
}

pub async fn list_comments(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<Comment>> {
    super::list_page(&db, COMMENTS_T, conditions, page).await
}

pub async fn update_comment(db: Connection, id: i64, comment: &str) -> anyhow::Result<()> {
    db.execute(
        &format!("UPDATE {COMMENTS_T} SET comment = ?1, updated_at = ?2 WHERE id = ?3"),
        params![comment, now_rfc3339(), id],
    )
    .await?;
    Ok(())
}

pub async fn delete_comment(db: Connection, id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(&format!("DELETE FROM {COMMENTS_T} WHERE id = ?1"), [id])
        .await?;
    Ok(affected)
}

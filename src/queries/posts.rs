use libsql::{Connection, Value, params, params_from_iter};

use crate::{
    db::POSTS_T,
    filters::Condition,
    types::{Page, Post, StringError},
    utils::now_rfc3339,
};

pub async fn insert_post(
    db: Connection,
    author_id: i64,
    title: &str,
    slug: &str,
) -> anyhow::Result<Post> {
    let now = now_rfc3339();
    db.execute(
        &format!(
            "INSERT INTO {POSTS_T} (title, slug, author_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)"
        ),
        params![title, slug, author_id, now],
    )
    .await?;

    let id = db.last_insert_rowid();
    get_post(db, id)
        .await?
        .ok_or_else(|| StringError("Inserted post not found".into()).into())
}

pub async fn get_post(db: Connection, id: i64) -> anyhow::Result<Option<Post>> {
    let rows = db
        .query(&format!("SELECT * FROM {POSTS_T} WHERE id = ?1"), [id])
        .await?;
    super::first_row(rows).await
}

pub async fn post_exists(db: Connection, id: i64) -> anyhow::Result<bool> {
    Ok(get_post(db, id).await?.is_some())
}

pub async fn list_posts(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<Post>> {
    super::list_page(&db, POSTS_T, conditions, page).await
}

pub async fn update_post(
    db: Connection,
    id: i64,
    title: Option<&str>,
    slug: Option<&str>,
) -> anyhow::Result<()> {
    let mut sets = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    for (column, value) in [("title", title), ("slug", slug)] {
        if let Some(value) = value {
            values.push(Value::Text(value.to_string()));
            sets.push(format!("{column} = ?{}", values.len()));
        }
    }

    values.push(Value::Text(now_rfc3339()));
    sets.push(format!("updated_at = ?{}", values.len()));

    values.push(Value::Integer(id));
    let sql = format!(
        "UPDATE {POSTS_T} SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len()
    );

    db.execute(&sql, params_from_iter(values)).await?;
    Ok(())
}

pub async fn delete_post(db: Connection, id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(&format!("DELETE FROM {POSTS_T} WHERE id = ?1"), [id])
        .await?;
    Ok(affected)
}

/// All posts authored by any of the given users, newest first. Feeds both
/// the profile-activity and the following-feed merge.
pub async fn posts_by_authors(db: Connection, author_ids: &[i64]) -> anyhow::Result<Vec<Post>> {
    if author_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT * FROM {POSTS_T} WHERE author_id IN ({}) ORDER BY created_at DESC",
        super::placeholders(1, author_ids.len())
    );
    let values: Vec<Value> = author_ids.iter().map(|id| Value::Integer(*id)).collect();

    let rows = db.query(&sql, params_from_iter(values)).await?;
    super::collect_rows(rows).await
}

pub async fn search_posts_by_title(db: Connection, query: &str) -> anyhow::Result<Vec<Post>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {POSTS_T} WHERE title LIKE ?1 ORDER BY id DESC LIMIT 15"),
            [format!("%{query}%")],
        )
        .await?;
    super::collect_rows(rows).await
}

pub async fn posts_by_ids(db: Connection, ids: &[i64]) -> anyhow::Result<Vec<Post>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT * FROM {POSTS_T} WHERE id IN ({}) ORDER BY id DESC LIMIT 15",
        super::placeholders(1, ids.len())
    );
    let values: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();

    let rows = db.query(&sql, params_from_iter(values)).await?;
    super::collect_rows(rows).await
}

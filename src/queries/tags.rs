use libsql::{Connection, params};

use crate::{
    db::TAGS_T,
    types::{Tag, TrendingTag},
    utils::now_rfc3339,
};

/// Attaches tags to a post, skipping contents the post already carries.
pub async fn insert_tags(db: Connection, post_id: i64, tags: &[String]) -> anyhow::Result<()> {
    for tag in tags {
        let mut existing = db
            .query(
                &format!("SELECT id FROM {TAGS_T} WHERE post_id = ?1 AND content = ?2 LIMIT 1"),
                params![post_id, tag.as_str()],
            )
            .await?;
        if existing.next().await?.is_some() {
            continue;
        }

        db.execute(
            &format!("INSERT INTO {TAGS_T} (post_id, content, created_at) VALUES (?1, ?2, ?3)"),
            params![post_id, tag.as_str(), now_rfc3339()],
        )
        .await?;
    }
    Ok(())
}

/// Drops the old tag set and writes the new one, for post edits.
pub async fn replace_tags(db: Connection, post_id: i64, tags: &[String]) -> anyhow::Result<()> {
    delete_tags_for_post(db.clone(), post_id).await?;
    insert_tags(db, post_id, tags).await
}

pub async fn delete_tags_for_post(db: Connection, post_id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(&format!("DELETE FROM {TAGS_T} WHERE post_id = ?1"), [post_id])
        .await?;
    Ok(affected)
}

pub async fn tags_for_post(db: Connection, post_id: i64) -> anyhow::Result<Vec<Tag>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {TAGS_T} WHERE post_id = ?1 ORDER BY id ASC"),
            [post_id],
        )
        .await?;
    super::collect_rows(rows).await
}

/// Ten most used tag contents, most frequent first.
pub async fn trending_tags(db: Connection) -> anyhow::Result<Vec<TrendingTag>> {
    let mut rows = db
        .query(
            &format!(
                "SELECT content, COUNT(*) AS tag_count
                FROM {TAGS_T}
                GROUP BY content
                ORDER BY tag_count DESC
                LIMIT 10"
            ),
            params!(),
        )
        .await?;

    let mut tags = Vec::new();
    while let Some(row) = rows.next().await? {
        tags.push(TrendingTag {
            content: row.get(0)?,
            tag_count: row.get(1)?,
        });
    }
    Ok(tags)
}

/// Posts carrying the given tag content, for `#tag` searches.
pub async fn post_ids_with_tag(db: Connection, content: &str) -> anyhow::Result<Vec<i64>> {
    let mut rows = db
        .query(
            &format!("SELECT post_id FROM {TAGS_T} WHERE content = ?1"),
            [content],
        )
        .await?;

    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<i64>(0)?);
    }
    Ok(ids)
}

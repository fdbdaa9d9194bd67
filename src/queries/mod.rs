use libsql::{Connection, Rows, Value, de, params_from_iter};
use serde::de::DeserializeOwned;

use crate::{
    filters::{Condition, bind_values, where_clause},
    types::{PER_PAGE, Page},
};

pub mod comments;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod shares;
pub mod tags;
pub mod users;

pub(crate) async fn collect_rows<T: DeserializeOwned>(mut rows: Rows) -> anyhow::Result<Vec<T>> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        let item: T = de::from_row(&row)?;
        out.push(item);
    }
    Ok(out)
}

pub(crate) async fn first_row<T: DeserializeOwned>(mut rows: Rows) -> anyhow::Result<Option<T>> {
    let Some(row) = rows.next().await? else {
        return Ok(None);
    };
    Ok(Some(de::from_row(&row)?))
}

async fn count_where(
    db: &Connection,
    table: &str,
    clause: &str,
    values: Vec<Value>,
) -> anyhow::Result<u64> {
    let sql = if clause.is_empty() {
        format!("SELECT COUNT(*) FROM {table}")
    } else {
        format!("SELECT COUNT(*) FROM {table} WHERE {clause}")
    };

    let mut result = db.query(&sql, params_from_iter(values)).await?;
    let Some(row) = result.next().await? else {
        return Ok(0);
    };
    Ok(row.get::<i64>(0)? as u64)
}

/// Shared listing path: no conditions means a plain `ORDER BY id DESC` page,
/// otherwise the conditions are AND-ed into the WHERE clause. Values are
/// bound after the condition placeholders, so LIMIT/OFFSET come last.
pub(crate) async fn list_page<T: DeserializeOwned>(
    db: &Connection,
    table: &str,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<T>> {
    let page = page.max(1);
    let clause = where_clause(conditions);
    let mut values = bind_values(conditions);

    let total = count_where(db, table, &clause, values.clone()).await?;

    let n = values.len();
    values.push(Value::Integer(PER_PAGE as i64));
    values.push(Value::Integer(page_offset(page)));

    let sql = if clause.is_empty() {
        format!("SELECT * FROM {table} ORDER BY id DESC LIMIT ?1 OFFSET ?2")
    } else {
        format!(
            "SELECT * FROM {table} WHERE {clause} ORDER BY id DESC LIMIT ?{} OFFSET ?{}",
            n + 1,
            n + 2
        )
    };

    let rows = db.query(&sql, params_from_iter(values)).await?;
    let items = collect_rows(rows).await?;

    Ok(Page::new(items, total, page))
}

/// OFFSET value for a 1-based page, widened past u32 so a huge page
/// number can't wrap.
pub(crate) fn page_offset(page: u32) -> i64 {
    (page as i64 - 1) * PER_PAGE as i64
}

/// `?1, ?2, ...` fragment for an IN list, starting at `start`.
pub(crate) fn placeholders(start: usize, len: usize) -> String {
    use itertools::Itertools;

    (start..start + len).map(|i| format!("?{i}")).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_handles_maximum_page_number() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 15);
        assert_eq!(page_offset(u32::MAX), (u32::MAX as i64 - 1) * 15);
    }
}

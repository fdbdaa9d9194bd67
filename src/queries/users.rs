use libsql::{Connection, Value, params, params_from_iter};

use crate::{
    db::{FOLLOWER_USER_T, USERS_T},
    filters::Condition,
    types::{Page, StringError, User},
    utils::now_rfc3339,
};

const DEFAULT_PROFILE_IMAGE: &str = "profile_images/default_profile_image.png";
const DEFAULT_BLUR_HASH: &str = "LOI~3_WB~pWB_3ofIUj[00fQ00WC";

pub async fn insert_user(
    db: Connection,
    name: &str,
    nickname: &str,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<User> {
    let now = now_rfc3339();
    db.execute(
        &format!(
            "INSERT INTO {USERS_T}
                (name, nickname, email, password, profile_image, blur_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)"
        ),
        params![
            name,
            nickname,
            email,
            password_hash,
            DEFAULT_PROFILE_IMAGE,
            DEFAULT_BLUR_HASH,
            now
        ],
    )
    .await?;

    let id = db.last_insert_rowid();
    get_user(db, id)
        .await?
        .ok_or_else(|| StringError("Inserted user not found".into()).into())
}

pub async fn get_user(db: Connection, id: i64) -> anyhow::Result<Option<User>> {
    let rows = db
        .query(&format!("SELECT * FROM {USERS_T} WHERE id = ?1"), [id])
        .await?;
    super::first_row(rows).await
}

pub async fn get_user_by_email(db: Connection, email: &str) -> anyhow::Result<Option<User>> {
    let rows = db
        .query(&format!("SELECT * FROM {USERS_T} WHERE email = ?1"), [email])
        .await?;
    super::first_row(rows).await
}

pub async fn get_user_by_nickname(db: Connection, nickname: &str) -> anyhow::Result<Option<User>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {USERS_T} WHERE nickname = ?1"),
            [nickname],
        )
        .await?;
    super::first_row(rows).await
}

pub async fn user_exists(db: Connection, id: i64) -> anyhow::Result<bool> {
    Ok(get_user(db, id).await?.is_some())
}

pub async fn list_users(
    db: Connection,
    conditions: &[Condition],
    page: u32,
) -> anyhow::Result<Page<User>> {
    super::list_page(&db, USERS_T, conditions, page).await
}

/// Partial update; only the provided fields end up in the SET list.
pub async fn update_user(
    db: Connection,
    id: i64,
    name: Option<&str>,
    description: Option<&str>,
    localization: Option<&str>,
    date_of_birth: Option<&str>,
) -> anyhow::Result<()> {
    let mut sets = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    for (column, value) in [
        ("name", name),
        ("description", description),
        ("localization", localization),
        ("date_of_birth", date_of_birth),
    ] {
        if let Some(value) = value {
            values.push(Value::Text(value.to_string()));
            sets.push(format!("{column} = ?{}", values.len()));
        }
    }

    values.push(Value::Text(now_rfc3339()));
    sets.push(format!("updated_at = ?{}", values.len()));

    values.push(Value::Integer(id));
    let sql = format!(
        "UPDATE {USERS_T} SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len()
    );

    db.execute(&sql, params_from_iter(values)).await?;
    Ok(())
}

pub async fn delete_user(db: Connection, id: i64) -> anyhow::Result<u64> {
    let affected = db
        .execute(&format!("DELETE FROM {USERS_T} WHERE id = ?1"), [id])
        .await?;
    Ok(affected)
}

/// Five random users the caller doesn't already follow, self excluded.
pub async fn who_to_follow(db: Connection, user_id: i64) -> anyhow::Result<Vec<User>> {
    let rows = db
        .query(
            &format!(
                "SELECT * FROM {USERS_T}
                WHERE id != ?1
                    AND id NOT IN (
                        SELECT user_id FROM {FOLLOWER_USER_T} WHERE follower_id = ?1
                    )
                ORDER BY RANDOM()
                LIMIT 5"
            ),
            [user_id],
        )
        .await?;

    super::collect_rows(rows).await
}

/// Partial name matches merged with exact nickname matches, first five
/// distinct users.
pub async fn search_users(db: Connection, query: &str) -> anyhow::Result<Vec<User>> {
    let rows = db
        .query(
            &format!("SELECT * FROM {USERS_T} WHERE name LIKE ?1 LIMIT 5"),
            [format!("%{query}%")],
        )
        .await?;
    let by_name: Vec<User> = super::collect_rows(rows).await?;

    let rows = db
        .query(
            &format!("SELECT * FROM {USERS_T} WHERE nickname = ?1 LIMIT 5"),
            [query],
        )
        .await?;
    let by_nickname: Vec<User> = super::collect_rows(rows).await?;

    let mut merged = by_name;
    for user in by_nickname {
        if !merged.iter().any(|u| u.id == user.id) {
            merged.push(user);
        }
    }
    merged.truncate(5);

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn fresh_db() -> Connection {
        let database = libsql::Builder::new_local(":memory:").build().await.unwrap();
        let conn = database.connect().unwrap();
        db::migrate_db(conn.clone()).await.unwrap();
        conn
    }

    #[tokio::test]
    async fn taken_nickname_and_email_are_visible_before_insert() {
        let db = fresh_db().await;
        insert_user(db.clone(), "Kae", "kae", "kae@example.com", "digest")
            .await
            .unwrap();

        let by_email = get_user_by_email(db.clone(), "kae@example.com")
            .await
            .unwrap();
        assert!(by_email.is_some());

        let by_nickname = get_user_by_nickname(db.clone(), "kae").await.unwrap();
        assert!(by_nickname.is_some());

        let free = get_user_by_nickname(db, "someone-else").await.unwrap();
        assert!(free.is_none());
    }
}

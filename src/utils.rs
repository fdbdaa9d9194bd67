use actix_web::HttpResponse;
use libsql::{Connection, params};
use log::{error, info};
use sha2::{Digest, Sha256};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::{db::TOKENS_T, types::Failure};

pub fn return_auth_error() -> HttpResponse {
    HttpResponse::Unauthorized().json(Failure {
        errors: "You are not logged in".into(),
    })
}

pub fn server_error(context: &str, err: anyhow::Error) -> HttpResponse {
    error!("[{context}] Failed with err: {err}");
    HttpResponse::InternalServerError().json(Failure {
        errors: format!("Server error {err}"),
    })
}

/// Resolves a bearer token to the user id it was issued for. `None` for
/// unknown tokens, so callers answer 401 instead of leaking a db error.
pub async fn authed_user_id(token: &str, db: Connection) -> Option<i64> {
    let result = db
        .query(
            &format!("SELECT user_id FROM {TOKENS_T} WHERE key = ?1 LIMIT 1"),
            [token],
        )
        .await;

    match result {
        Err(err) => {
            info!("[LoggedInCheck] Searching token in db failed with error: {err}");
            None
        }
        Ok(mut res) => {
            let res = res.next().await;
            let Ok(rows) = res else {
                info!(
                    "[LoggedInCheck] Searching token in db failed with error: {}",
                    res.unwrap_err()
                );
                return None;
            };
            let Some(row) = rows else {
                info!("[LoggedInCheck] Token not in db");
                return None;
            };

            row.get(0).ok()
        }
    }
}

/// Mints a fresh bearer token for the user and records it.
pub async fn issue_token(db: Connection, user_id: i64) -> anyhow::Result<String> {
    let key = Uuid::new_v4().to_string();
    db.execute(
        &format!("INSERT INTO {TOKENS_T} (user_id, key, timestamp) VALUES (?1, ?2, ?3)"),
        params![user_id, key.as_str(), now_rfc3339()],
    )
    .await?;
    Ok(key)
}

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap()
}

/// Lowercased, hyphen-separated form of a post title, for when the client
/// doesn't send a slug of its own.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_dash = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaces   everywhere "), "spaces-everywhere");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn hash_password_is_deterministic_hex() {
        let digest = hash_password("hunter2");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_password("hunter2"));
        assert_ne!(digest, hash_password("hunter3"));
    }
}

use actix_web::{HttpResponse, Responder, delete, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use libsql::Connection;
use log::info;

use crate::{
    queries,
    types::{AppData, Failure, Success},
    utils::{authed_user_id, return_auth_error, server_error},
};

async fn remove_post(db: Connection, post_id: i64) -> anyhow::Result<()> {
    queries::tags::delete_tags_for_post(db.clone(), post_id).await?;
    queries::posts::delete_post(db, post_id).await?;
    Ok(())
}

#[delete("/posts/{id}")]
pub async fn delete_post(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let post_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    let post = match queries::posts::get_post(db.clone(), post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return HttpResponse::NotFound().json(Failure {
                errors: "Post not found".into(),
            });
        }
        Err(err) => return server_error("Delete Post", err),
    };

    if post.author_id != user_id {
        return HttpResponse::Forbidden().json(Failure {
            errors: "You are not authorized to delete this post.".into(),
        });
    }

    match remove_post(db, post_id).await {
        Ok(()) => {
            info!("[Delete Post] User {} deleted post {}", user_id, post_id);
            HttpResponse::Ok().json(Success {
                message: "Post deleted successfully".into(),
            })
        }
        Err(err) => server_error("Delete Post", err),
    }
}

#[delete("/posts/{id}/dislike")]
pub async fn dislike_post(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let post_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::likes::delete_post_like(db, user_id, post_id).await {
        Ok(0) => HttpResponse::NotFound().json(Failure {
            errors: "Like not found".into(),
        }),
        Ok(_) => HttpResponse::Ok().json(Success {
            message: "Like deleted successfully".into(),
        }),
        Err(err) => server_error("Dislike Post", err),
    }
}

#[delete("/comments/{id}/dislike")]
pub async fn dislike_comment(
    auth: BearerAuth,
    path: web::Path<i64>,
    data: AppData,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let comment_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::likes::delete_comment_like(db, user_id, comment_id).await {
        Ok(0) => HttpResponse::NotFound().json(Failure {
            errors: "Like not found".into(),
        }),
        Ok(_) => HttpResponse::Ok().json(Success {
            message: "Like deleted successfully".into(),
        }),
        Err(err) => server_error("Dislike Comment", err),
    }
}

#[delete("/posts/{id}/unshare")]
pub async fn unshare_post(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let post_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::shares::delete_share(db, user_id, post_id).await {
        Ok(0) => HttpResponse::NotFound().json(Failure {
            errors: "Shared post not found".into(),
        }),
        Ok(_) => HttpResponse::Ok().json(Success {
            message: "Post unshared successfully".into(),
        }),
        Err(err) => server_error("Unshare Post", err),
    }
}

#[delete("/comments/{id}")]
pub async fn delete_comment(
    auth: BearerAuth,
    path: web::Path<i64>,
    data: AppData,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let comment_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    let comment = match queries::comments::get_comment(db.clone(), comment_id).await {
        Ok(Some(comment)) => comment,
        Ok(None) => {
            return HttpResponse::NotFound().json(Failure {
                errors: "Comment not found".into(),
            });
        }
        Err(err) => return server_error("Delete Comment", err),
    };

    if comment.author_id != user_id {
        return HttpResponse::Unauthorized().json(Failure {
            errors: "Unauthorized to do this action".into(),
        });
    }

    match queries::comments::delete_comment(db, comment_id).await {
        Ok(_) => HttpResponse::Ok().json(Success {
            message: "Comment Deleted Successfully".into(),
        }),
        Err(err) => server_error("Delete Comment", err),
    }
}

#[delete("/users/{id}")]
pub async fn delete_user(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let target_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    if user_id != target_id {
        return HttpResponse::Unauthorized().json(Failure {
            errors: "Unauthorized".into(),
        });
    }

    match queries::users::delete_user(db, target_id).await {
        Ok(_) => {
            info!("[Delete User] User {} deleted their account", user_id);
            HttpResponse::Ok().json(Success {
                message: "User deleted successfully".into(),
            })
        }
        Err(err) => server_error("Delete User", err),
    }
}

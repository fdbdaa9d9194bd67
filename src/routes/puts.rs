use actix_web::{HttpResponse, Responder, put, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use libsql::Connection;
use log::info;

use crate::{
    queries,
    types::{AppData, Failure, Success, UpdateComment, UpdatePost, UpdateUser},
    utils::{authed_user_id, return_auth_error, server_error},
};

async fn apply_post_update(db: Connection, post_id: i64, body: &UpdatePost) -> anyhow::Result<()> {
    queries::posts::update_post(
        db.clone(),
        post_id,
        body.title.as_deref(),
        body.slug.as_deref(),
    )
    .await?;

    if let Some(tags) = &body.tags {
        queries::tags::replace_tags(db, post_id, tags).await?;
    }

    Ok(())
}

#[put("/posts/{id}")]
pub async fn edit_post(
    auth: BearerAuth,
    path: web::Path<i64>,
    body: web::Json<UpdatePost>,
    data: AppData,
) -> impl Responder {
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
        Err(err) => return server_error("Edit Post", err),
    };

    if post.author_id != user_id {
        return HttpResponse::Forbidden().json(Failure {
            errors: "Its not your post".into(),
        });
    }

    match apply_post_update(db, post_id, &body).await {
        Ok(()) => {
            info!("[Edit Post] User {} edited post {}", user_id, post_id);
            HttpResponse::Ok().json(Success {
                message: "Post Edited Successfully!".into(),
            })
        }
        Err(err) => server_error("Edit Post", err),
    }
}

#[put("/comments/{id}")]
pub async fn edit_comment(
    auth: BearerAuth,
    path: web::Path<i64>,
    body: web::Json<UpdateComment>,
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
        Err(err) => return server_error("Edit Comment", err),
    };

    if comment.author_id != user_id {
        return HttpResponse::Unauthorized().json(Failure {
            errors: "Unauthorized to do this action".into(),
        });
    }

    match queries::comments::update_comment(db, comment_id, &body.comment).await {
        Ok(()) => HttpResponse::Ok().json(Success {
            message: "Comment Updated Successfully".into(),
        }),
        Err(err) => server_error("Edit Comment", err),
    }
}

#[put("/users/{id}")]
pub async fn edit_user(
    auth: BearerAuth,
    path: web::Path<i64>,
    body: web::Json<UpdateUser>,
    data: AppData,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let target_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    if user_id != target_id {
        return HttpResponse::Unauthorized().json(Failure {
            errors: "You are not the user that you want to update".into(),
        });
    }

    let result = queries::users::update_user(
        db,
        target_id,
        body.name.as_deref(),
        body.description.as_deref(),
        body.localization.as_deref(),
        body.date_of_birth.as_deref(),
    )
    .await;

    match result {
        Ok(()) => HttpResponse::Ok().json(Success {
            message: "User updated successfully".into(),
        }),
        Err(err) => server_error("Edit User", err),
    }
}

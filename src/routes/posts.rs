use actix_web::{HttpResponse, Responder, post, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use libsql::Connection;
use log::{error, info};

use crate::{
    queries,
    types::{
        AppData, AuthResponse, Failure, LoginInfo, NewComment, NewPost, Post, RegisterInfo, Success,
    },
    utils::{authed_user_id, hash_password, issue_token, return_auth_error, server_error, slugify},
};

#[post("/register")]
pub async fn register(info: web::Json<RegisterInfo>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();

    match queries::users::get_user_by_email(db.clone(), &info.email).await {
        Ok(Some(_)) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "The email has already been taken".into(),
            });
        }
        Ok(None) => {}
        Err(err) => return server_error("Register", err),
    }

    match queries::users::get_user_by_nickname(db.clone(), &info.nickname).await {
        Ok(Some(_)) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "The nickname has already been taken".into(),
            });
        }
        Ok(None) => {}
        Err(err) => return server_error("Register", err),
    }

    let result: anyhow::Result<AuthResponse> = async {
        let user = queries::users::insert_user(
            db.clone(),
            &info.name,
            &info.nickname,
            &info.email,
            &hash_password(&info.password),
        )
        .await?;
        let token = issue_token(db, user.id).await?;
        Ok(AuthResponse { user, token })
    }
    .await;

    match result {
        Ok(response) => {
            info!("[Register] Registered user {}", response.user.id);
            HttpResponse::Created().json(response)
        }
        Err(err) => server_error("Register", err),
    }
}

#[post("/login")]
pub async fn login(info: web::Json<LoginInfo>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();

    let user = match queries::users::get_user_by_email(db.clone(), &info.email).await {
        Ok(user) => user,
        Err(err) => return server_error("Login", err),
    };

    let Some(user) = user else {
        error!("[Login] No user for email {}", info.email);
        return HttpResponse::Unauthorized().json(Failure {
            errors: "Wrong credentials".into(),
        });
    };

    if user.password != hash_password(&info.password) {
        error!("[Login] Wrong password for user {}", user.id);
        return HttpResponse::Unauthorized().json(Failure {
            errors: "Wrong credentials".into(),
        });
    }

    match issue_token(db, user.id).await {
        Ok(token) => {
            info!("[Login] Issued token for user {}", user.id);
            HttpResponse::Created().json(AuthResponse { user, token })
        }
        Err(err) => server_error("Login", err),
    }
}

async fn create_post(db: Connection, author_id: i64, body: &NewPost) -> anyhow::Result<Post> {
    let slug = match &body.slug {
        Some(slug) => slug.clone(),
        None => slugify(&body.title),
    };

    let post = queries::posts::insert_post(db.clone(), author_id, &body.title, &slug).await?;

    if let Some(tags) = &body.tags {
        queries::tags::insert_tags(db, post.id, tags).await?;
    }

    Ok(post)
}

#[post("/posts")]
pub async fn add_post(auth: BearerAuth, body: web::Json<NewPost>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match create_post(db, user_id, &body).await {
        Ok(post) => {
            info!("[Add Post] User {} created post {}", user_id, post.id);
            HttpResponse::Created().json(post)
        }
        Err(err) => server_error("Add Post", err),
    }
}

#[post("/comments")]
pub async fn add_comment(
    auth: BearerAuth,
    body: web::Json<NewComment>,
    data: AppData,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::posts::post_exists(db.clone(), body.post_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "Wrong Comment Request".into(),
            });
        }
        Err(err) => return server_error("Add Comment", err),
    }

    match queries::comments::insert_comment(db, user_id, body.post_id, &body.comment).await {
        Ok(comment) => HttpResponse::Created().json(comment),
        Err(err) => server_error("Add Comment", err),
    }
}

#[post("/posts/{id}/like")]
pub async fn like_post(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let post_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::posts::post_exists(db.clone(), post_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "Wrong Like Request".into(),
            });
        }
        Err(err) => return server_error("Like Post", err),
    }

    match queries::likes::find_post_like(db.clone(), user_id, post_id).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(Failure {
                errors: "This post is already liked by this user".into(),
            });
        }
        Ok(None) => {}
        Err(err) => return server_error("Like Post", err),
    }

    match queries::likes::insert_post_like(db, user_id, post_id).await {
        Ok(()) => HttpResponse::Ok().json(Success {
            message: "Like added successfully".into(),
        }),
        Err(err) => server_error("Like Post", err),
    }
}

#[post("/comments/{id}/like")]
pub async fn like_comment(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let comment_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::comments::comment_exists(db.clone(), comment_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "Wrong Like Request".into(),
            });
        }
        Err(err) => return server_error("Like Comment", err),
    }

    match queries::likes::find_comment_like(db.clone(), user_id, comment_id).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(Failure {
                errors: "This comment is already liked by this user".into(),
            });
        }
        Ok(None) => {}
        Err(err) => return server_error("Like Comment", err),
    }

    match queries::likes::insert_comment_like(db, user_id, comment_id).await {
        Ok(()) => HttpResponse::Ok().json(Success {
            message: "Like added successfully".into(),
        }),
        Err(err) => server_error("Like Comment", err),
    }
}

#[post("/posts/{id}/share")]
pub async fn share_post(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let post_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::posts::post_exists(db.clone(), post_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "Wrong Shared Post Request".into(),
            });
        }
        Err(err) => return server_error("Share Post", err),
    }

    match queries::shares::find_share(db.clone(), user_id, post_id).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(Failure {
                errors: "This post is already shared by this user".into(),
            });
        }
        Ok(None) => {}
        Err(err) => return server_error("Share Post", err),
    }

    match queries::shares::insert_share(db, user_id, post_id).await {
        Ok(()) => HttpResponse::Ok().json(Success {
            message: "Post shared successfully".into(),
        }),
        Err(err) => server_error("Share Post", err),
    }
}

#[post("/users/{id}/follow")]
pub async fn follow_user(auth: BearerAuth, path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let target_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    if user_id == target_id {
        return HttpResponse::UnprocessableEntity().json(Failure {
            errors: "You cannot follow yourself".into(),
        });
    }

    match queries::follows::is_following(db.clone(), user_id, target_id).await {
        Ok(true) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "You are already following this user".into(),
            });
        }
        Ok(false) => {}
        Err(err) => return server_error("Follow User", err),
    }

    match queries::users::user_exists(db.clone(), target_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "Invalid follow request".into(),
            });
        }
        Err(err) => return server_error("Follow User", err),
    }

    match queries::follows::insert_follow(db, user_id, target_id).await {
        Ok(()) => HttpResponse::Ok().json(Success {
            message: "You are now following the user".into(),
        }),
        Err(err) => server_error("Follow User", err),
    }
}

#[post("/users/{id}/unfollow")]
pub async fn unfollow_user(
    auth: BearerAuth,
    path: web::Path<i64>,
    data: AppData,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let target_id = path.into_inner();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::follows::is_following(db.clone(), user_id, target_id).await {
        Ok(false) => {
            return HttpResponse::UnprocessableEntity().json(Failure {
                errors: "You are not following this user".into(),
            });
        }
        Ok(true) => {}
        Err(err) => return server_error("Unfollow User", err),
    }

    match queries::follows::delete_follow(db, user_id, target_id).await {
        Ok(_) => HttpResponse::Ok().json(Success {
            message: "You have unfollowed the user".into(),
        }),
        Err(err) => server_error("Unfollow User", err),
    }
}

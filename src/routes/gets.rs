use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use libsql::Connection;

use crate::{
    feed,
    filters::{
        COMMENT_FILTER, FOLLOWER_FILTER, LIKED_COMMENT_FILTER, LIKED_POST_FILTER, POST_FILTER,
        SHARED_POST_FILTER, USER_FILTER,
    },
    queries,
    types::{ActivityItem, AppData, Failure, PageQuery, PostDetail, SearchQuery, SearchResults},
    utils::{authed_user_id, return_auth_error, server_error},
};

#[get("/posts")]
pub async fn get_posts(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = POST_FILTER.transform(req.query_string());

    match queries::posts::list_posts(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => server_error("Get Posts", err),
    }
}

#[get("/posts/{id}")]
pub async fn get_post(path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();

    let post = match queries::posts::get_post(db.clone(), path.into_inner()).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return HttpResponse::NotFound().json(Failure {
                errors: "Post not found".into(),
            });
        }
        Err(err) => return server_error("Get Post", err),
    };

    match queries::tags::tags_for_post(db, post.id).await {
        Ok(tags) => HttpResponse::Ok().json(PostDetail { post, tags }),
        Err(err) => server_error("Get Post", err),
    }
}

#[get("/comments")]
pub async fn get_comments(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = COMMENT_FILTER.transform(req.query_string());

    match queries::comments::list_comments(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(comments) => HttpResponse::Ok().json(comments),
        Err(err) => server_error("Get Comments", err),
    }
}

#[get("/comments/{id}")]
pub async fn get_comment(path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();

    match queries::comments::get_comment(db, path.into_inner()).await {
        Ok(Some(comment)) => HttpResponse::Ok().json(comment),
        Ok(None) => HttpResponse::NotFound().json(Failure {
            errors: "Comment not found".into(),
        }),
        Err(err) => server_error("Get Comment", err),
    }
}

#[get("/likedposts")]
pub async fn get_liked_posts(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = LIKED_POST_FILTER.transform(req.query_string());

    match queries::likes::list_post_likes(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(likes) => HttpResponse::Ok().json(likes),
        Err(err) => server_error("Get Liked Posts", err),
    }
}

#[get("/likedcomments")]
pub async fn get_liked_comments(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = LIKED_COMMENT_FILTER.transform(req.query_string());

    match queries::likes::list_comment_likes(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(likes) => HttpResponse::Ok().json(likes),
        Err(err) => server_error("Get Liked Comments", err),
    }
}

#[get("/sharedposts")]
pub async fn get_shared_posts(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = SHARED_POST_FILTER.transform(req.query_string());

    match queries::shares::list_shares(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(shares) => HttpResponse::Ok().json(shares),
        Err(err) => server_error("Get Shared Posts", err),
    }
}

#[get("/follows")]
pub async fn get_follows(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = FOLLOWER_FILTER.transform(req.query_string());

    match queries::follows::list_follows(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(follows) => HttpResponse::Ok().json(follows),
        Err(err) => server_error("Get Follows", err),
    }
}

#[get("/users")]
pub async fn get_users(
    data: AppData,
    req: HttpRequest,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let conditions = USER_FILTER.transform(req.query_string());

    match queries::users::list_users(db, &conditions, page.page.unwrap_or(1)).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(err) => server_error("Get Users", err),
    }
}

#[get("/users/{id}")]
pub async fn get_user(path: web::Path<i64>, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();

    match queries::users::get_user(db, path.into_inner()).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => HttpResponse::NotFound().json(Failure {
            errors: "User not found".into(),
        }),
        Err(err) => server_error("Get User", err),
    }
}

#[get("/followers/{id}")]
pub async fn get_followers(
    path: web::Path<i64>,
    data: AppData,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();

    match queries::follows::followers_of(db, path.into_inner(), page.page.unwrap_or(1)).await {
        Ok(followers) => HttpResponse::Ok().json(followers),
        Err(err) => server_error("Get Followers", err),
    }
}

#[get("/following/{id}")]
pub async fn get_following(
    path: web::Path<i64>,
    data: AppData,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();

    match queries::follows::followings_of(db, path.into_inner(), page.page.unwrap_or(1)).await {
        Ok(followings) => HttpResponse::Ok().json(followings),
        Err(err) => server_error("Get Following", err),
    }
}

#[get("/tags/trending")]
pub async fn get_trending_tags(data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();

    match queries::tags::trending_tags(db).await {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => server_error("Trending Tags", err),
    }
}

async fn run_search(db: Connection, query: &str) -> anyhow::Result<SearchResults> {
    let posts = if let Some(tag) = query.strip_prefix('#') {
        let post_ids = queries::tags::post_ids_with_tag(db.clone(), tag).await?;
        queries::posts::posts_by_ids(db.clone(), &post_ids).await?
    } else {
        queries::posts::search_posts_by_title(db.clone(), query).await?
    };

    let users = queries::users::search_users(db, query).await?;

    Ok(SearchResults {
        query: query.to_string(),
        users,
        posts,
    })
}

#[get("/search")]
pub async fn search(data: AppData, query: web::Query<SearchQuery>) -> impl Responder {
    let db = data.db.connect().unwrap();
    let q = query.q.clone().unwrap_or_default();

    match run_search(db, &q).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(err) => server_error("Search", err),
    }
}

#[get("/who-to-follow")]
pub async fn who_to_follow(auth: BearerAuth, data: AppData) -> impl Responder {
    let db = data.db.connect().unwrap();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match queries::users::who_to_follow(db, user_id).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(err) => server_error("Who To Follow", err),
    }
}

/// Profile activity: the subject's own posts and reshares, merged and
/// sorted. 404 when the subject has neither.
#[get("/activity/{userId}")]
pub async fn get_profile_activity(
    path: web::Path<i64>,
    data: AppData,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let user_id = path.into_inner();

    let posts = match queries::posts::posts_by_authors(db.clone(), &[user_id]).await {
        Ok(posts) => posts,
        Err(err) => return server_error("Profile Activity", err),
    };
    let shares = match queries::shares::shares_by_users(db, &[user_id]).await {
        Ok(shares) => shares,
        Err(err) => return server_error("Profile Activity", err),
    };

    match feed::profile_activity(&posts, &shares, page.page.unwrap_or(1)) {
        Some(activity) => HttpResponse::Ok().json(serde_json::json!({ "activity": activity })),
        None => HttpResponse::NotFound().json(serde_json::json!({ "activity": "not found" })),
    }
}

async fn following_feed(db: Connection, user_id: i64) -> anyhow::Result<Vec<ActivityItem>> {
    let following = queries::follows::following_ids(db.clone(), user_id).await?;
    let posts = queries::posts::posts_by_authors(db.clone(), &following).await?;
    let shares = queries::shares::shares_by_users(db, &following).await?;

    let mut items = feed::merge_activity(&posts, &shares);
    feed::dedup_reshares(&mut items);
    Ok(items)
}

/// Aggregate feed over everyone the caller follows. Empty activity is a
/// 200 with an empty page, unlike the profile variant.
#[get("/activity-following")]
pub async fn get_following_activity(
    auth: BearerAuth,
    data: AppData,
    page: web::Query<PageQuery>,
) -> impl Responder {
    let db = data.db.connect().unwrap();
    let Some(user_id) = authed_user_id(auth.token(), db.clone()).await else {
        return return_auth_error();
    };

    match following_feed(db, user_id).await {
        Ok(items) => HttpResponse::Ok().json(feed::paginate(items, page.page.unwrap_or(1))),
        Err(err) => server_error("Following Activity", err),
    }
}

use actix_web::{
    App, HttpServer,
    middleware::Logger,
    web::{self, scope},
};
use dotenvy::dotenv;
use log::info;
use warble::{
    db,
    routes::{
        deletes::{
            delete_comment, delete_post, delete_user, dislike_comment, dislike_post, unshare_post,
        },
        gets::{
            get_comment, get_comments, get_followers, get_following, get_following_activity,
            get_follows, get_liked_comments, get_liked_posts, get_post, get_posts,
            get_profile_activity, get_shared_posts, get_trending_tags, get_user, get_users, search,
            who_to_follow,
        },
        posts::{
            add_comment, add_post, follow_user, like_comment, like_post, login, register,
            share_post, unfollow_user,
        },
        puts::{edit_comment, edit_post, edit_user},
    },
    types::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let db = db::get_database().await;
    info!("Connecting to Database");
    let conn = db.connect().unwrap().clone();
    info!("Connected to Database. Migrating");
    db::migrate_db(conn).await?;
    info!("Migrated Database");

    let app_data = web::Data::new(AppState { db });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_data.clone())
            .service(
                scope("/api")
                    .service(register)
                    .service(login)
                    .service(get_posts)
                    .service(get_post)
                    .service(get_comments)
                    .service(get_comment)
                    .service(get_liked_posts)
                    .service(get_liked_comments)
                    .service(get_shared_posts)
                    .service(get_follows)
                    .service(get_users)
                    .service(get_user)
                    .service(get_profile_activity)
                    .service(get_following_activity)
                    .service(get_followers)
                    .service(get_following)
                    .service(get_trending_tags)
                    .service(search)
                    .service(who_to_follow)
                    .service(add_post)
                    .service(add_comment)
                    .service(like_post)
                    .service(like_comment)
                    .service(share_post)
                    .service(follow_user)
                    .service(unfollow_user)
                    .service(edit_post)
                    .service(edit_comment)
                    .service(edit_user)
                    .service(delete_post)
                    .service(delete_comment)
                    .service(delete_user)
                    .service(dislike_post)
                    .service(dislike_comment)
                    .service(unshare_post),
            )
    })
    .bind(("0.0.0.0", 8000))?
    .run()
    .await?;

    Ok(())
}

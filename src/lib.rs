mod authentication;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use data_formats::*;
pub use db_helpers::{parse_catalog_line, replace_ingredient_catalog_in_db};
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr) -> Result<()> {
    let db = init_db().await?;
    let app = app.layer(Extension(Arc::new(db)));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db() -> Result<SqlitePool> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    connect_db(&db_url).await
}

pub async fn connect_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        println!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = SqlitePool::connect(db_url).await?;
    println!("Running Migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    println!("Migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:id", get(get_tag))
        .route("/api/ingredients", get(list_ingredients))
        .route("/api/ingredients/:id", get(get_ingredient))
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/:id",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/:id/favorite",
            post(favorite_recipe).delete(unfavorite_recipe),
        )
        .route(
            "/api/recipes/:id/shopping_cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
        .route("/api/users/subscriptions", get(list_subscriptions))
        .route(
            "/api/users/:id/subscribe",
            post(subscribe_user).delete(unsubscribe_user),
        )
        .fallback(not_found)
}

//! Shared test fixtures

#![allow(dead_code)]

use canteen_server::auth::CurrentUser;
use canteen_server::db::repository::{categories, menu_items, ngo_partners, users};
use canteen_server::db::MIGRATOR;
use shared::models::{
    CategoryCreate, MenuItem, MenuItemCreate, NgoPartner, NgoPartnerCreate, Role, User,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Fresh in-memory database with the full schema applied. A single
/// connection keeps every query on the same in-memory instance.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    MIGRATOR.run(&pool).await.expect("apply migrations");
    pool
}

pub async fn seed_user(pool: &SqlitePool, username: &str, role: Role) -> User {
    users::create(pool, username, "not-a-real-hash", username, &format!("{username}@campus.test"), role)
        .await
        .expect("seed user")
}

pub fn as_current(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        name: user.name.clone(),
        role: user.role,
    }
}

pub async fn seed_menu_item(pool: &SqlitePool, name: &str, price: f64) -> MenuItem {
    let category = categories::create(
        pool,
        CategoryCreate {
            name: format!("cat-{name}"),
        },
    )
    .await
    .expect("seed category");

    menu_items::create(
        pool,
        MenuItemCreate {
            name: name.to_string(),
            description: format!("{name} description"),
            price,
            image: "item.jpg".into(),
            category_id: category.id,
            is_available: true,
        },
    )
    .await
    .expect("seed menu item")
}

pub async fn seed_ngo(pool: &SqlitePool, name: &str, is_active: bool) -> NgoPartner {
    ngo_partners::create(
        pool,
        NgoPartnerCreate {
            name: name.to_string(),
            description: None,
            contact_name: "Contact".into(),
            contact_email: format!("{name}@ngo.test"),
            contact_phone: "0000000000".into(),
            address: "12 Relief Road".into(),
            is_active,
        },
    )
    .await
    .expect("seed ngo")
}

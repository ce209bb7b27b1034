//! Loyalty points: balances, redemption, history

mod common;

use canteen_server::db::repository::{loyalty, users};
use canteen_server::services;
use canteen_server::AppError;
use shared::models::{LoyaltyRewardCreate, RedemptionStatus, RewardType, Role};

use common::{as_current, seed_user, test_pool};

async fn seed_reward(pool: &sqlx::SqlitePool, name: &str, points: i64, active: bool) -> i64 {
    loyalty::create_reward(
        pool,
        LoyaltyRewardCreate {
            name: name.to_string(),
            description: format!("{name} reward"),
            points_required: points,
            reward_type: RewardType::Discount,
            reward_value: "10%".into(),
            is_active: active,
        },
    )
    .await
    .expect("seed reward")
    .id
}

#[tokio::test]
async fn insufficient_balance_rejects_and_preserves_points() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);
    users::add_loyalty_points(&pool, user.id, 50).await.unwrap();
    let reward = seed_reward(&pool, "free-chai", 75, true).await;

    let err = services::loyalty::redeem(&pool, &student, reward)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(users::loyalty_points(&pool, user.id).await.unwrap(), 50);
    assert!(services::loyalty::redemptions(&pool, user.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn redemption_debits_exactly_the_reward_cost() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);
    users::add_loyalty_points(&pool, user.id, 100).await.unwrap();
    let reward = seed_reward(&pool, "free-chai", 75, true).await;

    let redemption = services::loyalty::redeem(&pool, &student, reward)
        .await
        .unwrap();
    assert_eq!(redemption.points_used, 75);
    assert_eq!(redemption.status, RedemptionStatus::Pending);

    assert_eq!(users::loyalty_points(&pool, user.id).await.unwrap(), 25);
}

#[tokio::test]
async fn inactive_rewards_cannot_be_redeemed() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);
    users::add_loyalty_points(&pool, user.id, 500).await.unwrap();
    let reward = seed_reward(&pool, "retired", 75, false).await;

    let err = services::loyalty::redeem(&pool, &student, reward)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(users::loyalty_points(&pool, user.id).await.unwrap(), 500);
}

#[tokio::test]
async fn unknown_reward_is_not_found() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);

    let err = services::loyalty::redeem(&pool, &student, 424242)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn concurrent_redemptions_debit_at_most_once() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);
    users::add_loyalty_points(&pool, user.id, 75).await.unwrap();
    let reward = seed_reward(&pool, "free-meal", 50, true).await;

    // Three racing redemptions; only one fits into the balance
    let mut handles = Vec::new();
    for _ in 0..3 {
        let pool = pool.clone();
        let student = student.clone();
        handles.push(tokio::spawn(async move {
            services::loyalty::redeem(&pool, &student, reward).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(matches!(e, AppError::Conflict(_))),
        }
    }
    assert_eq!(succeeded, 1);

    assert_eq!(users::loyalty_points(&pool, user.id).await.unwrap(), 25);
    assert_eq!(
        services::loyalty::redemptions(&pool, user.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn history_is_most_recent_first() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);
    users::add_loyalty_points(&pool, user.id, 300).await.unwrap();
    let cheap = seed_reward(&pool, "sticker", 10, true).await;
    let dear = seed_reward(&pool, "free-meal", 100, true).await;

    services::loyalty::redeem(&pool, &student, cheap).await.unwrap();
    // Distinct redeemed_at timestamps
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    services::loyalty::redeem(&pool, &student, dear).await.unwrap();

    let history = services::loyalty::redemptions(&pool, user.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].reward_id, dear);
    assert_eq!(history[1].reward_id, cheap);
    assert!(history[0].redeemed_at >= history[1].redeemed_at);

    assert_eq!(users::loyalty_points(&pool, user.id).await.unwrap(), 190);
}

//! Surplus marking, NGO donations and the notification fallout

mod common;

use canteen_server::db::repository::{menu_items, notifications};
use canteen_server::message::ConnectionRegistry;
use canteen_server::services;
use canteen_server::AppError;
use shared::models::{
    DonationStatus, NotificationCreate, NotificationType, Role, SurplusDonationCreate, SurplusMark,
};
use shared::util::now_millis;

use common::{as_current, seed_menu_item, seed_ngo, seed_user, test_pool};

fn surplus(price: f64, quantity: i64) -> SurplusMark {
    SurplusMark {
        surplus_price: price,
        surplus_expiry_time: now_millis() + 3_600_000,
        surplus_quantity: quantity,
    }
}

#[tokio::test]
async fn only_staff_mark_surplus() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;

    let err = services::surplus::mark_surplus(&pool, &registry, &student, item.id, surplus(75.0, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn surplus_price_must_undercut_the_regular_price() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;

    let err = services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(150.0, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = services::surplus::mark_surplus(
        &pool,
        &registry,
        &admin,
        item.id,
        SurplusMark {
            surplus_price: 75.0,
            surplus_expiry_time: now_millis() - 1,
            surplus_quantity: 5,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn marking_surplus_notifies_every_student() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let asha = seed_user(&pool, "asha", Role::Student).await;
    let ravi = seed_user(&pool, "ravi", Role::Student).await;
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;

    let marked = services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();
    assert!(marked.is_surplus);
    assert_eq!(marked.surplus_quantity, 5);

    for student in [&asha, &ravi] {
        let inbox = notifications::find_by_user(&pool, student.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationType::Surplus);
        assert_eq!(inbox[0].related_item_id, Some(item.id));
        assert!(inbox[0].expires_at.is_some());
    }
}

#[tokio::test]
async fn donating_all_stock_clears_the_surplus_flag() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;
    let ngo = seed_ngo(&pool, "food-bridge", true).await;

    services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();

    let donation = services::surplus::create_donation(
        &pool,
        &admin,
        SurplusDonationCreate {
            ngo_id: ngo.id,
            menu_item_id: item.id,
            quantity: 5,
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(donation.status, DonationStatus::Scheduled);
    assert_eq!(donation.quantity, 5);

    let after = menu_items::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert!(!after.is_surplus);
    assert_eq!(after.surplus_quantity, 0);

    let listed = services::surplus::list_surplus(&pool).await.unwrap();
    assert!(listed.iter().all(|i| i.id != item.id));
}

#[tokio::test]
async fn over_donation_fails_without_touching_stock() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;
    let ngo = seed_ngo(&pool, "food-bridge", true).await;

    services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();

    let err = services::surplus::create_donation(
        &pool,
        &admin,
        SurplusDonationCreate {
            ngo_id: ngo.id,
            menu_item_id: item.id,
            quantity: 6,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let after = menu_items::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert!(after.is_surplus);
    assert_eq!(after.surplus_quantity, 5);
}

#[tokio::test]
async fn donations_require_a_known_active_ngo() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;
    let dormant = seed_ngo(&pool, "dormant", false).await;

    services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();

    let err = services::surplus::create_donation(
        &pool,
        &admin,
        SurplusDonationCreate {
            ngo_id: 424242,
            menu_item_id: item.id,
            quantity: 1,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = services::surplus::create_donation(
        &pool,
        &admin,
        SurplusDonationCreate {
            ngo_id: dormant.id,
            menu_item_id: item.id,
            quantity: 1,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn donation_status_moves_forward_only() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;
    let ngo = seed_ngo(&pool, "food-bridge", true).await;

    services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();
    let donation = services::surplus::create_donation(
        &pool,
        &admin,
        SurplusDonationCreate {
            ngo_id: ngo.id,
            menu_item_id: item.id,
            quantity: 2,
            notes: Some("evening pickup".into()),
        },
    )
    .await
    .unwrap();

    // scheduled → completed skips in_progress
    let err = services::surplus::update_donation_status(
        &pool,
        &admin,
        donation.id,
        DonationStatus::Completed,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let moved = services::surplus::update_donation_status(
        &pool,
        &admin,
        donation.id,
        DonationStatus::InProgress,
    )
    .await
    .unwrap();
    assert_eq!(moved.status, DonationStatus::InProgress);

    let done = services::surplus::update_donation_status(
        &pool,
        &admin,
        donation.id,
        DonationStatus::Completed,
    )
    .await
    .unwrap();
    assert_eq!(done.status, DonationStatus::Completed);

    // Terminal; nothing moves out of completed
    let err = services::surplus::update_donation_status(
        &pool,
        &admin,
        donation.id,
        DonationStatus::InProgress,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn every_donation_move_notifies_admins() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let boss = seed_user(&pool, "boss", Role::Admin).await;
    let admin = as_current(&boss);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;
    let ngo = seed_ngo(&pool, "food-bridge", true).await;

    services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();
    let donation = services::surplus::create_donation(
        &pool,
        &admin,
        SurplusDonationCreate {
            ngo_id: ngo.id,
            menu_item_id: item.id,
            quantity: 2,
            notes: None,
        },
    )
    .await
    .unwrap();

    // Scheduling itself notifies the kitchen, not admins
    assert!(notifications::find_by_user(&pool, boss.id).await.unwrap().is_empty());

    services::surplus::update_donation_status(&pool, &admin, donation.id, DonationStatus::InProgress)
        .await
        .unwrap();
    let inbox = notifications::find_by_user(&pool, boss.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationType::General);
    assert!(inbox[0].message.contains("under way"));

    services::surplus::update_donation_status(&pool, &admin, donation.id, DonationStatus::Completed)
        .await
        .unwrap();
    let inbox = notifications::find_by_user(&pool, boss.id).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().any(|n| n.message.contains("picked up")));
}

#[tokio::test]
async fn concurrent_donations_only_exhaust_available_stock() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let admin = as_current(&seed_user(&pool, "boss", Role::Admin).await);
    let item = seed_menu_item(&pool, "Biryani", 150.0).await;
    let ngo = seed_ngo(&pool, "food-bridge", true).await;

    services::surplus::mark_surplus(&pool, &registry, &admin, item.id, surplus(75.0, 5))
        .await
        .unwrap();

    // Eight single-unit donations race for five units of stock
    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        let admin = admin.clone();
        let payload = SurplusDonationCreate {
            ngo_id: ngo.id,
            menu_item_id: item.id,
            quantity: 1,
            notes: None,
        };
        handles.push(tokio::spawn(async move {
            services::surplus::create_donation(&pool, &admin, payload).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(matches!(e, AppError::Conflict(_))),
        }
    }
    assert_eq!(succeeded, 5);

    let after = menu_items::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(after.surplus_quantity, 0);
    assert!(!after.is_surplus);
}

#[tokio::test]
async fn expired_notifications_are_swept() {
    let pool = test_pool().await;
    let user = seed_user(&pool, "asha", Role::Student).await;
    let now = now_millis();

    for (title, expires_at) in [
        ("stale", Some(now - 1_000)),
        ("fresh", Some(now + 3_600_000)),
        ("permanent", None),
    ] {
        notifications::create(
            &pool,
            &NotificationCreate {
                user_id: user.id,
                title: title.into(),
                message: "test".into(),
                kind: NotificationType::General,
                related_item_id: None,
                expires_at,
            },
        )
        .await
        .unwrap();
    }

    let removed = notifications::delete_expired(&pool, now).await.unwrap();
    assert_eq!(removed, 1);

    let left = notifications::find_by_user(&pool, user.id).await.unwrap();
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|n| n.title != "stale"));
}

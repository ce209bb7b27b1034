//! Order lifecycle: placing, editing, status moves, payment confirmation

mod common;

use canteen_server::db::repository::orders;
use canteen_server::message::ConnectionRegistry;
use canteen_server::services;
use canteen_server::AppError;
use shared::models::{OrderCreate, OrderEdit, OrderItemRequest, OrderStatus, Role};

use common::{as_current, seed_menu_item, seed_user, test_pool};

fn line(menu_item_id: i64, quantity: i64, price: f64) -> OrderItemRequest {
    OrderItemRequest {
        menu_item_id,
        quantity,
        price,
    }
}

fn order_of(items: Vec<OrderItemRequest>) -> OrderCreate {
    OrderCreate {
        items,
        is_preorder: false,
        pickup_time: None,
        special_instructions: None,
    }
}

#[tokio::test]
async fn total_is_computed_server_side() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let dosa = seed_menu_item(&pool, "Masala Dosa", 100.0).await;
    let chai = seed_menu_item(&pool, "Chai", 45.0).await;

    let placed = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(dosa.id, 1, 100.0), line(chai.id, 2, 45.0)]),
    )
    .await
    .unwrap();

    assert_eq!(placed.order.total_amount, 190.0);
    assert_eq!(placed.order.status, OrderStatus::Placed);
    assert_eq!(placed.items.len(), 2);
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);

    let err = services::orders::place(&pool, &registry, &student, order_of(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn only_students_place_orders() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let kitchen = as_current(&seed_user(&pool, "cook", Role::Kitchen).await);
    let item = seed_menu_item(&pool, "Thali", 120.0).await;

    let err = services::orders::place(
        &pool,
        &registry,
        &kitchen,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn unknown_menu_item_is_rejected() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);

    let err = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(424242, 1, 50.0)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn staff_drive_the_status_machine() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let kitchen = as_current(&seed_user(&pool, "cook", Role::Kitchen).await);
    let item = seed_menu_item(&pool, "Thali", 120.0).await;

    let placed = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap();
    let id = placed.order.id;

    for status in [
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        let updated =
            services::orders::update_status(&pool, &registry, &kitchen, id, status)
                .await
                .unwrap();
        assert_eq!(updated.status, status);
    }
}

#[tokio::test]
async fn illegal_transition_is_a_conflict() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let kitchen = as_current(&seed_user(&pool, "cook", Role::Kitchen).await);
    let item = seed_menu_item(&pool, "Thali", 120.0).await;

    let placed = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap();

    // placed → ready skips preparing
    let err = services::orders::update_status(
        &pool,
        &registry,
        &kitchen,
        placed.order.id,
        OrderStatus::Ready,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn owner_may_only_cancel_while_placed() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let kitchen = as_current(&seed_user(&pool, "cook", Role::Kitchen).await);
    let item = seed_menu_item(&pool, "Thali", 120.0).await;

    let first = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap();

    // Owner cancels a placed order
    let cancelled = services::orders::update_status(
        &pool,
        &registry,
        &student,
        first.order.id,
        OrderStatus::Cancelled,
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Owner cannot move an order to preparing
    let second = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap();
    let err = services::orders::update_status(
        &pool,
        &registry,
        &student,
        second.order.id,
        OrderStatus::Preparing,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Once preparing, even a cancel from the owner is too late
    services::orders::update_status(
        &pool,
        &registry,
        &kitchen,
        second.order.id,
        OrderStatus::Preparing,
    )
    .await
    .unwrap();
    let err = services::orders::update_status(
        &pool,
        &registry,
        &student,
        second.order.id,
        OrderStatus::Cancelled,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn editing_is_limited_to_placed_orders() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let student = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let kitchen = as_current(&seed_user(&pool, "cook", Role::Kitchen).await);
    let item = seed_menu_item(&pool, "Thali", 120.0).await;

    let placed = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap();
    let id = placed.order.id;

    // Editable while placed
    let edited = services::orders::edit(
        &pool,
        &student,
        id,
        OrderEdit {
            items: vec![line(item.id, 3, 120.0)],
            special_instructions: Some("less spicy".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.order.total_amount, 360.0);
    assert_eq!(edited.items.len(), 1);

    services::orders::update_status(&pool, &registry, &kitchen, id, OrderStatus::Preparing)
        .await
        .unwrap();

    // Rejected afterwards, order untouched
    let err = services::orders::edit(
        &pool,
        &student,
        id,
        OrderEdit {
            items: vec![line(item.id, 1, 120.0)],
            special_instructions: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let after = orders::with_items(&pool, id).await.unwrap().unwrap();
    assert_eq!(after.order.total_amount, 360.0);
    assert_eq!(after.items[0].quantity, 3);
}

#[tokio::test]
async fn other_students_cannot_see_or_edit_the_order() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let owner = as_current(&seed_user(&pool, "asha", Role::Student).await);
    let other = as_current(&seed_user(&pool, "ravi", Role::Student).await);
    let item = seed_menu_item(&pool, "Thali", 120.0).await;

    let placed = services::orders::place(
        &pool,
        &registry,
        &owner,
        order_of(vec![line(item.id, 1, 120.0)]),
    )
    .await
    .unwrap();

    let err = services::orders::get(&pool, &other, placed.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = services::orders::edit(
        &pool,
        &other,
        placed.order.id,
        OrderEdit {
            items: vec![line(item.id, 9, 120.0)],
            special_instructions: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn payment_confirmation_credits_ten_percent_once() {
    let pool = test_pool().await;
    let registry = ConnectionRegistry::new();
    let user = seed_user(&pool, "asha", Role::Student).await;
    let student = as_current(&user);
    let item = seed_menu_item(&pool, "Feast", 199.0).await;

    let placed = services::orders::place(
        &pool,
        &registry,
        &student,
        order_of(vec![line(item.id, 1, 199.0)]),
    )
    .await
    .unwrap();

    let first = services::orders::confirm_payment(&pool, &student, placed.order.id)
        .await
        .unwrap();
    assert!(first.newly_credited);
    assert_eq!(first.points_awarded, 19);
    assert_eq!(first.loyalty_points, 19);

    // Duplicate confirmation is a no-op
    let second = services::orders::confirm_payment(&pool, &student, placed.order.id)
        .await
        .unwrap();
    assert!(!second.newly_credited);
    assert_eq!(second.points_awarded, 0);
    assert_eq!(second.loyalty_points, 19);
}

//! Surplus food and donation service
//!
//! Marking items as surplus (discounted, with an expiry window) and handing
//! the remaining stock to NGO partners.

use shared::message::SurplusAlertPayload;
use shared::models::{
    DonationStatus, MenuItem, NotificationCreate, NotificationType, Role, SurplusDonation,
    SurplusDonationCreate, SurplusMark,
};
use shared::util::now_millis;
use shared::PushMessage;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::{donations, menu_items, ngo_partners, notifications, users};
use crate::error::AppError;
use crate::message::ConnectionRegistry;

/// Flag an item as surplus stock at a discount. Staff only.
///
/// Every student gets a durable notification that expires together with the
/// surplus window, and all live connections get a broadcast alert.
pub async fn mark_surplus(
    pool: &SqlitePool,
    registry: &ConnectionRegistry,
    user: &CurrentUser,
    item_id: i64,
    data: SurplusMark,
) -> Result<MenuItem, AppError> {
    if !user.role.is_staff() {
        return Err(AppError::forbidden("Only staff can mark surplus food"));
    }

    let item = menu_items::find_by_id(pool, item_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {item_id} not found")))?;

    if data.surplus_quantity < 1 {
        return Err(AppError::validation("Surplus quantity must be at least 1"));
    }
    if data.surplus_price <= 0.0 {
        return Err(AppError::validation("Surplus price must be positive"));
    }
    if data.surplus_price >= item.price {
        return Err(AppError::validation(
            "Surplus price must be below the regular price",
        ));
    }
    if data.surplus_expiry_time <= now_millis() {
        return Err(AppError::validation("Surplus expiry must be in the future"));
    }

    let updated = menu_items::mark_surplus(pool, item_id, &data).await?;

    tracing::info!(
        item_id,
        surplus_price = data.surplus_price,
        quantity = data.surplus_quantity,
        "Menu item marked as surplus"
    );

    for student in users::find_by_role(pool, Role::Student).await? {
        notifications::create(
            pool,
            &NotificationCreate {
                user_id: student.id,
                title: "Surplus food available".into(),
                message: format!("{} is now available at a discount", updated.name),
                kind: NotificationType::Surplus,
                related_item_id: Some(item_id),
                expires_at: Some(data.surplus_expiry_time),
            },
        )
        .await?;
    }

    registry.send_to_all(&PushMessage::SurplusAlert {
        menu_item: SurplusAlertPayload {
            id: updated.id,
            name: updated.name.clone(),
            price: updated.price,
            surplus_price: data.surplus_price,
            image: updated.image.clone(),
            surplus_expiry_time: data.surplus_expiry_time,
        },
    });

    Ok(updated)
}

/// Surplus items still purchasable right now
pub async fn list_surplus(pool: &SqlitePool) -> Result<Vec<MenuItem>, AppError> {
    Ok(menu_items::find_surplus(pool, now_millis()).await?)
}

/// Schedule a donation of surplus stock to an NGO partner. Staff only.
pub async fn create_donation(
    pool: &SqlitePool,
    user: &CurrentUser,
    payload: SurplusDonationCreate,
) -> Result<SurplusDonation, AppError> {
    if !user.role.is_staff() {
        return Err(AppError::forbidden("Only staff can schedule donations"));
    }
    if payload.quantity < 1 {
        return Err(AppError::validation("Donation quantity must be at least 1"));
    }

    let ngo = ngo_partners::find_by_id(pool, payload.ngo_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("NGO partner {} not found", payload.ngo_id)))?;
    if !ngo.is_active {
        return Err(AppError::validation(format!("NGO partner {} is not active", ngo.name)));
    }

    let item = menu_items::find_by_id(pool, payload.menu_item_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Menu item {} not found", payload.menu_item_id))
        })?;

    // Stock check and decrement happen atomically inside the repository
    let donation = donations::create(pool, &payload).await?;

    tracing::info!(
        donation_id = donation.id,
        ngo_id = ngo.id,
        item_id = item.id,
        quantity = payload.quantity,
        "Surplus donation scheduled"
    );

    for kitchen in users::find_by_role(pool, Role::Kitchen).await? {
        notifications::create(
            pool,
            &NotificationCreate {
                user_id: kitchen.id,
                title: "Donation scheduled".into(),
                message: format!(
                    "{} x{} scheduled for pickup by {}",
                    item.name, payload.quantity, ngo.name
                ),
                kind: NotificationType::General,
                related_item_id: Some(item.id),
                expires_at: None,
            },
        )
        .await?;
    }

    Ok(donation)
}

/// Move a donation along `scheduled → in_progress → completed`. Staff only.
pub async fn update_donation_status(
    pool: &SqlitePool,
    user: &CurrentUser,
    donation_id: i64,
    new_status: DonationStatus,
) -> Result<SurplusDonation, AppError> {
    if !user.role.is_staff() {
        return Err(AppError::forbidden("Only staff can update donations"));
    }

    let donation = donations::find_by_id(pool, donation_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Donation {donation_id} not found")))?;

    if !donation.status.can_transition_to(new_status) {
        return Err(AppError::conflict(format!(
            "Cannot move donation from {} to {new_status}",
            donation.status
        )));
    }

    let updated = donations::set_status(pool, donation_id, donation.status, new_status).await?;

    tracing::info!(donation_id, from = %donation.status, to = %new_status, "Donation status changed");

    // Admins track every move of the donation lifecycle
    let message = match updated.status {
        DonationStatus::Scheduled => format!("Donation {donation_id} is scheduled"),
        DonationStatus::InProgress => format!("Donation {donation_id} pickup is under way"),
        DonationStatus::Completed => format!("Donation {donation_id} has been picked up"),
    };
    for admin in users::find_by_role(pool, Role::Admin).await? {
        notifications::create(
            pool,
            &NotificationCreate {
                user_id: admin.id,
                title: "Donation update".into(),
                message: message.clone(),
                kind: NotificationType::General,
                related_item_id: Some(updated.menu_item_id),
                expires_at: None,
            },
        )
        .await?;
    }

    Ok(updated)
}

/// Donation history for one NGO partner
pub async fn donations_by_ngo(
    pool: &SqlitePool,
    ngo_id: i64,
) -> Result<Vec<SurplusDonation>, AppError> {
    if ngo_partners::find_by_id(pool, ngo_id).await?.is_none() {
        return Err(AppError::not_found(format!("NGO partner {ngo_id} not found")));
    }
    Ok(donations::find_by_ngo(pool, ngo_id).await?)
}

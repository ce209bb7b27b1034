//! Push message types for the live notification channel
//!
//! Three server-originated shapes (`ORDER_UPDATE`, `NEW_ORDER`,
//! `SURPLUS_FOOD_ALERT`) plus the authentication handshake. The transport
//! serializes these as JSON text frames; delivery is best-effort and
//! fire-and-forget — the durable fallback is the `Notification` row created
//! by the calling manager.

use serde::{Deserialize, Serialize};

/// One line of an order as carried in push payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushOrderLine {
    pub name: String,
    pub quantity: i64,
}

/// `ORDER_UPDATE` body — sent to the order's owner on every status change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderUpdatePayload {
    pub id: i64,
    pub status: String,
    pub items: Vec<PushOrderLine>,
}

/// `NEW_ORDER` body — sent to connected kitchen staff when an order lands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderPayload {
    pub id: i64,
    pub user_id: i64,
    pub customer_name: String,
    pub total_amount: f64,
    pub items: Vec<PushOrderLine>,
}

/// `SURPLUS_FOOD_ALERT` body — broadcast to every live connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurplusAlertPayload {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub surplus_price: f64,
    pub image: String,
    pub surplus_expiry_time: i64,
}

/// Server → client frames
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum PushMessage {
    #[serde(rename = "AUTH_SUCCESS")]
    AuthSuccess,
    #[serde(rename = "ORDER_UPDATE")]
    OrderUpdate { order: OrderUpdatePayload },
    #[serde(rename = "NEW_ORDER")]
    NewOrder { order: NewOrderPayload },
    #[serde(rename = "SURPLUS_FOOD_ALERT")]
    SurplusAlert { menu_item: SurplusAlertPayload },
}

/// Client → server frames. A connection is anonymous until it sends `AUTH`
/// with a valid bearer token; everything else on an anonymous socket is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "AUTH")]
    Auth { token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_message_wire_tags() {
        let msg = PushMessage::OrderUpdate {
            order: OrderUpdatePayload {
                id: 7,
                status: "ready".into(),
                items: vec![PushOrderLine {
                    name: "Masala Dosa".into(),
                    quantity: 2,
                }],
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"ORDER_UPDATE""#));
        let back: PushMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn client_auth_frame_parses() {
        let frame = r#"{"type":"AUTH","token":"abc"}"#;
        let msg: ClientMessage = serde_json::from_str(frame).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Auth {
                token: "abc".into()
            }
        );
    }
}

//! Payment gateway client
//!
//! Thin wrapper over the external payment provider. When
//! `PAYMENT_GATEWAY_URL` is unset the gateway runs in local simulation mode
//! so development and tests need no external service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::util::snowflake_id;

use crate::config::Config;
use crate::error::AppError;

/// Gateway-side payment order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in paise
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct PaymentStatusResponse {
    status: String,
}

#[derive(Clone)]
pub struct PaymentGateway {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl PaymentGateway {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.payment_timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        if config.payment_gateway_url.is_none() {
            tracing::info!("No payment gateway configured, running in simulation mode");
        }

        Ok(Self {
            client,
            base_url: config.payment_gateway_url.clone(),
        })
    }

    /// Create a payment order for the given rupee amount
    pub async fn create_order(&self, amount: f64, receipt: &str) -> Result<PaymentOrder, AppError> {
        let paise = (amount * 100.0).round() as i64;

        let Some(base) = &self.base_url else {
            return Ok(PaymentOrder {
                id: format!("pay_sim_{}", snowflake_id()),
                amount: paise,
                currency: "INR".into(),
                receipt: receipt.to_string(),
            });
        };

        let response = self
            .client
            .post(format!("{base}/orders"))
            .json(&CreateOrderRequest {
                amount: paise,
                currency: "INR",
                receipt,
            })
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Gateway request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(format!(
                "Gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<PaymentOrder>()
            .await
            .map_err(|e| AppError::upstream(format!("Malformed gateway response: {e}")))
    }

    /// Whether the gateway considers this payment settled
    pub async fn verify(&self, payment_id: &str) -> Result<bool, AppError> {
        let Some(base) = &self.base_url else {
            // Simulation mode treats every payment as settled
            return Ok(true);
        };

        let response = self
            .client
            .get(format!("{base}/payments/{payment_id}"))
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Gateway request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(format!(
                "Gateway returned {}",
                response.status()
            )));
        }

        let status = response
            .json::<PaymentStatusResponse>()
            .await
            .map_err(|e| AppError::upstream(format!("Malformed gateway response: {e}")))?;

        Ok(status.status == "paid")
    }
}

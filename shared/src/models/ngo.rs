//! NGO Partner Model

use serde::{Deserialize, Serialize};

/// NGO partner entity — receives surplus food donations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NgoPartner {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create NGO partner payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgoPartnerCreate {
    pub name: String,
    pub description: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Update NGO partner payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NgoPartnerUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

//! Shared application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::config::Config;
use crate::db::DbService;
use crate::error::AppError;
use crate::message::ConnectionRegistry;
use crate::services::payment::PaymentGateway;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub registry: Arc<ConnectionRegistry>,
    pub jwt: Arc<JwtService>,
    pub payment: PaymentGateway,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_url).await?;
        let jwt = Arc::new(JwtService::new(config.jwt_secret.clone()));
        let payment = PaymentGateway::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            pool: db.pool,
            registry: Arc::new(ConnectionRegistry::new()),
            jwt,
            payment,
        })
    }
}

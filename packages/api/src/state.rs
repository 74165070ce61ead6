use sea_orm::{ConnectOptions, Database, DbErr};
use std::{sync::Arc, time::Duration};

use crate::config::{AnalyticsConfig, DatabaseSettings};
use crate::store::{PgRetailStore, RetailStore};

pub type AppState = Arc<State>;

pub struct State {
    pub store: Arc<dyn RetailStore>,
}

impl State {
    pub fn new(store: Arc<dyn RetailStore>) -> Self {
        Self { store }
    }

    /// Opens the Postgres pool and wires the sea-orm backed store.
    pub async fn connect(
        database: &DatabaseSettings,
        analytics: AnalyticsConfig,
    ) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(database.url.to_owned());
        opt.max_connections(database.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(database.sql_logging);

        let db = Database::connect(opt).await?;
        tracing::info!(
            max_connections = database.max_connections,
            warehouse = %analytics.warehouse_location,
            "Connected to sales database"
        );

        Ok(Self::new(Arc::new(PgRetailStore::new(db, analytics))))
    }
}

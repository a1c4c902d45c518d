//! 数据库连接管理

use sqlx::postgres::{PgPool, PgPoolOptions};
use vdc_core::{Result, VdcError};

/// 数据库连接池
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// 按连接串建立连接池
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| VdcError::Unavailable(e.to_string()))?;

        tracing::info!("database pool established");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::run_migrations;
use crate::errors::AppError;
use crate::models::application::{ApplicationRecord, NewApplication};

/// Insert-only collection of submitted applications.
///
/// Carried in `AppState` as `Arc<dyn RecordStore>`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, AppError>;
}

/// PostgreSQL-backed record store over an explicitly created pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Brings the schema up to date. Call once before serving.
    pub async fn init(&self) -> anyhow::Result<()> {
        run_migrations(&self.pool).await
    }

    /// Closes every pooled connection. Call after the server stops.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, AppError> {
        let record: ApplicationRecord = sqlx::query_as(
            r#"
            INSERT INTO applications
                (id, full_name, email, mobile, degree, college, video_assessment, resume_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.mobile)
        .bind(&application.degree)
        .bind(&application.college)
        .bind(&application.video_assessment)
        .bind(&application.resume_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}

//! PostgreSQL Repository Implementations

use crate::domain::entities::{DownloadLogEntry, Entitlement, FileRef};
use crate::domain::repository::{EntitlementRepository, ProductFileRepository};
use crate::error::DownloadResult;
use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId, UserId};
use sqlx::{PgPool, Postgres, Transaction};

/// PostgreSQL-backed purchase ledger
#[derive(Clone)]
pub struct PgDownloadRepository {
    pool: PgPool,
}

impl PgDownloadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_log(
        tx: &mut Transaction<'_, Postgres>,
        entry: &DownloadLogEntry,
    ) -> DownloadResult<()> {
        sqlx::query(
            r#"
            INSERT INTO download_logs (
                download_log_id,
                user_id,
                product_id,
                order_id,
                ip_address,
                user_agent,
                downloaded_at
            ) VALUES ($1, $2, $3, $4, $5::inet, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id.as_str())
        .bind(entry.product_id.as_str())
        .bind(entry.order_id.as_str())
        .bind(entry.ip_address.map(|ip| ip.to_string()))
        .bind(entry.user_agent.as_deref())
        .bind(entry.downloaded_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

impl EntitlementRepository for PgDownloadRepository {
    async fn find_entitlement(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> DownloadResult<Option<Entitlement>> {
        let row = sqlx::query_as::<_, EntitlementRow>(
            r#"
            SELECT
                o.order_id,
                o.created_at AS purchased_at,
                p.download_limit::BIGINT AS download_limit,
                (
                    SELECT COUNT(*)
                    FROM download_logs d
                    WHERE d.user_id = o.user_id
                      AND d.product_id = oi.product_id
                      AND d.order_id = o.order_id
                ) AS download_count
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.order_id
            JOIN products p ON p.product_id = oi.product_id
            WHERE o.user_id = $1
              AND oi.product_id = $2
              AND o.order_status = 'completed'
            ORDER BY o.created_at DESC, o.order_id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_entitlement(user_id, product_id)))
    }

    async fn count_downloads(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        order_id: &OrderId,
    ) -> DownloadResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM download_logs
            WHERE user_id = $1 AND product_id = $2 AND order_id = $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(product_id.as_str())
        .bind(order_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn download_limit(&self, product_id: &ProductId) -> DownloadResult<Option<i64>> {
        let limit = sqlx::query_scalar::<_, i64>(
            "SELECT download_limit::BIGINT FROM products WHERE product_id = $1",
        )
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(limit)
    }

    async fn append_download(&self, entry: &DownloadLogEntry) -> DownloadResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::insert_log(&mut tx, entry).await?;
        tx.commit().await?;

        tracing::debug!(download_log_id = %entry.id, "Download log appended");
        Ok(())
    }

    async fn append_download_within_limit(
        &self,
        entry: &DownloadLogEntry,
    ) -> DownloadResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent redemptions of the same triple until commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!(
                "download:{}:{}:{}",
                entry.user_id, entry.product_id, entry.order_id
            ))
            .execute(&mut *tx)
            .await?;

        let limit = sqlx::query_scalar::<_, i64>(
            "SELECT download_limit::BIGINT FROM products WHERE product_id = $1",
        )
        .bind(entry.product_id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(limit) = limit else {
            tx.rollback().await?;
            return Ok(false);
        };

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM download_logs
            WHERE user_id = $1 AND product_id = $2 AND order_id = $3
            "#,
        )
        .bind(entry.user_id.as_str())
        .bind(entry.product_id.as_str())
        .bind(entry.order_id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if count >= limit {
            tx.rollback().await?;
            return Ok(false);
        }

        Self::insert_log(&mut tx, entry).await?;
        tx.commit().await?;

        tracing::debug!(
            download_log_id = %entry.id,
            download_count = count + 1,
            download_limit = limit,
            "Download log appended within limit"
        );

        Ok(true)
    }
}

impl ProductFileRepository for PgDownloadRepository {
    async fn find_file(&self, product_id: &ProductId) -> DownloadResult<Option<FileRef>> {
        let row = sqlx::query_as::<_, FileRow>(
            r#"
            SELECT product_id, file_name, file_location
            FROM products
            WHERE product_id = $1
              AND file_location IS NOT NULL
            "#,
        )
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FileRow::into_file_ref))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct EntitlementRow {
    order_id: String,
    purchased_at: DateTime<Utc>,
    download_limit: i64,
    download_count: i64,
}

impl EntitlementRow {
    fn into_entitlement(self, user_id: &UserId, product_id: &ProductId) -> Entitlement {
        Entitlement {
            user_id: user_id.clone(),
            product_id: product_id.clone(),
            order_id: OrderId::new(self.order_id),
            purchased_at: self.purchased_at,
            download_count: self.download_count,
            download_limit: self.download_limit,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FileRow {
    product_id: String,
    file_name: String,
    file_location: String,
}

impl FileRow {
    fn into_file_ref(self) -> FileRef {
        FileRef {
            product_id: ProductId::new(self.product_id),
            file_name: self.file_name,
            location: self.file_location,
        }
    }
}

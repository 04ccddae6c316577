use async_trait::async_trait;
use chrono::Utc;
use domain::DomainError;
use domain::gateway::{APPLICATION_HID, Gateway, GatewayRepository};
use sqlx::SqlitePool;

/// SQLite-backed gateway store.
///
/// Idempotency of `get_or_create` rests on the `hid` primary key:
/// `INSERT .. ON CONFLICT DO NOTHING` followed by a read means at most one
/// row per hid exists no matter how many callers race, with no lock held
/// in process.
pub struct SqlxGatewayRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct GatewayRow {
    hid: String,
    uid: Option<String>,
    nickname: Option<String>,
    application_hid: String,
    discovered_at: i64,
}

impl From<GatewayRow> for Gateway {
    fn from(row: GatewayRow) -> Self {
        Gateway {
            hid: row.hid,
            uid: row.uid,
            nickname: row.nickname,
            application_hid: row.application_hid,
            discovered_at: row.discovered_at,
        }
    }
}

impl SqlxGatewayRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn storage(e: sqlx::Error) -> DomainError {
    DomainError::Storage(format!("database error: {e}"))
}

#[async_trait]
impl GatewayRepository for SqlxGatewayRepository {
    async fn get_or_create(
        &self,
        hid: &str,
        uid: Option<&str>,
    ) -> Result<(Gateway, bool), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO gateways (hid, uid, application_hid, discovered_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(hid) DO NOTHING
            "#,
        )
        .bind(hid)
        .bind(uid)
        .bind(APPLICATION_HID)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        let created = result.rows_affected() == 1;
        let gateway = self.find_by_hid(hid).await?.ok_or_else(|| {
            DomainError::Storage(format!("gateway {hid} vanished after upsert"))
        })?;
        Ok((gateway, created))
    }

    async fn find_by_hid(&self, hid: &str) -> Result<Option<Gateway>, DomainError> {
        let row = sqlx::query_as::<_, GatewayRow>(
            r#"
            SELECT hid, uid, nickname, application_hid, discovered_at
            FROM gateways
            WHERE hid = ?1
            "#,
        )
        .bind(hid)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.map(Gateway::from))
    }

    async fn find_all(&self) -> Result<Vec<Gateway>, DomainError> {
        let rows = sqlx::query_as::<_, GatewayRow>(
            r#"
            SELECT hid, uid, nickname, application_hid, discovered_at
            FROM gateways
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Gateway::from).collect())
    }
}

use async_trait::async_trait;
use chrono::Utc;
use domain::DomainError;
use domain::device::{Device, DeviceRepository, NewDeviceRecord};
use sqlx::SqlitePool;

/// SQLite-backed device store. Same upsert-then-read idempotency scheme as
/// the gateway repository.
pub struct SqlxDeviceRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct DeviceRow {
    hid: String,
    uid: String,
    gateway_hid: String,
    name: String,
    device_type: String,
    software_name: String,
    software_version: String,
    discovered_at: i64,
    last_pinged_at: i64,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Device {
            hid: row.hid,
            uid: row.uid,
            gateway_hid: row.gateway_hid,
            name: row.name,
            device_type: row.device_type,
            software_name: row.software_name,
            software_version: row.software_version,
            discovered_at: row.discovered_at,
            last_pinged_at: row.last_pinged_at,
        }
    }
}

impl SqlxDeviceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn storage(e: sqlx::Error) -> DomainError {
    DomainError::Storage(format!("database error: {e}"))
}

const SELECT_COLUMNS: &str = "hid, uid, gateway_hid, name, device_type, \
     software_name, software_version, discovered_at, last_pinged_at";

#[async_trait]
impl DeviceRepository for SqlxDeviceRepository {
    async fn get_or_create(
        &self,
        hid: &str,
        record: NewDeviceRecord,
    ) -> Result<(Device, bool), DomainError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO devices
                (hid, uid, gateway_hid, name, device_type,
                 software_name, software_version, discovered_at, last_pinged_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT(hid) DO NOTHING
            "#,
        )
        .bind(hid)
        .bind(&record.uid)
        .bind(&record.gateway_hid)
        .bind(&record.name)
        .bind(&record.device_type)
        .bind(&record.software_name)
        .bind(&record.software_version)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        let created = result.rows_affected() == 1;
        let device = self.find_by_hid(hid).await?.ok_or_else(|| {
            DomainError::Storage(format!("device {hid} vanished after upsert"))
        })?;
        Ok((device, created))
    }

    async fn find_by_hid(&self, hid: &str) -> Result<Option<Device>, DomainError> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM devices WHERE hid = ?1"
        ))
        .bind(hid)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.map(Device::from))
    }

    async fn find_by_gateway(&self, gateway_hid: &str) -> Result<Vec<Device>, DomainError> {
        let rows = sqlx::query_as::<_, DeviceRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM devices WHERE gateway_hid = ?1 ORDER BY rowid ASC"
        ))
        .bind(gateway_hid)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn find_all(&self) -> Result<Vec<Device>, DomainError> {
        let rows = sqlx::query_as::<_, DeviceRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM devices ORDER BY rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn record_ping(&self, hid: &str) -> Result<(), DomainError> {
        sqlx::query("UPDATE devices SET last_pinged_at = ?1 WHERE hid = ?2")
            .bind(Utc::now().timestamp())
            .bind(hid)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }
}

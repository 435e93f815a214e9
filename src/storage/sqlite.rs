use crate::models::{IpRange, ProxyTypeCount};
use crate::storage::{ProxyStorage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const RANGE_COLUMNS: &str = "ip_from, ip_to, country_code, country_name, region_name, \
                             city_name, isp, domain, usage_type, asn, \"as\", proxy_type";

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        max_lifetime_secs: u64,
    ) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(max_lifetime_secs))
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn decode_u32(row: &SqliteRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn decode_range(row: &SqliteRow) -> Result<IpRange, sqlx::Error> {
    Ok(IpRange {
        ip_from: decode_u32(row, "ip_from")?,
        ip_to: decode_u32(row, "ip_to")?,
        country_code: row.try_get("country_code")?,
        country_name: row.try_get("country_name")?,
        region_name: row.try_get("region_name")?,
        city_name: row.try_get("city_name")?,
        isp: row.try_get("isp")?,
        domain: row.try_get("domain")?,
        usage_type: row.try_get("usage_type")?,
        asn: row.try_get("asn")?,
        as_name: row.try_get("as")?,
        proxy_type: row.try_get("proxy_type")?,
    })
}

#[async_trait]
impl ProxyStorage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ip2proxy (
                ip_from INTEGER NOT NULL,
                ip_to INTEGER NOT NULL,
                country_code TEXT NOT NULL,
                country_name TEXT NOT NULL,
                region_name TEXT NOT NULL,
                city_name TEXT NOT NULL,
                isp TEXT NOT NULL,
                domain TEXT NOT NULL,
                usage_type TEXT NOT NULL,
                asn TEXT NOT NULL,
                "as" TEXT NOT NULL,
                proxy_type TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ip2proxy_range ON ip2proxy(ip_from, ip_to)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ip2proxy_country ON ip2proxy(country_code)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn find_range_containing(&self, addr: u32) -> StorageResult<Option<IpRange>> {
        let addr = i64::from(addr);
        let sql = format!("SELECT {RANGE_COLUMNS} FROM ip2proxy WHERE ip_from <= ? AND ? <= ip_to");
        let row = sqlx::query(&sql)
            .bind(addr)
            .bind(addr)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|r| decode_range(&r)).transpose().map_err(Into::into)
    }

    async fn find_ranges_for_country(
        &self,
        country_code: &str,
        row_limit: u32,
    ) -> StorageResult<Vec<IpRange>> {
        let sql = format!("SELECT {RANGE_COLUMNS} FROM ip2proxy WHERE country_code = ? LIMIT ?");
        let rows = sqlx::query(&sql)
            .bind(country_code)
            .bind(i64::from(row_limit))
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut ranges = Vec::with_capacity(rows.len());
        for row in &rows {
            match decode_range(row) {
                Ok(range) => ranges.push(range),
                Err(e) => warn!(error = %e, "skipping undecodable range row"),
            }
        }
        Ok(ranges)
    }

    async fn isp_names_for_country(&self, country_code: &str) -> StorageResult<Vec<String>> {
        let rows = sqlx::query("SELECT isp FROM ip2proxy WHERE country_code = ?")
            .bind(country_code)
            .fetch_all(self.pool.as_ref())
            .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            match row.try_get::<String, _>("isp") {
                Ok(name) => names.push(name),
                Err(e) => warn!(error = %e, "skipping undecodable isp row"),
            }
        }
        Ok(names)
    }

    async fn sum_address_count_for_country(&self, country_code: &str) -> StorageResult<i64> {
        let row = sqlx::query(
            "SELECT SUM(ip_to - ip_from + 1) AS total_ip FROM ip2proxy WHERE country_code = ?",
        )
        .bind(country_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(row.try_get::<Option<i64>, _>("total_ip")?.unwrap_or(0)),
            None => Ok(0),
        }
    }

    async fn top_proxy_types(&self, limit: u32) -> StorageResult<Vec<ProxyTypeCount>> {
        let rows = sqlx::query(
            "SELECT proxy_type, COUNT(proxy_type) AS total FROM ip2proxy \
             GROUP BY proxy_type ORDER BY total DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in &rows {
            let decoded = row
                .try_get::<String, _>("proxy_type")
                .and_then(|proxy_type| {
                    let total: i64 = row.try_get("total")?;
                    Ok(ProxyTypeCount { proxy_type, total })
                });
            match decoded {
                Ok(count) => counts.push(count),
                Err(e) => warn!(error = %e, "skipping undecodable proxy type row"),
            }
        }
        Ok(counts)
    }
}

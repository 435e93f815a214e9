use crate::models::{IpRange, ProxyTypeCount};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Read-only access to the range table. Implementations own a bounded
/// connection pool; per-request state never lives here. No retries: a
/// failed query surfaces as `StorageError` and the caller decides.
#[async_trait]
pub trait ProxyStorage: Send + Sync {
    /// Create the table and indexes if absent (dev and test environments;
    /// production points at a pre-loaded table).
    async fn init(&self) -> Result<()>;

    /// The single range covering `addr`, if any. Ranges are assumed
    /// non-overlapping, so at most one row can match.
    async fn find_range_containing(&self, addr: u32) -> StorageResult<Option<IpRange>>;

    /// Range rows for a country in storage order, at most `row_limit` of
    /// them. Rows that fail to decode are logged and skipped.
    async fn find_ranges_for_country(
        &self,
        country_code: &str,
        row_limit: u32,
    ) -> StorageResult<Vec<IpRange>>;

    /// Raw ISP names for a country, duplicates preserved.
    async fn isp_names_for_country(&self, country_code: &str) -> StorageResult<Vec<String>>;

    /// Sum of `(ip_to - ip_from + 1)` over all ranges for a country.
    /// Zero when the country has no ranges.
    async fn sum_address_count_for_country(&self, country_code: &str) -> StorageResult<i64>;

    /// Most frequent proxy types, pre-sorted by count descending, at most
    /// `limit` rows.
    async fn top_proxy_types(&self, limit: u32) -> StorageResult<Vec<ProxyTypeCount>>;
}

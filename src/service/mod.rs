pub mod codec;
pub mod sanitize;
pub mod transform;

use std::net::IpAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{CountryTotal, IpInfo, IpList, IspList, ProxyTypeList};
use crate::storage::{ProxyStorage, StorageError};

/// How many proxy-type frequency rows the ranking returns.
const TOP_PROXY_TYPES: u32 = 3;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bad IP address")]
    InvalidAddress,
    #[error("bad country code")]
    InvalidCountryCode,
    #[error("no results for query")]
    NoResultFound,
    #[error("repository failure: {0}")]
    Repository(#[from] StorageError),
    #[error("response encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request-scoped orchestration over an injected repository handle. The
/// pool behind the handle is the only shared resource; everything here is
/// per-request values.
pub struct ProxyService {
    storage: Arc<dyn ProxyStorage>,
    range_fetch_limit: u32,
}

impl ProxyService {
    pub fn new(storage: Arc<dyn ProxyStorage>, range_fetch_limit: u32) -> Self {
        Self {
            storage,
            range_fetch_limit,
        }
    }

    /// Full record for the single range containing `addr`. Ranges do not
    /// overlap, so at most one row can match; zero rows is a miss.
    pub async fn ip_info(&self, addr: IpAddr) -> ServiceResult<IpInfo> {
        let key = codec::address_to_integer(addr).ok_or(ServiceError::InvalidAddress)?;
        debug!(%addr, key, "looking up range containing address");

        match self.storage.find_range_containing(key).await? {
            Some(range) => Ok(IpInfo::from(range)),
            None => {
                warn!(%addr, "no range contains address");
                Err(ServiceError::NoResultFound)
            }
        }
    }

    /// Up to `limit` discrete addresses for a country, expanded out of its
    /// range rows. `limit` must already be normalized by
    /// [`sanitize::sanitize_limit`].
    pub async fn country_addresses(&self, country_code: &str, limit: u32) -> ServiceResult<IpList> {
        sanitize::validate_country_length(country_code)?;

        let ranges = self
            .storage
            .find_ranges_for_country(country_code, self.range_fetch_limit)
            .await?;
        debug!(country_code, rows = ranges.len(), "expanding country ranges");

        Ok(transform::expand_ranges(&ranges, limit as usize))
    }

    /// Distinct ISP names for a country.
    pub async fn country_isps(&self, country_code: &str) -> ServiceResult<IspList> {
        sanitize::validate_country_length(country_code)?;

        let names = self.storage.isp_names_for_country(country_code).await?;
        Ok(transform::dedup_isp_names(names))
    }

    /// Total addresses covered by a country's ranges. A country with no
    /// ranges is a zero total, not an error.
    pub async fn country_total(&self, country_code: &str) -> ServiceResult<CountryTotal> {
        sanitize::validate_country_length(country_code)?;

        let total_ip = self
            .storage
            .sum_address_count_for_country(country_code)
            .await?;
        Ok(CountryTotal { total_ip })
    }

    /// The most frequent proxy types, in repository order.
    pub async fn most_proxy_types(&self) -> ServiceResult<ProxyTypeList> {
        let rows = self.storage.top_proxy_types(TOP_PROXY_TYPES).await?;
        Ok(transform::rank_proxy_types(rows))
    }
}

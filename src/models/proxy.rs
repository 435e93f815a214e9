use serde::{Deserialize, Serialize};

/// One row of the range table: a contiguous block of IPv4 addresses that
/// share every other attribute. Invariant: `ip_from <= ip_to`. Ranges are
/// non-overlapping in the source data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpRange {
    pub ip_from: u32,
    pub ip_to: u32,
    pub country_code: String,
    pub country_name: String,
    pub region_name: String,
    pub city_name: String,
    pub isp: String,
    pub domain: String,
    pub usage_type: String,
    pub asn: String,
    pub as_name: String,
    pub proxy_type: String,
}

/// Wire shape for a single-address lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpInfo {
    pub proxy_type: String,
    pub country_code: String,
    pub country_name: String,
    pub region_name: String,
    pub city_name: String,
    pub isp: String,
    pub domain: String,
    pub usage_type: String,
    pub asn: String,
    #[serde(rename = "as")]
    pub as_name: String,
}

impl From<IpRange> for IpInfo {
    fn from(range: IpRange) -> Self {
        IpInfo {
            proxy_type: range.proxy_type,
            country_code: range.country_code,
            country_name: range.country_name,
            region_name: range.region_name,
            city_name: range.city_name,
            isp: range.isp,
            domain: range.domain,
            usage_type: range.usage_type,
            asn: range.asn,
            as_name: range.as_name,
        }
    }
}

/// One address materialized out of a range during expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandedAddress {
    pub ip_address: String,
    pub country_name: String,
    pub city_name: String,
}

/// Wire shape for a country address list. `total` is the number of
/// addresses actually materialized, not the sum of range sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpList {
    pub total: usize,
    #[serde(rename = "IPList")]
    pub ip_list: Vec<ExpandedAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IspName {
    pub isp: String,
}

/// Wire shape for a country ISP list. Order of members is unspecified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IspList {
    pub total: usize,
    #[serde(rename = "ISPList")]
    pub isp_list: Vec<IspName>,
}

/// Wire shape for a country address total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryTotal {
    pub total_ip: i64,
}

/// One pre-aggregated proxy-type frequency row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTypeCount {
    pub proxy_type: String,
    pub total: i64,
}

/// Wire shape for the proxy-type ranking, ordered by `total` descending as
/// delivered by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyTypeList {
    #[serde(rename = "ProxyTypeList")]
    pub proxy_type_list: Vec<ProxyTypeCount>,
}

//! The result transformer: turns compressed range rows into the bounded,
//! per-address shapes the API serves.

use std::collections::HashSet;

use crate::models::{
    ExpandedAddress, IpList, IpRange, IspList, IspName, ProxyTypeCount, ProxyTypeList,
};
use crate::service::codec;

/// Materialize one address per integer in each range, walking rows in the
/// order received and stopping the moment `limit` addresses exist, even
/// mid-range. `total` is the materialized count, not the sum of range
/// sizes: the repository row limit bounds ranges fetched, this loop is
/// what enforces the actual address cap.
pub fn expand_ranges(ranges: &[IpRange], limit: usize) -> IpList {
    let mut ip_list = Vec::new();
    for range in ranges {
        if ip_list.len() == limit {
            break;
        }
        // Inclusive iteration; `take` keeps the tail of the last range off
        // the list and keeps `ip_to == u32::MAX` from wrapping.
        for addr in (range.ip_from..=range.ip_to).take(limit - ip_list.len()) {
            ip_list.push(ExpandedAddress {
                ip_address: codec::integer_to_address(addr).to_string(),
                country_name: range.country_name.clone(),
                city_name: range.city_name.clone(),
            });
        }
    }
    IpList {
        total: ip_list.len(),
        ip_list,
    }
}

/// Collapse raw ISP names into a set keyed on exact string equality.
/// Member order is unspecified.
pub fn dedup_isp_names(names: Vec<String>) -> IspList {
    let set: HashSet<String> = names.into_iter().collect();
    let isp_list: Vec<IspName> = set.into_iter().map(|isp| IspName { isp }).collect();
    IspList {
        total: isp_list.len(),
        isp_list,
    }
}

/// The repository already aggregates and orders the top proxy types; this
/// only wraps the rows for the wire.
pub fn rank_proxy_types(rows: Vec<ProxyTypeCount>) -> ProxyTypeList {
    ProxyTypeList {
        proxy_type_list: rows,
    }
}

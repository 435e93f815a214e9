pub mod proxy;

pub use proxy::{
    CountryTotal, ExpandedAddress, IpInfo, IpList, IpRange, IspList, IspName, ProxyTypeCount,
    ProxyTypeList,
};

pub mod aviation;

pub use aviation::{AviationService, CacheStatus, ConnectivityReport, ProxyResponse};

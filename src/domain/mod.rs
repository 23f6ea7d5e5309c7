//! Domain types for the flight-data proxy.
//!
//! The upstream exposes a fixed set of resources. `Endpoint` names them with
//! strong typing so that HTTP slugs, upstream path segments and cache keys
//! can never drift apart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::request::DEBUG_PARAM;
use crate::constants::upstream::ACCESS_KEY_PARAM;

/// One logical upstream resource.
///
/// # Examples
///
/// ```rust
/// use flightdesk::domain::Endpoint;
///
/// let endpoint: Endpoint = "aircraft-types".parse().unwrap();
/// assert_eq!(endpoint, Endpoint::AircraftTypes);
/// assert_eq!(endpoint.name(), "aircraft_types");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Flights,
    Routes,
    Airports,
    Airlines,
    Airplanes,
    AircraftTypes,
    Taxes,
    Cities,
    Countries,
    FlightSchedules,
    FutureSchedules,
}

impl Endpoint {
    pub const ALL: [Self; 11] = [
        Self::Flights,
        Self::Routes,
        Self::Airports,
        Self::Airlines,
        Self::Airplanes,
        Self::AircraftTypes,
        Self::Taxes,
        Self::Cities,
        Self::Countries,
        Self::FlightSchedules,
        Self::FutureSchedules,
    ];

    /// Logical name, also the value hashed into cache keys.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Routes => "routes",
            Self::Airports => "airports",
            Self::Airlines => "airlines",
            Self::Airplanes => "airplanes",
            Self::AircraftTypes => "aircraft_types",
            Self::Taxes => "taxes",
            Self::Cities => "cities",
            Self::Countries => "countries",
            Self::FlightSchedules => "flight_schedules",
            Self::FutureSchedules => "future_schedules",
        }
    }

    /// Path segment under `/api/aviation/`.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::AircraftTypes => "aircraft-types",
            Self::FlightSchedules => "flight-schedules",
            Self::FutureSchedules => "future-schedules",
            other => other.name(),
        }
    }

    /// Path segment appended to the upstream base URL.
    #[must_use]
    pub const fn upstream_path(&self) -> &'static str {
        match self {
            Self::FlightSchedules => "timetable",
            Self::FutureSchedules => "flightsFuture",
            other => other.name(),
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.slug() == slug)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown endpoint: {0}")]
pub struct UnknownEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    /// Accepts either the hyphenated slug or the logical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.slug() == s || e.name() == s)
            .ok_or_else(|| UnknownEndpoint(s.to_string()))
    }
}

/// Query parameters forwarded upstream. Ordered so that iteration is
/// canonical regardless of how the caller supplied them.
pub type Params = BTreeMap<String, String>;

/// A single proxied call. Constructed once per incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    endpoint: Endpoint,
    params: Params,
    force_refresh: bool,
}

impl ProxyRequest {
    #[must_use]
    pub fn new(endpoint: Endpoint, params: Params, force_refresh: bool) -> Self {
        Self {
            endpoint,
            params,
            force_refresh,
        }
    }

    /// Builds a request from raw caller parameters.
    ///
    /// The `debug` flag only forces a refresh when `debug_mode` is enabled on
    /// the server. It is removed from the parameters either way, so it never
    /// reaches upstream or the cache key. A caller-supplied credential is
    /// dropped as well.
    #[must_use]
    pub fn from_caller(endpoint: Endpoint, mut params: Params, debug_mode: bool) -> Self {
        let debug_requested = params.remove(DEBUG_PARAM).is_some();
        params.remove(ACCESS_KEY_PARAM);
        Self::new(endpoint, params, debug_requested && debug_mode)
    }

    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub const fn force_refresh(&self) -> bool {
        self.force_refresh
    }
}

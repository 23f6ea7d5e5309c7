pub mod cache {

    pub const DEFAULT_TTL_MINUTES: u64 = 15;

    /// One week.
    pub const MAX_TTL_MINUTES: u64 = 7 * 24 * 60;

    pub const DEFAULT_MAX_ENTRIES: usize = 10_000;
}

pub mod upstream {

    pub const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com/v1";

    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

    pub const USER_AGENT: &str = "Flightdesk/1.0";

    /// Query parameter carrying the credential upstream.
    pub const ACCESS_KEY_PARAM: &str = "access_key";
}

pub mod request {

    /// Caller-supplied flag that asks for a forced refresh in debug mode.
    pub const DEBUG_PARAM: &str = "debug";
}

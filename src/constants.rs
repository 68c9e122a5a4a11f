//! Centralized constants for the weather-places crate
//!
//! Values shared across modules live here; tunables that users may override
//! are mirrored in `config::defaults`.

/// External API endpoints
pub mod api {
    /// Kakao Local API (address search and coordinate-to-region)
    pub const KAKAO_LOCAL_URL: &str = "https://dapi.kakao.com";

    /// Address search path
    pub const KAKAO_ADDRESS_SEARCH_PATH: &str = "/v2/local/search/address.json";

    /// Coordinate to administrative region path
    pub const KAKAO_COORD_TO_REGION_PATH: &str = "/v2/local/geo/coord2regioncode.json";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Favorites REST API root, relative to the configured base URL
    pub const FAVORITES_PATH: &str = "/api/favorites";

    /// Sort order update path, relative to the configured base URL
    pub const FAVORITES_SORT_ORDER_PATH: &str = "/api/favorites/sort-order";

    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("weather-places/", env!("CARGO_PKG_VERSION"));
}

/// Address search tuning
pub mod search {
    /// Quiet period before a query is dispatched
    pub const DEBOUNCE_MS: u64 = 350;

    /// Queries shorter than this (after trimming) are never sent; the
    /// geocoder answers 400 for blank and single-character input
    pub const MIN_QUERY_CHARS: usize = 2;

    /// Provider limit on query length
    pub const MAX_QUERY_CHARS: usize = 30;

    /// Documents per page (provider maximum)
    pub const PAGE_SIZE: u32 = 30;

    /// Load the next page once the last visible row is this close to the end
    pub const PREFETCH_THRESHOLD: usize = 5;
}

/// Location resolution
pub mod location {
    /// Fallback latitude (Seoul City Hall)
    pub const DEFAULT_LATITUDE: f64 = 37.5665;

    /// Fallback longitude (Seoul City Hall)
    pub const DEFAULT_LONGITUDE: f64 = 126.9780;

    /// Label for the fallback coordinate
    pub const DEFAULT_LABEL: &str = "기본 위치(서울)";

    /// Label for a user selection stored without an address
    pub const SELECTED_LABEL: &str = "선택한 위치";

    /// Address used when reverse geocoding fails
    pub const UNKNOWN_LOCATION: &str = "알 수 없는 위치";

    /// Upper bound on waiting for a single position fix
    pub const FIX_TIMEOUT_SECS: u64 = 10;
}

/// HTTP client settings
pub mod http {
    /// Connect/read timeout for every outbound call
    pub const TIMEOUT_SECS: u64 = 30;
}

/// User-facing transient messages
pub mod messages {
    pub const NETWORK_ERROR: &str = "네트워크 오류가 발생했습니다.";
    pub const OPERATION_FAILED: &str = "요청을 처리하지 못했습니다.";
    pub const FAVORITE_ADDED: &str = "즐겨찾기에 추가했습니다.";
    pub const FAVORITE_DELETED: &str = "즐겨찾기에서 삭제했습니다.";
    pub const SORT_ORDER_PARTIAL: &str = "일부 위치의 순서를 저장하지 못했습니다.";
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}

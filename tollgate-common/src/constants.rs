//! Constants used across Tollgate.

/// The only URL scheme a [Permalink](crate::Permalink) may use.
pub const PERMALINK_SCHEME: &str = "https";

/// Default origin of the Tollgate REST API.
pub const DEFAULT_API_URL: &str = "https://api.tollgate.to";

/// Default origin readers are sent to for purchasing an article.
pub const DEFAULT_PURCHASE_URL: &str = "https://tollgate.to";

/// Path segments of the REST API.
pub mod api_paths {
    /// Publication owning the API key.
    pub const PUBLICATION: &str = "/v1/publication";
    /// Article create-or-update.
    pub const ARTICLES: &str = "/v1/articles";
    /// Reader access verification.
    pub const VERIFY_ACCESS: &str = "/v1/access/verify";
}

/// Path under the purchase origin that a signed purchase token is appended to.
pub const PURCHASE_PATH: &str = "/purchase/";

/// Query parameter carrying the reader's access token when they return to a permalink.
pub const ACCESS_TOKEN_PARAM: &str = "tollgate_token";

/// Pricing bounds.
pub mod pricing_limits {
    /// Smallest quantity a discount tier may start at.
    pub const MIN_TIER_QUANTITY: u64 = 2;
    /// Exclusive upper bound of a discount percentage.
    pub const MAX_DISCOUNT_PERCENTAGE: f64 = 100.0;
    /// Exclusive upper bound of a price or minimum quantity (2^64).
    pub const INTEGER_LIMIT: f64 = 18_446_744_073_709_551_616.0;
}

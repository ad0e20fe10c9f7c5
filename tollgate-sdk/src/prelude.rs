//! Common imports for quick starts.

// Common
pub use crate::{BuildError, Error, Result};

// Client
pub use crate::{TollgateClient, TollgateClientBuilder};

// Purchase links and articles
pub use crate::{ArticleUpsert, PricingInput, PurchaseLinkOptions};

// Validated values
pub use crate::{ArticlePricing, Permalink};

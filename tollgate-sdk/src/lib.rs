#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

mod api;
mod client;
pub mod errors;
mod macros;
mod purchase;
pub mod signer;
pub mod transport;
mod util;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Client
pub use client::core::{TollgateClient, TollgateClientBuilder};
// API data contracts
pub use api::{AccessVerification, Article, ArticleUpsert, Publication};
// Purchase links
pub use purchase::{PurchaseLinkOptions, access_token_from_url};
// Capabilities
pub use signer::{Hs256Signer, TokenSigner};
pub use transport::{ApiRequest, HttpTransport, Transport};

// Error types
pub use errors::{BuildError, Error, RequestError, Result, SigningError};

// Re-exports
pub use reqwest::{Method, StatusCode};
pub use tollgate_common::{
    ArticlePricing, DiscountTier, DiscountTierInput, Permalink, PricingInput,
    PurchaseLinkPayload, ValidationError, build_payload, constants, validate_permalink,
    validate_pricing,
};

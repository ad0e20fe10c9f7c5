#![doc = include_str!("../README.md")]
//!

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

pub mod constants;
pub mod error;
pub mod payload;
pub mod permalink;
pub mod pricing;

pub use error::ValidationError;
pub use payload::{PurchaseLinkPayload, build_payload};
pub use permalink::{IntoPermalink, Permalink, validate_permalink};
pub use pricing::{ArticlePricing, DiscountTier, DiscountTierInput, PricingInput, validate_pricing};

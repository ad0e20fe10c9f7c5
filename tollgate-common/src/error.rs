//! The single error kind produced by permalink and pricing validation.

/// A validation rule was violated.
///
/// Every variant names exactly one rule; the [`Display`](std::fmt::Display)
/// message is meant to be shown to whoever supplied the input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The permalink could not be parsed as an absolute URL.
    #[error("Permalink must be a valid absolute URL: {0}")]
    PermalinkUnparseable(#[from] url::ParseError),
    /// The permalink scheme is not `https`.
    #[error("Permalink must use a secure scheme.")]
    PermalinkInsecureScheme,
    /// The permalink has a query string.
    #[error("Permalink must not include a query string.")]
    PermalinkQuery,
    /// The permalink has a fragment.
    #[error("Permalink must not include a fragment.")]
    PermalinkFragment,
    /// The permalink names an explicit port.
    #[error("Permalink must not specify a port.")]
    PermalinkPort,
    /// The permalink embeds a username or password.
    #[error("Permalink must not include a username or password.")]
    PermalinkCredentials,

    /// Price is not an integer, or is not positive.
    #[error("Price must be an integer greater than 0.")]
    InvalidPrice,
    /// A tier's minimum quantity is not an integer of at least 2.
    #[error("Each tier minimum quantity must be an integer of at least 2.")]
    InvalidMinimumQuantity,
    /// A tier's discount percentage is not a number strictly between 0 and 100.
    #[error("Each tier discount percentage must be a number greater than 0 and less than 100.")]
    InvalidDiscountPercentage,
    /// Two tiers share the same minimum quantity.
    #[error("Each tier minimum quantity must be unique (found {minimum_quantity} more than once).")]
    DuplicateMinimumQuantity {
        /// The repeated threshold.
        minimum_quantity: u64,
    },
    /// A tier does not discount more than the tier below it.
    #[error("Each tier discount percentage must be greater than the previous tier's discount.")]
    NonIncreasingDiscount,
}

//! Plaintext content of a signed purchase link.

use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::{
    error::ValidationError,
    permalink::{IntoPermalink, Permalink},
    pricing::{ArticlePricing, PricingInput, validate_pricing},
};

/// What a purchase token says: which article, optionally at which price, and
/// whether the purchase page should show the sharing context.
///
/// Key presence is part of the signed content. `customPricing` and
/// `showSharingContext` are written only when set, never as `null` or `false`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WirePayload")]
pub struct PurchaseLinkPayload {
    permalink: Permalink,
    custom_pricing: Option<ArticlePricing>,
    show_sharing_context: bool,
}

impl PurchaseLinkPayload {
    /// Payload for `permalink` at the article's stored price.
    pub fn new(permalink: Permalink) -> Self {
        Self {
            permalink,
            custom_pricing: None,
            show_sharing_context: false,
        }
    }

    /// Override the article's price for this link.
    #[must_use]
    pub fn with_custom_pricing(mut self, pricing: ArticlePricing) -> Self {
        self.custom_pricing = Some(pricing);
        self
    }

    /// Ask the purchase page to show who shared the link.
    #[must_use]
    pub fn with_sharing_context(mut self) -> Self {
        self.show_sharing_context = true;
        self
    }

    // === Getters ===

    /// The article this link sells.
    pub fn permalink(&self) -> &Permalink {
        &self.permalink
    }

    /// Pricing overriding the stored one, if any.
    pub fn custom_pricing(&self) -> Option<&ArticlePricing> {
        self.custom_pricing.as_ref()
    }

    /// Whether the sharing context was requested.
    pub fn shows_sharing_context(&self) -> bool {
        self.show_sharing_context
    }
}

impl Serialize for PurchaseLinkPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = 1 + usize::from(self.custom_pricing.is_some()) + usize::from(self.show_sharing_context);
        let mut map = serializer.serialize_map(Some(len))?;

        map.serialize_entry("permalink", &self.permalink)?;
        if let Some(pricing) = &self.custom_pricing {
            map.serialize_entry("customPricing", pricing)?;
        }
        if self.show_sharing_context {
            map.serialize_entry("showSharingContext", &true)?;
        }

        map.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePayload {
    permalink: Permalink,
    #[serde(default)]
    custom_pricing: Option<ArticlePricing>,
    #[serde(default)]
    show_sharing_context: bool,
}

impl From<WirePayload> for PurchaseLinkPayload {
    fn from(wire: WirePayload) -> Self {
        Self {
            permalink: wire.permalink,
            custom_pricing: wire.custom_pricing,
            show_sharing_context: wire.show_sharing_context,
        }
    }
}

/// Validate a permalink and optional custom pricing and assemble the payload
/// of a purchase link.
///
/// Validation errors are returned as they are. `show_sharing_context` only
/// adds its key when `true`.
///
/// # Example
/// ```
/// # use tollgate_common::{build_payload, PricingInput};
/// let payload = build_payload("https://example.com/a", Some(PricingInput::new(10.0)), true)?;
///
/// assert_eq!(
///     serde_json::to_string(&payload).unwrap(),
///     r#"{"permalink":"https://example.com/a","customPricing":{"price":10,"discounts":[]},"showSharingContext":true}"#
/// );
/// # Ok::<_, tollgate_common::ValidationError>(())
/// ```
pub fn build_payload<P: IntoPermalink>(
    permalink: P,
    custom_pricing: Option<PricingInput>,
    show_sharing_context: bool,
) -> Result<PurchaseLinkPayload, ValidationError> {
    let mut payload = PurchaseLinkPayload::new(permalink.into_permalink()?);

    if let Some(input) = custom_pricing {
        payload = payload.with_custom_pricing(validate_pricing(&input)?);
    }
    if show_sharing_context {
        payload = payload.with_sharing_context();
    }

    Ok(payload)
}

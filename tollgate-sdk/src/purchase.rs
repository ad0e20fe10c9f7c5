//! Signed purchase links.

use tollgate_common::{
    IntoPermalink, PricingInput, build_payload,
    constants::{ACCESS_TOKEN_PARAM, PURCHASE_PATH},
};
use url::Url;

use crate::{
    TollgateClient,
    errors::{Result, SigningError},
};

/// Optional parts of a purchase link.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct PurchaseLinkOptions {
    /// Price this link sells at instead of the article's stored pricing.
    pub custom_pricing: Option<PricingInput>,
    /// Show the reader who shared the link.
    pub show_sharing_context: bool,
}

impl PurchaseLinkOptions {
    /// Sell at `pricing` through this link.
    pub fn custom_pricing(mut self, pricing: PricingInput) -> Self {
        self.custom_pricing = Some(pricing);
        self
    }

    /// Show the sharing context on the purchase page.
    pub fn show_sharing_context(mut self) -> Self {
        self.show_sharing_context = true;
        self
    }
}

impl TollgateClient {
    /// Create a signed link a reader follows to buy the article at `permalink`.
    ///
    /// Validates the permalink and any custom pricing, signs the payload with
    /// the configured signer, and appends the token to
    /// `<purchase_url>/purchase/`. No request is made.
    ///
    /// # Examples
    /// ```
    /// # use tollgate::{TollgateClient, PurchaseLinkOptions, PricingInput};
    /// let client = TollgateClient::builder()
    ///     .api_key("tg_test_123")
    ///     .signing_secret("publication-signing-secret")
    ///     .build()?;
    ///
    /// let link = client.purchase_link(
    ///     "https://example.com/a",
    ///     PurchaseLinkOptions::default().custom_pricing(PricingInput::new(99.0)),
    /// )?;
    /// assert!(link.as_str().starts_with("https://tollgate.to/purchase/"));
    /// # Ok::<_, tollgate::Error>(())
    /// ```
    pub fn purchase_link<P: IntoPermalink>(
        &self,
        permalink: P,
        options: PurchaseLinkOptions,
    ) -> Result<Url> {
        let payload = build_payload(
            permalink,
            options.custom_pricing,
            options.show_sharing_context,
        )?;

        let signer = self.signer.as_ref().ok_or(SigningError::NotConfigured)?;
        let token = signer.sign(&payload)?;

        purchase_url_for_token(&self.purchase_url, &token)
    }
}

/// `<base>/purchase/<token>`, keeping any path prefix `base` has.
pub(crate) fn purchase_url_for_token(base: &Url, token: &str) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}{PURCHASE_PATH}{token}"))?)
}

/// Read the access token a reader returns with after a purchase.
///
/// Looks for the `tollgate_token` query parameter; `None` if absent or empty.
///
/// # Example
/// ```
/// # use tollgate::access_token_from_url;
/// let token = access_token_from_url("https://example.com/a?tollgate_token=abc")?;
/// assert_eq!(token.as_deref(), Some("abc"));
/// # Ok::<_, tollgate::Error>(())
/// ```
pub fn access_token_from_url(url: &str) -> Result<Option<String>> {
    let url = Url::parse(url)?;

    Ok(url
        .query_pairs()
        .find(|(name, _)| name == ACCESS_TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty()))
}

//! REST API calls and their data contracts.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tollgate_common::{
    ArticlePricing, IntoPermalink, Permalink, PricingInput, constants::api_paths,
    validate_pricing,
};
use url::Url;

use crate::{
    TollgateClient,
    errors::{RequestError, Result},
    macros::sdk_log,
    purchase::access_token_from_url,
    transport::ApiRequest,
};

/// The publication owning the API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Publication identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Home page, if registered.
    #[serde(default)]
    pub url: Option<String>,
    /// ISO 4217 currency prices are expressed in.
    #[serde(default)]
    pub currency: Option<String>,
}

/// An article registered with Tollgate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article identifier.
    pub id: String,
    /// Canonical permalink.
    pub permalink: Permalink,
    /// Title shown on the purchase page.
    #[serde(default)]
    pub title: Option<String>,
    /// Stored pricing; `None` means the publication default applies.
    #[serde(default)]
    pub pricing: Option<ArticlePricing>,
}

/// Create-or-update request for an article, keyed by permalink.
///
/// Nothing is checked until [`TollgateClient::upsert_article`] runs.
///
/// # Example
/// ```
/// # use tollgate::{ArticleUpsert, PricingInput};
/// let upsert = ArticleUpsert::new("https://example.com/a")
///     .title("Hello")
///     .pricing(PricingInput::new(49.0).discount(10.0, 5.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct ArticleUpsert {
    /// Article permalink, validated before sending.
    pub permalink: String,
    /// Title shown on the purchase page.
    pub title: Option<String>,
    /// Pricing, validated before sending.
    pub pricing: Option<PricingInput>,
}

impl ArticleUpsert {
    /// Upsert for the article at `permalink`.
    pub fn new(permalink: impl Into<String>) -> Self {
        Self {
            permalink: permalink.into(),
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the pricing.
    pub fn pricing(mut self, pricing: PricingInput) -> Self {
        self.pricing = Some(pricing);
        self
    }
}

/// Body actually sent for an upsert: only validated values, absent keys omitted.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleBody<'a> {
    permalink: Permalink,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pricing: Option<ArticlePricing>,
}

/// Whether a reader holding a token may read an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessVerification {
    /// The token grants access to the article.
    pub has_access: bool,
    /// When the access was purchased, as reported by the service.
    #[serde(default)]
    pub purchased_at: Option<String>,
}

impl TollgateClient {
    /// Fetch the publication the API key belongs to.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn ex(client: tollgate::TollgateClient) -> tollgate::Result<()> {
    /// let publication = client.publication().await?;
    /// println!("selling as {}", publication.name);
    /// # Ok(()) }
    /// ```
    pub async fn publication(&self) -> Result<Publication> {
        self.call(ApiRequest::get(api_paths::PUBLICATION)).await
    }

    /// Create or update an article.
    ///
    /// The permalink and pricing are validated first; an invalid article is
    /// never sent.
    ///
    /// # Examples
    /// ```no_run
    /// # use tollgate::{ArticleUpsert, PricingInput};
    /// # async fn ex(client: tollgate::TollgateClient) -> tollgate::Result<()> {
    /// let article = client
    ///     .upsert_article(
    ///         ArticleUpsert::new("https://example.com/a")
    ///             .title("Hello")
    ///             .pricing(PricingInput::new(49.0)),
    ///     )
    ///     .await?;
    /// println!("registered {}", article.id);
    /// # Ok(()) }
    /// ```
    pub async fn upsert_article(&self, article: ArticleUpsert) -> Result<Article> {
        let permalink = article.permalink.as_str().into_permalink()?;
        let pricing = article.pricing.as_ref().map(validate_pricing).transpose()?;

        let body = ArticleBody {
            permalink,
            title: article.title.as_deref(),
            pricing,
        };
        let body = serde_json::to_value(&body).map_err(|err| RequestError::Validation {
            message: err.to_string(),
        })?;

        sdk_log!(debug, "Upserting article {}", article.permalink);
        self.call(ApiRequest::post(api_paths::ARTICLES, body)).await
    }

    /// Ask Tollgate whether `token` grants access to the article at `permalink`.
    ///
    /// The token is sent exactly as given; an empty or whitespace-only token
    /// is rejected without a request.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn ex(client: tollgate::TollgateClient, token: &str) -> tollgate::Result<()> {
    /// let access = client.verify_access("https://example.com/a", token).await?;
    /// if access.has_access {
    ///     // serve the full article
    /// }
    /// # Ok(()) }
    /// ```
    pub async fn verify_access<P: IntoPermalink>(
        &self,
        permalink: P,
        token: &str,
    ) -> Result<AccessVerification> {
        let permalink = permalink.into_permalink()?;

        if token.trim().is_empty() {
            return Err(RequestError::Validation {
                message: "access token cannot be empty".into(),
            }
            .into());
        }

        let body = json!({ "permalink": permalink, "token": token });
        self.call(ApiRequest::post(api_paths::VERIFY_ACCESS, body))
            .await
    }

    /// Verify the access token a reader brings back to an article page.
    ///
    /// `url` is the full URL the reader requested, e.g.
    /// `https://example.com/a?tollgate_token=...`. The permalink is `url`
    /// without its query and fragment. Returns `None` when the URL carries no
    /// token.
    pub async fn verify_access_from_url(&self, url: &str) -> Result<Option<AccessVerification>> {
        let Some(token) = access_token_from_url(url)? else {
            return Ok(None);
        };

        let mut permalink = Url::parse(url)?;
        permalink.set_query(None);
        permalink.set_fragment(None);

        self.verify_access(permalink, &token).await.map(Some)
    }
}

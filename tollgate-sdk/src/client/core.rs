use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tollgate_common::constants::{DEFAULT_API_URL, DEFAULT_PURCHASE_URL};
use url::Url;

use crate::{
    errors::BuildError,
    signer::{Hs256Signer, TokenSigner},
    transport::{ApiRequest, HttpTransport, Transport},
    util::decode_error,
};

const DEFAULT_USER_AGENT: &str = concat!("tollgate-sdk", "@", env!("CARGO_PKG_VERSION"),);

/// Configures a [`TollgateClient`] before construction.
///
/// Most code obtains this via [`TollgateClient::builder()`], which simply returns
/// `TollgateClientBuilder::default()`.
///
/// # Defaults
/// - API URL: [`DEFAULT_API_URL`]
/// - Purchase URL: [`DEFAULT_PURCHASE_URL`]
/// - HTTP request timeout: reqwest default (no global timeout) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `tollgate-sdk@<crate-version>` plus any [`Self::user_agent_extra`]
/// - No signer: [`TollgateClient::purchase_link`] fails until
///   [`Self::signing_secret`] or [`Self::signer`] is set.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use tollgate::TollgateClient;
/// let client = TollgateClient::builder()
///     .api_key("tg_live_123")
///     .signing_secret("publication-signing-secret")
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("myapp/1.2.3")
///     .build()?;
/// # Ok::<_, tollgate::BuildError>(())
/// ```
#[derive(Clone, Default)]
#[must_use]
pub struct TollgateClientBuilder {
    api_key: Option<String>,
    api_url: Option<String>,
    purchase_url: Option<String>,
    signing_secret: Option<Vec<u8>>,
    signer: Option<Arc<dyn TokenSigner>>,
    transport: Option<Arc<dyn Transport>>,
    http_request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA for app-level telemetry.
    user_agent_extra: Option<String>,
}

impl TollgateClientBuilder {
    /// The publication's secret API key, sent as a bearer token.
    pub fn api_key<S: Into<String>>(&mut self, api_key: S) -> &mut Self {
        self.api_key = Some(api_key.into());

        self
    }

    /// Base URL of the REST API. A path prefix is kept.
    pub fn api_url<S: Into<String>>(&mut self, url: S) -> &mut Self {
        self.api_url = Some(url.into());

        self
    }

    /// Base URL that purchase links point at.
    pub fn purchase_url<S: Into<String>>(&mut self, url: S) -> &mut Self {
        self.purchase_url = Some(url.into());

        self
    }

    /// Sign purchase links with [`Hs256Signer`] keyed with `secret`.
    ///
    /// [`Self::build`] fails if the secret is shorter than
    /// [`MIN_SECRET_LEN`](crate::signer::MIN_SECRET_LEN) bytes.
    pub fn signing_secret<S: AsRef<[u8]>>(&mut self, secret: S) -> &mut Self {
        self.signing_secret = Some(secret.as_ref().to_vec());
        self.signer = None;

        self
    }

    /// Sign purchase links with a custom [`TokenSigner`].
    pub fn signer<T: TokenSigner + 'static>(&mut self, signer: T) -> &mut Self {
        self.signer = Some(Arc::new(signer));
        self.signing_secret = None;

        self
    }

    /// Send API calls through a custom [`Transport`] instead of HTTP.
    ///
    /// The API key, API URL, timeout and user agent are then ignored.
    pub fn transport<T: Transport + 'static>(&mut self, transport: T) -> &mut Self {
        self.transport = Some(Arc::new(transport));

        self
    }

    /// Set HTTP requests timeout.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.http_request_timeout = Some(timeout);

        self
    }

    /// Append an extra user-agent segment after the default `tollgate-sdk@<version>`.
    /// Example: `.user_agent_extra("myapp/1.2.3")`
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build [TollgateClient]
    pub fn build(&self) -> Result<TollgateClient, BuildError> {
        let purchase_url = parse_base_url(
            "purchase",
            self.purchase_url.as_deref().unwrap_or(DEFAULT_PURCHASE_URL),
        )?;

        let signer: Option<Arc<dyn TokenSigner>> = match (&self.signer, &self.signing_secret) {
            (Some(signer), _) => Some(Arc::clone(signer)),
            (None, Some(secret)) => Some(Arc::new(Hs256Signer::new(secret)?)),
            (None, None) => None,
        };

        let transport: Arc<dyn Transport> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(self.http_transport()?),
        };

        Ok(TollgateClient {
            transport,
            signer,
            purchase_url,
        })
    }

    fn http_transport(&self) -> Result<HttpTransport, BuildError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(BuildError::MissingApiKey)?;

        let api_url = parse_base_url("api", self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT.to_string(),
        };

        let mut http_builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.http_request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(HttpTransport::new(
            http_builder.build()?,
            api_url,
            api_key.to_string(),
        ))
    }
}

impl fmt::Debug for TollgateClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TollgateClientBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("purchase_url", &self.purchase_url)
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("signer", &self.signer)
            .field("transport", &self.transport)
            .field("http_request_timeout", &self.http_request_timeout)
            .field("user_agent_extra", &self.user_agent_extra)
            .finish()
    }
}

fn parse_base_url(name: &'static str, raw: &str) -> Result<Url, BuildError> {
    let invalid = |reason: String| BuildError::InvalidUrl {
        name,
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("cannot be used as a base URL".into()));
    }

    Ok(url)
}

/// Client for a publication's backend.
///
/// `TollgateClient` holds the publication's credentials and exposes:
/// - API calls: [`Self::publication`], [`Self::upsert_article`],
///   [`Self::verify_access`], [`Self::verify_access_from_url`].
/// - Purchase links: [`Self::purchase_link`], signed locally, no network.
///
/// Permalinks and pricing are validated before anything is sent or signed;
/// validation failures surface as [`Error::Validation`](crate::Error::Validation).
///
/// The client is cheap to clone and safe to share between tasks; it has no
/// mutable state.
///
/// ### Construction
/// Use [`TollgateClient::builder()`] to set the signing secret, timeouts or
/// user-agent, or [`TollgateClient::new()`] for an API-only client with
/// default URLs.
///
/// ### Example
/// ```no_run
/// # use tollgate::{TollgateClient, Result};
/// # async fn run() -> Result<()> {
/// let client = TollgateClient::new("tg_live_123")?;
/// let publication = client.publication().await?;
/// println!("{}", publication.name);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct TollgateClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) signer: Option<Arc<dyn TokenSigner>>,
    pub(crate) purchase_url: Url,
}

impl TollgateClient {
    /// Creates an API client with default URLs and no signer.
    pub fn new<S: Into<String>>(api_key: S) -> Result<TollgateClient, BuildError> {
        Self::builder().api_key(api_key).build()
    }

    /// Returns a builder to edit settings before creating [`TollgateClient`].
    pub fn builder() -> TollgateClientBuilder {
        TollgateClientBuilder::default()
    }

    // === Getters ===

    /// Base URL purchase links point at.
    pub fn purchase_url(&self) -> &Url {
        &self.purchase_url
    }

    /// Whether [`Self::purchase_link`] can sign.
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    /// Send `request` and decode the response as `T`.
    pub(crate) async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> crate::Result<T> {
        let value = self.transport.send(request).await?;
        serde_json::from_value(value).map_err(|err| decode_error(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SigningError;

    #[test]
    fn api_key_is_required_for_http() {
        assert!(matches!(
            TollgateClient::builder().build(),
            Err(BuildError::MissingApiKey)
        ));
        assert!(matches!(
            TollgateClient::new("   "),
            Err(BuildError::MissingApiKey)
        ));
    }

    #[test]
    fn defaults() {
        let client = TollgateClient::new("tg_test_123").unwrap();
        assert_eq!(client.purchase_url().as_str(), "https://tollgate.to/");
        assert!(!client.can_sign());

        let client = TollgateClient::builder()
            .api_key("tg_test_123")
            .signing_secret("publication-signing-secret")
            .build()
            .unwrap();
        assert!(client.can_sign());
    }

    #[test]
    fn short_signing_secret_fails_at_build() {
        assert!(matches!(
            TollgateClient::builder()
                .api_key("tg_test_123")
                .signing_secret("short")
                .build(),
            Err(BuildError::Signer(SigningError::WeakSecret { .. }))
        ));
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(matches!(
            TollgateClient::builder()
                .api_key("tg_test_123")
                .api_url("not a url")
                .build(),
            Err(BuildError::InvalidUrl { name: "api", .. })
        ));
        assert!(matches!(
            TollgateClient::builder()
                .api_key("tg_test_123")
                .purchase_url("mailto:billing@example.com")
                .build(),
            Err(BuildError::InvalidUrl {
                name: "purchase",
                ..
            })
        ));
    }

    #[test]
    fn debug_hides_api_key() {
        let mut builder = TollgateClient::builder();
        builder
            .api_key("tg_live_secret")
            .signing_secret("publication-signing-secret");
        let rendered = format!("{builder:?}");
        assert!(!rendered.contains("tg_live_secret"));
        assert!(!rendered.contains("publication-signing-secret"));

        let rendered = format!("{:?}", builder.build().unwrap());
        assert!(!rendered.contains("tg_live_secret"));
    }
}

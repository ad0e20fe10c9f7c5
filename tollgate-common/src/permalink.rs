//! Canonical article URLs.
//!
//! A permalink is the subject of every signed purchase token, so two spellings
//! of the same article must collapse to one string. Parsing and printing are
//! left to [`url::Url`] (WHATWG rules: lowercase host, percent-encoding,
//! default-port elision); this module only rejects the components a permalink
//! may not carry.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{constants::PERMALINK_SCHEME, error::ValidationError};

/// A validated, canonical `https` article URL.
///
/// Guaranteed to have no query, no fragment, no explicit port and no
/// credentials. Obtain one with [`Permalink::parse`] or [`validate_permalink`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permalink(Url);

impl Permalink {
    /// Parse and canonicalize a permalink.
    ///
    /// Rules, checked in this order:
    /// - must parse as an absolute URL,
    /// - scheme must be `https`,
    /// - no query string,
    /// - no fragment,
    /// - no explicit port (`:443` is the default and is dropped, not rejected),
    /// - no username or password.
    ///
    /// # Example
    /// ```
    /// # use tollgate_common::Permalink;
    /// let p = Permalink::parse("HTTPS://Example.com/articles/1")?;
    /// assert_eq!(p.as_str(), "https://example.com/articles/1");
    /// # Ok::<_, tollgate_common::ValidationError>(())
    /// ```
    pub fn parse<S: AsRef<str>>(s: S) -> Result<Self, ValidationError> {
        let url = Url::parse(s.as_ref())?;
        Self::from_url(url)
    }

    /// Validate an already parsed URL.
    pub fn from_url(url: Url) -> Result<Self, ValidationError> {
        if url.scheme() != PERMALINK_SCHEME {
            return Err(ValidationError::PermalinkInsecureScheme);
        }
        if url.query().is_some_and(|q| !q.is_empty()) {
            return Err(ValidationError::PermalinkQuery);
        }
        if url.fragment().is_some_and(|f| !f.is_empty()) {
            return Err(ValidationError::PermalinkFragment);
        }
        if url.port().is_some() {
            return Err(ValidationError::PermalinkPort);
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ValidationError::PermalinkCredentials);
        }

        Ok(Permalink(url))
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The canonical form as a parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

/// Validate `input` and return its canonical [`Permalink`].
///
/// Accepts anything implementing [`IntoPermalink`]: `&str`, `String`, a parsed
/// [`Url`], or an existing `Permalink`.
pub fn validate_permalink<P: IntoPermalink>(input: P) -> Result<Permalink, ValidationError> {
    input.into_permalink()
}

impl FromStr for Permalink {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Url> for Permalink {
    type Error = ValidationError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        Self::from_url(url)
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Permalink {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Permalink> for Url {
    fn from(p: Permalink) -> Self {
        p.0
    }
}

impl Serialize for Permalink {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Permalink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string: String = Deserialize::deserialize(deserializer)?;

        Permalink::parse(string).map_err(serde::de::Error::custom)
    }
}

// --- Conversions ---
/// Inputs accepted wherever a permalink is expected.
pub trait IntoPermalink {
    /// Validate and canonicalize.
    fn into_permalink(self) -> Result<Permalink, ValidationError>;
}

impl IntoPermalink for Permalink {
    #[inline]
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Ok(self)
    }
}
impl IntoPermalink for &Permalink {
    #[inline]
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Ok(self.clone())
    }
}
impl IntoPermalink for &str {
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Permalink::parse(self)
    }
}
impl IntoPermalink for String {
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Permalink::parse(self)
    }
}
impl IntoPermalink for &String {
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Permalink::parse(self)
    }
}
impl IntoPermalink for Url {
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Permalink::from_url(self)
    }
}
impl IntoPermalink for &Url {
    fn into_permalink(self) -> Result<Permalink, ValidationError> {
        Permalink::from_url(self.clone())
    }
}

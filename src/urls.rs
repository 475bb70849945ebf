//! Resource URLs for the Imbo HTTP API.
//!
//! Every server-side resource is addressed by a [`ResourceUrl`]: the server
//! base URL, the resource path (derived from the user's public key and, for
//! image-scoped resources, the image identifier) and an ordered set of query
//! parameters. URLs render either unsigned via [`ResourceUrl::url`] or with
//! the authentication parameters appended via [`ResourceUrl::signed_url`].
//!
//! URL values are plain `String`s by design: the signature covers the URL
//! byte for byte, so the rendered form must never be re-normalized by a URL
//! type between signing and sending.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::signing::{self, SigningInput};

/// Characters percent-encoded in query keys and values. Everything outside
/// the RFC 3986 unreserved set is escaped so the signed and transmitted
/// forms of a URL are byte-identical.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Key pair identifying an Imbo user.
///
/// The public key names the user and appears in resource paths; the private
/// key only ever feeds the request signature and is zeroed from memory on
/// drop. One `Credentials` is typically shared across all URLs of a client
/// behind an [`Arc`].
#[derive(Clone)]
pub struct Credentials {
    public_key: String,
    private_key: PrivateKey,
}

/// Wrapper that wipes the key material when dropped.
#[derive(Clone)]
struct PrivateKey(String);

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Credentials {
    /// Create a key pair. Both keys must be non-empty.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Result<Self> {
        let public_key = public_key.into();
        let private_key = private_key.into();
        if public_key.is_empty() {
            return Err(Error::InvalidArgument("public key cannot be empty".to_string()));
        }
        if private_key.is_empty() {
            return Err(Error::InvalidArgument("private key cannot be empty".to_string()));
        }
        Ok(Self {
            public_key,
            private_key: PrivateKey(private_key),
        })
    }

    /// Public key of the user.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> &str {
        &self.private_key.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// The resources exposed by an Imbo server.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resource {
    Status,
    User,
    Images,
    Image { image_identifier: String },
    Metadata { image_identifier: String },
}

impl Resource {
    /// Path of the resource relative to the server base URL.
    fn path(&self, public_key: &str) -> String {
        match self {
            Resource::Status => "/status.json".to_string(),
            Resource::User => format!("/users/{}.json", public_key),
            Resource::Images => format!("/users/{}/images.json", public_key),
            Resource::Image { image_identifier } => {
                format!("/users/{}/images/{}.json", public_key, image_identifier)
            }
            Resource::Metadata { image_identifier } => {
                format!("/users/{}/images/{}/metadata.json", public_key, image_identifier)
            }
        }
    }
}

/// URL of one resource on an Imbo server.
///
/// Query parameters are held sorted by key so a URL renders identically no
/// matter the order they were added in; the `signature` and `timestamp`
/// parameters produced by [`signed_url`](Self::signed_url) are appended after
/// them, in that order, as the server expects.
#[derive(Debug, Clone)]
pub struct ResourceUrl {
    base_url: String,
    credentials: Option<Arc<Credentials>>,
    resource: Resource,
    params: BTreeMap<String, String>,
    force_signing: bool,
}

impl ResourceUrl {
    /// URL of the server status resource. Status is public and carries no
    /// credentials, so it can never be signed.
    pub fn status(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            credentials: None,
            resource: Resource::Status,
            params: BTreeMap::new(),
            force_signing: false,
        })
    }

    /// URL of the user resource for the credentials' public key.
    pub fn user(base_url: &str, credentials: Arc<Credentials>) -> Result<Self> {
        Self::keyed(base_url, credentials, Resource::User)
    }

    /// URL of the images collection for the credentials' public key.
    pub fn images(base_url: &str, credentials: Arc<Credentials>) -> Result<Self> {
        Self::keyed(base_url, credentials, Resource::Images)
    }

    /// URL of a single image.
    pub fn image(
        base_url: &str,
        credentials: Arc<Credentials>,
        image_identifier: &str,
    ) -> Result<Self> {
        let image_identifier = require_identifier(image_identifier)?;
        Self::keyed(base_url, credentials, Resource::Image { image_identifier })
    }

    /// URL of the metadata resource of a single image.
    pub fn metadata(
        base_url: &str,
        credentials: Arc<Credentials>,
        image_identifier: &str,
    ) -> Result<Self> {
        let image_identifier = require_identifier(image_identifier)?;
        Self::keyed(base_url, credentials, Resource::Metadata { image_identifier })
    }

    fn keyed(base_url: &str, credentials: Arc<Credentials>, resource: Resource) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            credentials: Some(credentials),
            resource,
            params: BTreeMap::new(),
            force_signing: false,
        })
    }

    /// Add or overwrite a single query parameter.
    pub fn add_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add every parameter from `params`, overwriting existing keys.
    pub fn with_query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.into());
        }
        self
    }

    /// Drop all query parameters, returning the URL to its base form.
    pub fn reset_query_params(mut self) -> Self {
        self.params.clear();
        self
    }

    /// Sign even methods that would normally go out unsigned.
    pub fn force_signing(mut self, force: bool) -> Self {
        self.force_signing = force;
        self
    }

    /// Public key this URL belongs to, if the resource is user-scoped.
    pub fn public_key(&self) -> Option<&str> {
        self.credentials.as_deref().map(Credentials::public_key)
    }

    /// Current query parameters, sorted by key.
    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// The resource URL without any query string.
    pub fn resource_url(&self) -> String {
        let public_key = self
            .credentials
            .as_deref()
            .map(Credentials::public_key)
            .unwrap_or_default();
        format!("{}{}", self.base_url, self.resource.path(public_key))
    }

    /// The unsigned URL: resource URL plus the sorted, percent-encoded
    /// query parameters.
    pub fn url(&self) -> String {
        let resource_url = self.resource_url();
        if self.params.is_empty() {
            return resource_url;
        }
        let query = self
            .params
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", resource_url, query)
    }

    /// Whether a request with `method` must carry a signature.
    ///
    /// State-changing methods (`PUT`, `POST`, `DELETE`) always sign;
    /// everything else only when signing was forced.
    pub fn requires_signing(&self, method: &Method) -> bool {
        self.force_signing || matches!(method.as_str(), "PUT" | "POST" | "DELETE")
    }

    /// The URL with `signature` and `timestamp` parameters appended for a
    /// request issued with `method` at the current time.
    ///
    /// Does not modify `self`: the unsigned parameter set stays as-is, so
    /// the same URL can be signed again (with a fresh timestamp) or rendered
    /// unsigned afterwards.
    pub fn signed_url(&self, method: &Method) -> Result<String> {
        self.signed_url_at(method, Utc::now())
    }

    fn signed_url_at(&self, method: &Method, now: DateTime<Utc>) -> Result<String> {
        let credentials = self.credentials.as_deref().ok_or_else(|| {
            Error::Signing("resource carries no credentials".to_string())
        })?;
        let timestamp = signing::encode_timestamp(now);
        let url = self.url();
        let signature = signing::sign(
            &SigningInput {
                method: method.as_str(),
                url: &url,
                public_key: credentials.public_key(),
                timestamp: &timestamp,
            },
            credentials.private_key(),
        );
        let separator = if url.contains('?') { '&' } else { '?' };
        Ok(format!(
            "{}{}signature={}&timestamp={}",
            url, separator, signature, timestamp
        ))
    }
}

/// Strip trailing slashes and reject URLs the transport could not use.
fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("base URL cannot be empty".to_string()));
    }
    Url::parse(trimmed)
        .map_err(|e| Error::InvalidUrl(format!("invalid base URL '{}': {}", trimmed, e)))?;
    Ok(trimmed.to_string())
}

fn require_identifier(image_identifier: &str) -> Result<String> {
    if image_identifier.is_empty() {
        return Err(Error::InvalidArgument(
            "image identifier cannot be empty".to_string(),
        ));
    }
    Ok(image_identifier.to_string())
}

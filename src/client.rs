//! HTTP client implementation for Imbo servers

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HttpClient;
use hyper_util::rt::TokioExecutor;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::query::ImagesQuery;
use crate::types::*;
use crate::urls::{Credentials, ResourceUrl};

/// Configuration options for the Imbo client
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URLs of the Imbo servers hosting the user's images. With more
    /// than one URL, image-scoped requests are spread deterministically
    /// over the hosts by image identifier.
    pub server_urls: Vec<String>,
    /// Public key identifying the user
    pub public_key: String,
    /// Private key used to sign state-changing requests. Never sent over
    /// the wire.
    pub private_key: String,
    /// Request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_urls: Vec::new(),
            public_key: String::new(),
            private_key: String::new(),
            timeout_ms: 30000,
            user_agent: concat!("imbo-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_urls", &self.server_urls)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// TLS configuration with standard CA verification against the webpki roots.
fn build_tls_config() -> Result<rustls::ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    Ok(rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

fn accept_json_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("accept".to_string(), "application/json".to_string());
    headers
}

type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

/// Async client for an Imbo image server
///
/// Reads go out as plain requests; state-changing requests (image upload
/// and deletion, metadata writes) are signed with the user's private key
/// before they leave the client. Both `http://` and `https://` server URLs
/// are supported; TLS uses standard CA verification.
///
/// # Example
/// ```rust,no_run
/// use imbo_client::Client;
///
/// #[tokio::main]
/// async fn main() -> Result<(), imbo_client::Error> {
///     let client = Client::new("http://imbo.example.com", "user", "private-key")?;
///
///     let status = client.server_status().await?;
///     println!("database: {}, storage: {}", status.database, status.storage);
///
///     let added = client.add_image(&std::fs::read("cat.jpg")?).await?;
///     println!("stored as {}", added.image_identifier);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    credentials: Arc<Credentials>,
    http_client: HttpClient<HttpsConnector, Full<Bytes>>,
}

impl Client {
    /// Create a new Imbo client for a single server
    ///
    /// # Arguments
    /// * `server_url` - Base URL of the Imbo server (e.g., "http://imbo.example.com")
    /// * `public_key` - Public key identifying the user
    /// * `private_key` - Private key used to sign state-changing requests
    ///
    /// # Errors
    /// Returns an error if the server URL is invalid or either key is empty
    pub fn new(server_url: &str, public_key: &str, private_key: &str) -> Result<Self> {
        Self::with_server_urls(vec![server_url.to_string()], public_key, private_key)
    }

    /// Create a new client spreading image traffic over several server URLs
    pub fn with_server_urls(
        server_urls: Vec<String>,
        public_key: &str,
        private_key: &str,
    ) -> Result<Self> {
        let config = ClientConfig {
            server_urls,
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if config.server_urls.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one server URL is required".to_string(),
            ));
        }
        // Validate the server URLs early
        for server_url in &config.server_urls {
            let _: Uri = server_url.parse().map_err(|e| {
                Error::InvalidUrl(format!("Invalid server URL '{}': {}", server_url, e))
            })?;
        }

        let credentials = Arc::new(Credentials::new(
            config.public_key.clone(),
            config.private_key.clone(),
        )?);

        let tls_config = build_tls_config()?;

        let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http_client = HttpClient::builder(TokioExecutor::new()).build(https_connector);

        Ok(Self {
            config: Arc::new(config),
            credentials,
            http_client,
        })
    }

    /// Get the public key the client authenticates as
    pub fn public_key(&self) -> &str {
        self.credentials.public_key()
    }

    /// Get the configured server URLs
    pub fn server_urls(&self) -> &[String] {
        &self.config.server_urls
    }

    /// URL of the server status resource
    pub fn status_url(&self) -> Result<ResourceUrl> {
        ResourceUrl::status(self.primary_host())
    }

    /// URL of the user resource
    pub fn user_url(&self) -> Result<ResourceUrl> {
        ResourceUrl::user(self.primary_host(), Arc::clone(&self.credentials))
    }

    /// URL of the images collection
    pub fn images_url(&self) -> Result<ResourceUrl> {
        ResourceUrl::images(self.primary_host(), Arc::clone(&self.credentials))
    }

    /// URL of a single image
    pub fn image_url(&self, image_identifier: &str) -> Result<ResourceUrl> {
        ResourceUrl::image(
            self.host_for(image_identifier),
            Arc::clone(&self.credentials),
            image_identifier,
        )
    }

    /// URL of the metadata resource of an image
    pub fn metadata_url(&self, image_identifier: &str) -> Result<ResourceUrl> {
        ResourceUrl::metadata(
            self.host_for(image_identifier),
            Arc::clone(&self.credentials),
            image_identifier,
        )
    }

    fn primary_host(&self) -> &str {
        &self.config.server_urls[0]
    }

    /// Pick the host for an image from the first two hex digits of its
    /// identifier, so URLs for one image always land on the same server.
    fn host_for(&self, image_identifier: &str) -> &str {
        let hosts = &self.config.server_urls;
        if hosts.len() == 1 {
            return &hosts[0];
        }
        let index = image_identifier
            .get(..2)
            .and_then(|prefix| u8::from_str_radix(prefix, 16).ok())
            .map(|byte| byte as usize % hosts.len())
            .unwrap_or(0);
        &hosts[index]
    }

    /// Render the URL for a request, signing it when the resource and
    /// method demand a signature.
    fn rendered_url(resource: &ResourceUrl, method: &Method) -> Result<String> {
        if resource.requires_signing(method) {
            resource.signed_url(method)
        } else {
            Ok(resource.url())
        }
    }

    /// Internal request method
    async fn request(
        &self,
        method: &Method,
        url: &str,
        body: Option<Bytes>,
        headers: Option<HashMap<String, String>>,
    ) -> Result<Response<Incoming>> {
        let uri: Uri = url
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("Invalid request URL: {}", e)))?;

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header("user-agent", self.config.user_agent.as_str());

        if let Some(custom_headers) = headers {
            for (key, value) in custom_headers {
                builder = builder.header(&key, value);
            }
        }

        let req = builder
            .body(Full::new(body.unwrap_or_default()))
            .map_err(|e| Error::InvalidRequest(format!("Failed to build request: {}", e)))?;

        debug!("Sending request: {} {}", method, url);

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let response = tokio::time::timeout(timeout, self.http_client.request(req))
            .await
            .map_err(|_| Error::Timeout(self.config.timeout_ms))?
            .map_err(|e| Error::Connection(format!("Request failed: {}", e)))?;

        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::NOT_FOUND => Err(Error::NotFound(url.to_string())),
            code if code.is_server_error() => {
                let message = Self::error_message(response).await?;
                Err(Error::ServerError {
                    status: code.as_u16(),
                    message,
                })
            }
            code if code.is_client_error() => {
                let message = Self::error_message(response).await?;
                Err(Error::InvalidRequest(message))
            }
            _ => Ok(response),
        }
    }

    /// Issue a request and parse the JSON response body
    async fn request_json<T>(
        &self,
        method: &Method,
        url: &str,
        body: Option<Bytes>,
        headers: Option<HashMap<String, String>>,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.request(method, url, body, headers).await?;
        let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;
        Ok(serde_json::from_slice(&body_bytes)?)
    }

    /// Read response body to bytes
    async fn read_body_to_bytes(body: Incoming) -> Result<Vec<u8>> {
        let collected = body
            .collect()
            .await
            .map_err(|e| Error::Connection(format!("Failed to read response body: {}", e)))?;
        Ok(collected.to_bytes().to_vec())
    }

    /// Extract the message from an Imbo error document, falling back to
    /// the raw body text
    async fn error_message(response: Response<Incoming>) -> Result<String> {
        let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;
        match serde_json::from_slice::<ImboError>(&body_bytes) {
            Ok(document) => Ok(document.error.message),
            Err(_) => Ok(String::from_utf8_lossy(&body_bytes).trim().to_string()),
        }
    }

    /// Get the current status of the server
    ///
    /// # Returns
    /// Health of the server's database and storage backends
    ///
    /// # Example
    /// ```rust,no_run
    /// # use imbo_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), imbo_client::Error> {
    /// # let client = Client::new("http://imbo.example.com", "user", "key")?;
    /// let status = client.server_status().await?;
    /// if !status.database {
    ///     eprintln!("database backend is down");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn server_status(&self) -> Result<ServerStatus> {
        let resource = self.status_url()?;
        let url = Self::rendered_url(&resource, &Method::GET)?;
        self.request_json(&Method::GET, &url, None, Some(accept_json_headers()))
            .await
    }

    /// Get information about the user the client authenticates as
    pub async fn user_info(&self) -> Result<UserInfo> {
        let resource = self.user_url()?;
        let url = Self::rendered_url(&resource, &Method::GET)?;
        self.request_json(&Method::GET, &url, None, Some(accept_json_headers()))
            .await
    }

    /// Get the number of images the user has stored
    pub async fn num_images(&self) -> Result<u64> {
        Ok(self.user_info().await?.num_images)
    }

    /// List images matching a query
    ///
    /// # Arguments
    /// * `query` - Pagination and filter options
    ///
    /// # Example
    /// ```rust,no_run
    /// # use imbo_client::{Client, ImagesQuery};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), imbo_client::Error> {
    /// # let client = Client::new("http://imbo.example.com", "user", "key")?;
    /// let query = ImagesQuery::new().with_limit(5).with_return_metadata(true);
    /// for image in client.images(&query).await? {
    ///     println!("{}", image.image_identifier);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn images(&self, query: &ImagesQuery) -> Result<Vec<Image>> {
        let resource = self.images_url()?.with_query_params(query.to_params());
        let url = Self::rendered_url(&resource, &Method::GET)?;
        self.request_json(&Method::GET, &url, None, Some(accept_json_headers()))
            .await
    }

    /// List images with the default query (first page, 20 images)
    pub async fn images_default(&self) -> Result<Vec<Image>> {
        self.images(&ImagesQuery::new()).await
    }

    /// Store an image on the server
    ///
    /// The image identifier is derived from the content (md5 hex digest),
    /// so storing the same bytes twice is idempotent.
    ///
    /// # Arguments
    /// * `data` - The raw image bytes
    ///
    /// # Example
    /// ```rust,no_run
    /// # use imbo_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), imbo_client::Error> {
    /// # let client = Client::new("http://imbo.example.com", "user", "key")?;
    /// let added = client.add_image(&std::fs::read("cat.jpg")?).await?;
    /// println!("stored as {}", added.image_identifier);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn add_image(&self, data: &[u8]) -> Result<AddedImage> {
        if data.is_empty() {
            return Err(Error::InvalidArgument(
                "image data cannot be empty".to_string(),
            ));
        }
        let image_identifier = self.image_identifier(data);
        let resource = self.image_url(&image_identifier)?;
        let url = Self::rendered_url(&resource, &Method::PUT)?;

        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/octet-stream".to_string(),
        );

        self.request_json(
            &Method::PUT,
            &url,
            Some(Bytes::copy_from_slice(data)),
            Some(headers),
        )
        .await
    }

    /// Store an image from a file on disk
    pub async fn add_image_file(&self, path: impl AsRef<Path>) -> Result<AddedImage> {
        let data = tokio::fs::read(path).await?;
        if data.is_empty() {
            return Err(Error::InvalidArgument(
                "the specified file was empty".to_string(),
            ));
        }
        self.add_image(&data).await
    }

    /// Fetch an image from a URL and store it on the server
    pub async fn add_image_from_url(&self, source_url: &str) -> Result<AddedImage> {
        let response = self.request(&Method::GET, source_url, None, None).await?;
        let data = Self::read_body_to_bytes(response.into_body()).await?;
        if data.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "no image data at '{}'",
                source_url
            )));
        }
        self.add_image(&data).await
    }

    /// Content-derived identifier (md5 hex digest) of image data
    pub fn image_identifier(&self, data: &[u8]) -> String {
        format!("{:x}", md5::compute(data))
    }

    /// Content-derived identifier of an image file on disk
    pub async fn image_identifier_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let data = tokio::fs::read(path).await?;
        Ok(self.image_identifier(&data))
    }

    /// Check whether an image exists on the server
    ///
    /// # Returns
    /// true if the image exists, false if the identifier is unknown
    pub async fn image_exists(&self, image_identifier: &str) -> Result<bool> {
        match self.image_properties(image_identifier).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check whether the image stored in a local file exists on the server
    pub async fn image_exists_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let image_identifier = self.image_identifier_file(path).await?;
        self.image_exists(&image_identifier).await
    }

    /// Get properties of the original image without fetching its data
    ///
    /// Issues a HEAD request and parses the `x-imbo-original*` response
    /// headers.
    pub async fn image_properties(&self, image_identifier: &str) -> Result<ImageProperties> {
        let resource = self.image_url(image_identifier)?;
        let url = Self::rendered_url(&resource, &Method::HEAD)?;
        let response = self.request(&Method::HEAD, &url, None, None).await?;
        Ok(ImageProperties::from_headers(response.headers()))
    }

    /// Retrieve the raw data of a stored image
    ///
    /// # Returns
    /// The image bytes, or None if the identifier is unknown
    ///
    /// # Example
    /// ```rust,no_run
    /// # use imbo_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), imbo_client::Error> {
    /// # let client = Client::new("http://imbo.example.com", "user", "key")?;
    /// if let Some(data) = client.image_data("23d7f91b25f3013fcc75ce070c40e004").await? {
    ///     std::fs::write("copy.jpg", &data)?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn image_data(&self, image_identifier: &str) -> Result<Option<Vec<u8>>> {
        let resource = self.image_url(image_identifier)?;
        let url = Self::rendered_url(&resource, &Method::GET)?;
        match self.request(&Method::GET, &url, None, None).await {
            Ok(response) => {
                let body_bytes = Self::read_body_to_bytes(response.into_body()).await?;
                Ok(Some(body_bytes))
            }
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an image from the server
    ///
    /// # Returns
    /// true if the image was deleted, false if it didn't exist
    pub async fn delete_image(&self, image_identifier: &str) -> Result<bool> {
        let resource = self.image_url(image_identifier)?;
        let url = Self::rendered_url(&resource, &Method::DELETE)?;
        match self.request(&Method::DELETE, &url, None, None).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get the metadata attached to an image
    pub async fn metadata(&self, image_identifier: &str) -> Result<Map<String, Value>> {
        let resource = self.metadata_url(image_identifier)?;
        let url = Self::rendered_url(&resource, &Method::GET)?;
        self.request_json(&Method::GET, &url, None, Some(accept_json_headers()))
            .await
    }

    /// Merge metadata into an image's existing metadata
    ///
    /// Existing keys not present in `metadata` are left untouched.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use imbo_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), imbo_client::Error> {
    /// # let client = Client::new("http://imbo.example.com", "user", "key")?;
    /// let mut metadata = serde_json::Map::new();
    /// metadata.insert("category".to_string(), "cats".into());
    /// client.edit_metadata("23d7f91b25f3013fcc75ce070c40e004", &metadata).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn edit_metadata(
        &self,
        image_identifier: &str,
        metadata: &Map<String, Value>,
    ) -> Result<()> {
        self.write_metadata(image_identifier, &Method::POST, metadata)
            .await
    }

    /// Replace an image's metadata wholesale
    pub async fn replace_metadata(
        &self,
        image_identifier: &str,
        metadata: &Map<String, Value>,
    ) -> Result<()> {
        self.write_metadata(image_identifier, &Method::PUT, metadata)
            .await
    }

    async fn write_metadata(
        &self,
        image_identifier: &str,
        method: &Method,
        metadata: &Map<String, Value>,
    ) -> Result<()> {
        let resource = self.metadata_url(image_identifier)?;
        let url = Self::rendered_url(&resource, method)?;
        let body = serde_json::to_vec(metadata)?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let response = self
            .request(method, &url, Some(Bytes::from(body)), Some(headers))
            .await?;
        let _ = Self::read_body_to_bytes(response.into_body()).await?;
        Ok(())
    }

    /// Remove all metadata from an image
    pub async fn delete_metadata(&self, image_identifier: &str) -> Result<()> {
        let resource = self.metadata_url(image_identifier)?;
        let url = Self::rendered_url(&resource, &Method::DELETE)?;
        let response = self.request(&Method::DELETE, &url, None, None).await?;
        let _ = Self::read_body_to_bytes(response.into_body()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_ID: &str = "23d7f91b25f3013fcc75ce070c40e004";

    fn client() -> Client {
        Client::new("http://imbo", "key", "8495c97ea3a313c12c0661dc5526e769").unwrap()
    }

    fn multi_host_client() -> Client {
        Client::with_server_urls(
            vec![
                "http://imbo0".to_string(),
                "http://imbo1".to_string(),
                "http://imbo2".to_string(),
            ],
            "key",
            "private",
        )
        .unwrap()
    }

    #[test]
    fn test_client_new() {
        let client = client();
        assert_eq!(client.public_key(), "key");
        assert_eq!(client.server_urls().len(), 1);
        assert_eq!(client.server_urls()[0], "http://imbo");
    }

    #[test]
    fn test_client_requires_a_server_url() {
        let result = Client::with_config(ClientConfig {
            public_key: "key".to_string(),
            private_key: "private".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_client_rejects_invalid_server_url() {
        let result = Client::new("not a url", "key", "private");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_client_rejects_empty_keys() {
        assert!(matches!(
            Client::new("http://imbo", "", "private"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Client::new("http://imbo", "key", ""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_ms, 30000);
        assert!(config.user_agent.starts_with("imbo-client/"));
        assert!(config.server_urls.is_empty());
    }

    #[test]
    fn test_config_debug_redacts_private_key() {
        let config = ClientConfig {
            server_urls: vec!["http://imbo".to_string()],
            public_key: "key".to_string(),
            private_key: "super-secret".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_url_getters() {
        let client = client();
        assert_eq!(client.status_url().unwrap().url(), "http://imbo/status.json");
        assert_eq!(
            client.user_url().unwrap().url(),
            "http://imbo/users/key.json"
        );
        assert_eq!(
            client.images_url().unwrap().url(),
            "http://imbo/users/key/images.json"
        );
        assert_eq!(
            client.image_url(IMAGE_ID).unwrap().url(),
            "http://imbo/users/key/images/23d7f91b25f3013fcc75ce070c40e004.json"
        );
        assert_eq!(
            client.metadata_url(IMAGE_ID).unwrap().url(),
            "http://imbo/users/key/images/23d7f91b25f3013fcc75ce070c40e004/metadata.json"
        );
    }

    #[test]
    fn test_host_spreading_is_deterministic() {
        let client = multi_host_client();
        // 0x23 = 35, 35 % 3 = 2
        let first = client.image_url(IMAGE_ID).unwrap().url();
        assert!(first.starts_with("http://imbo2/"), "got {}", first);
        // repeated calls pick the same host
        assert_eq!(client.image_url(IMAGE_ID).unwrap().url(), first);
        // image and metadata URLs agree on the host
        assert!(client
            .metadata_url(IMAGE_ID)
            .unwrap()
            .url()
            .starts_with("http://imbo2/"));
    }

    #[test]
    fn test_host_spreading_by_identifier_prefix() {
        let client = multi_host_client();
        // 0x00 % 3 = 0, 0x0a = 10 % 3 = 1
        assert!(client
            .image_url("00ffffffffffffffffffffffffffffff")
            .unwrap()
            .url()
            .starts_with("http://imbo0/"));
        assert!(client
            .image_url("0affffffffffffffffffffffffffffff")
            .unwrap()
            .url()
            .starts_with("http://imbo1/"));
    }

    #[test]
    fn test_host_spreading_falls_back_on_non_hex_identifier() {
        let client = multi_host_client();
        assert!(client
            .image_url("zz-not-hex")
            .unwrap()
            .url()
            .starts_with("http://imbo0/"));
    }

    #[test]
    fn test_non_image_resources_use_the_first_host() {
        let client = multi_host_client();
        assert!(client.status_url().unwrap().url().starts_with("http://imbo0/"));
        assert!(client.user_url().unwrap().url().starts_with("http://imbo0/"));
        assert!(client.images_url().unwrap().url().starts_with("http://imbo0/"));
    }

    #[test]
    fn test_image_identifier_is_md5_hex() {
        let client = client();
        assert_eq!(
            client.image_identifier(b"image data"),
            "e09a574ca3760a3e28a3e5920fe4627e"
        );
        assert_eq!(
            client.image_identifier(b""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_rendered_url_signs_write_methods() {
        let client = client();
        let resource = client.image_url(IMAGE_ID).unwrap();

        let get = Client::rendered_url(&resource, &Method::GET).unwrap();
        assert_eq!(get, resource.url());

        let delete = Client::rendered_url(&resource, &Method::DELETE).unwrap();
        assert!(delete.starts_with(&format!("{}?signature=", resource.url())));
        assert!(delete.contains("&timestamp="));
    }

    #[tokio::test]
    async fn test_add_image_rejects_empty_data() {
        let client = client();
        let result = client.add_image(b"").await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_add_image_file_missing_file_is_io_error() {
        let client = client();
        let result = client.add_image_file("/no/such/file.jpg").await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_add_image_file_empty_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let client = client();
        let result = client.add_image_file(file.path()).await;
        match result {
            Err(Error::InvalidArgument(msg)) => {
                assert_eq!(msg, "the specified file was empty")
            }
            other => panic!("Expected InvalidArgument, got: {:?}", other),
        }
    }
}

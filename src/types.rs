//! Data types for the Imbo client

use http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response from the status resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Server-reported date
    pub date: String,
    /// Whether the database backend is healthy
    pub database: bool,
    /// Whether the storage backend is healthy
    pub storage: bool,
}

/// Response from the user resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Public key of the user
    pub public_key: String,
    /// Number of images the user has stored
    pub num_images: u64,
    /// When the user's data last changed
    #[serde(default)]
    pub last_modified: Option<String>,
}

/// One image in an images collection listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Content-derived identifier of the image
    pub image_identifier: String,
    /// Checksum of the image data
    #[serde(default)]
    pub checksum: Option<String>,
    /// Public key the image belongs to
    #[serde(default)]
    pub public_key: Option<String>,
    /// Size of the image data in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// File extension
    #[serde(default)]
    pub extension: Option<String>,
    /// Mime type of the image
    #[serde(default)]
    pub mime: Option<String>,
    /// When the image was added, as milliseconds since the epoch
    #[serde(default)]
    pub added: Option<i64>,
    /// When the image was last updated, as milliseconds since the epoch
    #[serde(default)]
    pub updated: Option<i64>,
    /// Image metadata, present when the listing was asked to include it
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Response from storing an image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedImage {
    /// Identifier assigned to the stored image
    pub image_identifier: String,
    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// File extension
    #[serde(default)]
    pub extension: Option<String>,
}

/// Properties of the original image, reported as `x-imbo-original*`
/// response headers on image requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProperties {
    /// Size of the original image data in bytes
    pub size: u64,
    /// Width of the original image in pixels
    pub width: u32,
    /// Height of the original image in pixels
    pub height: u32,
    /// Mime type of the original image
    pub mime_type: String,
    /// File extension of the original image
    pub extension: String,
}

impl ImageProperties {
    /// Extract image properties from response headers. Missing or
    /// unparsable headers fall back to zero or an empty string.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let size: u64 = headers
            .get("x-imbo-originalfilesize")
            .and_then(|v| v.to_str().ok())
            .and_then(|v: &str| v.parse().ok())
            .unwrap_or(0);

        let width: u32 = headers
            .get("x-imbo-originalwidth")
            .and_then(|v| v.to_str().ok())
            .and_then(|v: &str| v.parse().ok())
            .unwrap_or(0);

        let height: u32 = headers
            .get("x-imbo-originalheight")
            .and_then(|v| v.to_str().ok())
            .and_then(|v: &str| v.parse().ok())
            .unwrap_or(0);

        let mime_type = headers
            .get("x-imbo-originalmimetype")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let extension = headers
            .get("x-imbo-originalextension")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        ImageProperties {
            size,
            width,
            height,
            mime_type,
            extension,
        }
    }
}

/// Error document returned by Imbo on failed requests
#[derive(Debug, Clone, Deserialize)]
pub struct ImboError {
    /// The error detail
    pub error: ImboErrorDetail,
}

/// Detail of an Imbo error document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImboErrorDetail {
    /// HTTP status code the server responded with
    pub code: u16,
    /// Human-readable error message
    pub message: String,
    /// When the error occurred
    #[serde(default)]
    pub date: Option<String>,
    /// Imbo-internal error code
    #[serde(default)]
    pub imbo_error_code: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_parse_server_status() {
        let json = r#"{"date":"Wed, 18 Feb 2026 14:30:00 GMT","database":true,"storage":false}"#;
        let status: ServerStatus = serde_json::from_str(json).unwrap();
        assert!(status.database);
        assert!(!status.storage);
    }

    #[test]
    fn test_parse_user_info() {
        let json = r#"{"publicKey":"key","numImages":42,"lastModified":"Wed, 18 Feb 2026 14:30:00 GMT"}"#;
        let info: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.public_key, "key");
        assert_eq!(info.num_images, 42);
        assert!(info.last_modified.is_some());
    }

    #[test]
    fn test_parse_image_listing() {
        let json = r#"[
            {
                "imageIdentifier": "23d7f91b25f3013fcc75ce070c40e004",
                "checksum": "23d7f91b25f3013fcc75ce070c40e004",
                "publicKey": "key",
                "size": 12345,
                "width": 640,
                "height": 480,
                "extension": "jpg",
                "mime": "image/jpeg",
                "added": 1767225600000,
                "updated": 1767225600000,
                "metadata": {"category": "cats"}
            },
            {"imageIdentifier": "e09a574ca3760a3e28a3e5920fe4627e"}
        ]"#;
        let images: Vec<Image> = serde_json::from_str(json).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].image_identifier, "23d7f91b25f3013fcc75ce070c40e004");
        assert_eq!(images[0].mime.as_deref(), Some("image/jpeg"));
        assert_eq!(
            images[0].metadata.as_ref().and_then(|m| m.get("category")),
            Some(&serde_json::json!("cats"))
        );
        assert!(images[1].size.is_none());
    }

    #[test]
    fn test_parse_added_image() {
        let json = r#"{"imageIdentifier":"e09a574ca3760a3e28a3e5920fe4627e","width":640,"height":480,"extension":"png"}"#;
        let added: AddedImage = serde_json::from_str(json).unwrap();
        assert_eq!(added.image_identifier, "e09a574ca3760a3e28a3e5920fe4627e");
        assert_eq!(added.width, Some(640));
    }

    #[test]
    fn test_image_properties_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-imbo-originalfilesize", HeaderValue::from_static("12345"));
        headers.insert("x-imbo-originalwidth", HeaderValue::from_static("640"));
        headers.insert("x-imbo-originalheight", HeaderValue::from_static("480"));
        headers.insert("x-imbo-originalmimetype", HeaderValue::from_static("image/png"));
        headers.insert("x-imbo-originalextension", HeaderValue::from_static("png"));

        let properties = ImageProperties::from_headers(&headers);
        assert_eq!(
            properties,
            ImageProperties {
                size: 12345,
                width: 640,
                height: 480,
                mime_type: "image/png".to_string(),
                extension: "png".to_string(),
            }
        );
    }

    #[test]
    fn test_image_properties_default_on_missing_headers() {
        let properties = ImageProperties::from_headers(&HeaderMap::new());
        assert_eq!(properties.size, 0);
        assert_eq!(properties.width, 0);
        assert!(properties.mime_type.is_empty());
    }

    #[test]
    fn test_parse_error_document() {
        let json = r#"{"error":{"code":400,"message":"Signature mismatch","date":"Wed, 18 Feb 2026 14:30:00 GMT","imboErrorCode":101}}"#;
        let error: ImboError = serde_json::from_str(json).unwrap();
        assert_eq!(error.error.code, 400);
        assert_eq!(error.error.message, "Signature mismatch");
        assert_eq!(error.error.imbo_error_code, Some(101));
    }
}

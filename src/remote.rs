//! HTTP collaborators: link metadata lookup and random background photos.
//!
//! Both are best effort. Callers turn every [`RemoteError`] into a fallback
//! value; nothing here retries.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("startpage/", env!("CARGO_PKG_VERSION"));
const MAX_IMAGE_SIZE: usize = 40 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("Response missing {0}")]
    MissingField(&'static str),
    #[error("Image too large: {0} bytes")]
    TooLarge(usize),
}

/// Page title lookup for a bookmarked URL
pub trait LinkMetadataSource {
    /// `Ok(None)` when the service answered but had no usable title
    fn fetch_title(&self, url: &str) -> Result<Option<String>, RemoteError>;
}

/// Random landscape photo search plus full download of the chosen image
pub trait PhotoSource {
    fn random_photo(&self, query: &str, api_key: &str) -> Result<String, RemoteError>;
    /// Download the whole image; returns its size in bytes
    fn preload(&self, image_url: &str) -> Result<usize, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    status: String,
    #[serde(default)]
    data: Option<MetadataData>,
}

#[derive(Debug, Deserialize)]
struct MetadataData {
    #[serde(default)]
    title: Option<String>,
}

impl MetadataResponse {
    fn into_title(self) -> Option<String> {
        if self.status != "success" {
            return None;
        }
        self.data
            .and_then(|d| d.title)
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct PhotoResponse {
    #[serde(default)]
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    full: Option<String>,
}

impl PhotoResponse {
    fn into_full_url(self) -> Option<String> {
        self.urls.and_then(|u| u.full).filter(|u| !u.is_empty())
    }
}

/// `GET <endpoint>?url=<url>`
pub fn metadata_request_url(endpoint: &str, url: &str) -> Result<url::Url, RemoteError> {
    Ok(url::Url::parse_with_params(endpoint, &[("url", url)])?)
}

/// `GET <endpoint>?query=<query>&orientation=landscape&client_id=<api_key>`
pub fn photo_request_url(endpoint: &str, query: &str, api_key: &str) -> Result<url::Url, RemoteError> {
    Ok(url::Url::parse_with_params(
        endpoint,
        &[
            ("query", query),
            ("orientation", "landscape"),
            ("client_id", api_key),
        ],
    )?)
}

fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client, RemoteError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Microlink-compatible metadata endpoint (`GET ?url=...`)
pub struct MetadataClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl MetadataClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

impl LinkMetadataSource for MetadataClient {
    fn fetch_title(&self, url: &str) -> Result<Option<String>, RemoteError> {
        let request_url = metadata_request_url(&self.endpoint, url)?;
        let response = self.client.get(request_url).send()?;
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        let body: MetadataResponse = response.json()?;
        Ok(body.into_title())
    }
}

/// Unsplash-compatible random photo endpoint
pub struct UnsplashClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl UnsplashClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

impl PhotoSource for UnsplashClient {
    fn random_photo(&self, query: &str, api_key: &str) -> Result<String, RemoteError> {
        let request_url = photo_request_url(&self.endpoint, query, api_key)?;
        let response = self.client.get(request_url).send()?;
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        let body: PhotoResponse = response.json()?;
        body.into_full_url().ok_or(RemoteError::MissingField("urls.full"))
    }

    fn preload(&self, image_url: &str) -> Result<usize, RemoteError> {
        let response = self.client.get(image_url).send()?;
        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }
        let bytes = response.bytes()?;
        if bytes.len() > MAX_IMAGE_SIZE {
            return Err(RemoteError::TooLarge(bytes.len()));
        }
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_title_requires_success_status() {
        let ok: MetadataResponse =
            serde_json::from_str(r#"{"status":"success","data":{"title":"Rust"}}"#).unwrap();
        assert_eq!(ok.into_title().as_deref(), Some("Rust"));

        let failed: MetadataResponse =
            serde_json::from_str(r#"{"status":"fail","data":{"title":"Rust"}}"#).unwrap();
        assert_eq!(failed.into_title(), None);
    }

    #[test]
    fn metadata_blank_or_missing_title_is_none() {
        let blank: MetadataResponse =
            serde_json::from_str(r#"{"status":"success","data":{"title":"  "}}"#).unwrap();
        assert_eq!(blank.into_title(), None);

        let missing: MetadataResponse =
            serde_json::from_str(r#"{"status":"success","data":{}}"#).unwrap();
        assert_eq!(missing.into_title(), None);
    }

    #[test]
    fn metadata_request_encodes_target_url() {
        let request =
            metadata_request_url("https://api.microlink.io/", "https://x.com/a?b=1&c=2").unwrap();
        assert_eq!(
            request.as_str(),
            "https://api.microlink.io/?url=https%3A%2F%2Fx.com%2Fa%3Fb%3D1%26c%3D2"
        );
        let params: Vec<(String, String)> = request.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![("url".to_string(), "https://x.com/a?b=1&c=2".to_string())]
        );
    }

    #[test]
    fn photo_request_carries_query_orientation_and_key() {
        let request =
            photo_request_url("https://api.unsplash.com/photos/random", "cats & dogs", "k3y").unwrap();
        assert_eq!(
            request.as_str(),
            "https://api.unsplash.com/photos/random?query=cats+%26+dogs&orientation=landscape&client_id=k3y"
        );
    }

    #[test]
    fn bad_endpoint_is_an_error() {
        assert!(matches!(
            metadata_request_url("not a url", "https://x.com"),
            Err(RemoteError::Url(_))
        ));
    }

    #[test]
    fn photo_response_needs_full_url() {
        let ok: PhotoResponse =
            serde_json::from_str(r#"{"urls":{"full":"https://img/x.jpg","small":"s"}}"#).unwrap();
        assert_eq!(ok.into_full_url().as_deref(), Some("https://img/x.jpg"));

        let missing: PhotoResponse = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(missing.into_full_url(), None);
    }
}

//! HTTP client for talking to the search API

use crate::config::{ApiSettings, OutgoingSettings};
use crate::error::FetchError;
use anyhow::Result;
use reqwest::{Client, Response};
use url::Url;

/// Raw response from the API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub text: String,
    /// Final URL after redirects
    pub url: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, failing on non-success statuses first
    pub fn json(&self) -> std::result::Result<serde_json::Value, FetchError> {
        if !self.is_success() {
            return Err(FetchError::Status(self.status));
        }
        Ok(serde_json::from_str(&self.text)?)
    }
}

/// HTTP client wrapper bound to one API base URL
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl HttpClient {
    /// Create a client for the default local API
    pub fn new() -> Result<Self> {
        Self::with_settings(&ApiSettings::default(), &OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(api: &ApiSettings, settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(settings.request_timeout())
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        // Endpoint paths are joined relative to the base, so its path must end with '/'
        let mut base_url = api.base_url()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            user_agent: settings
                .useragent
                .clone()
                .unwrap_or_else(|| format!("rarefactor/{}", crate::VERSION)),
        })
    }

    /// Resolve an endpoint path below the base URL, keeping any path prefix
    pub fn endpoint(&self, path: &str) -> std::result::Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::Network(format!("invalid endpoint {path:?}: {e}")))
    }

    /// GET request with query parameters
    pub async fn get_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<ApiResponse, FetchError> {
        let url = self.endpoint(path)?;

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Parse response into ApiResponse
    async fn parse_response(response: Response) -> std::result::Result<ApiResponse, FetchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(ApiResponse { status, text, url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert!(client.user_agent().starts_with("rarefactor/"));
    }

    #[test]
    fn test_endpoint_join() {
        let api = ApiSettings {
            base_url: "http://search.local:8000".to_string(),
            ..Default::default()
        };
        let client = HttpClient::with_settings(&api, &OutgoingSettings::default()).unwrap();
        assert_eq!(
            client.endpoint("/v1/search").unwrap().as_str(),
            "http://search.local:8000/v1/search"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        for base in ["http://gw.local/rarefactor", "http://gw.local/rarefactor/"] {
            let api = ApiSettings {
                base_url: base.to_string(),
                ..Default::default()
            };
            let client = HttpClient::with_settings(&api, &OutgoingSettings::default()).unwrap();
            assert_eq!(
                client.endpoint("/search").unwrap().as_str(),
                "http://gw.local/rarefactor/search"
            );
            assert_eq!(
                client.endpoint("autocomplete").unwrap().as_str(),
                "http://gw.local/rarefactor/autocomplete"
            );
        }
    }

    #[test]
    fn test_non_success_status_is_an_error() {
        let response = ApiResponse {
            status: 500,
            text: "{}".to_string(),
            url: "http://localhost/search".to_string(),
        };
        assert_eq!(response.json(), Err(FetchError::Status(500)));
    }
}

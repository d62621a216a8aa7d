use async_trait::async_trait;
use kep_core::{API_TOKEN_HEADER, EndpointConfig, KepError, Transport};
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Transport that POSTs chunks to the datapoints endpoint over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    token: String,
}

impl HttpTransport {
    /// Transport name used in errors and logs.
    pub const NAME: &'static str = "http";

    /// Build a transport with its own client, applying the configured timeout.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL, or `Transport` if the HTTP
    /// client cannot be built.
    pub fn new(cfg: EndpointConfig) -> Result<Self, KepError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| KepError::transport(Self::NAME, e.to_string()))?;
        Self::with_client(client, cfg)
    }

    /// Build from a provided `reqwest::Client`.
    ///
    /// The client is used as-is; `cfg.timeout` is not applied to it.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL.
    pub fn with_client(client: reqwest::Client, cfg: EndpointConfig) -> Result<Self, KepError> {
        let url = Url::parse(&cfg.url)
            .map_err(|e| KepError::InvalidArg(format!("invalid endpoint url '{}': {e}", cfg.url)))?;
        Ok(Self {
            client,
            url,
            token: cfg.token,
        })
    }

    /// Endpoint this transport posts to.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn post(&self, body: &str) -> Result<u16, KepError> {
        let resp = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(API_TOKEN_HEADER, self.token.as_str())
            .body(body.to_owned())
            .send()
            .await
            .map_err(|e| KepError::transport(Self::NAME, e.to_string()))?;
        Ok(resp.status().as_u16())
    }
}

use async_trait::async_trait;
use reqwest::{header, Url};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{CoreError, TransportError};

use super::super::Transport;
use super::connection::{parse_endpoint, resolve_credentials, Credentials};

/// Bitcoin SV node JSON-RPC transport over HTTP(S).
///
/// One POST per call. Non-2xx replies are returned as-is only when the body
/// is JSON, since the node reports RPC errors with HTTP 500 and a JSON
/// envelope. Anything else (bad auth, wrong path, a proxy's HTML error page)
/// becomes [`TransportError::Status`].
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let credentials = resolve_credentials(
            config.user.as_deref(),
            config.pass.as_deref(),
            config.cookie_file.as_deref(),
        )?;
        let url = parse_endpoint(&config.endpoint)?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            credentials,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: String) -> Result<String, TransportError> {
        let mut builder = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.user, Some(&creds.pass));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, body_len = body.len(), "http response");

        if !status.is_success() {
            if !is_json_body(&body) {
                debug!(%status, "non-success reply without a JSON body");
                return Err(TransportError::Status {
                    status: status.as_u16(),
                });
            }
            warn!(%status, "node answered with non-success status");
        }

        Ok(body)
    }
}

/// A non-success reply is worth decoding only if it could be an envelope.
fn is_json_body(body: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(body).is_ok()
}

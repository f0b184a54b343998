//! Client configuration: where the node is, how to authenticate, and which
//! network parameter objects should format addresses for.

use std::path::PathBuf;
use std::time::Duration;

use bitcoin::Network;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8332";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Node cookie file (`user:password`), used when no explicit
    /// credentials are given.
    pub cookie_file: Option<PathBuf>,
    pub network: Network,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            user: None,
            pass: None,
            cookie_file: None,
            network: Network::Bitcoin,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(pass.into());
        self
    }

    pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn is_mainnet(&self) -> bool {
        self.network == Network::Bitcoin
    }
}

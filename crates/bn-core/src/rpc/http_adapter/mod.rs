//! JSON-RPC transport over HTTP(S).
//!
//! Implements [`Transport`](super::Transport) using `reqwest`, with basic
//! auth from explicit credentials or a node cookie file.

mod connection;
mod transport;

pub use transport::HttpTransport;

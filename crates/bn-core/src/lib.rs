pub mod args;
pub mod client;
pub mod config;
pub mod error;
pub mod methods;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;
pub mod wire;

pub use bitcoin;
pub use client::NodeClient;
pub use config::ClientConfig;
pub use error::{CoreError, TransportError};

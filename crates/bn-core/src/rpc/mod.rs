//! JSON-RPC plumbing.
//!
//! Defines the [`Transport`] seam, the [`RpcInvoker`] that wraps every call
//! in the JSON-RPC envelope, and the reqwest-backed [`HttpTransport`].

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub(crate) mod protocol;

pub use http_adapter::HttpTransport;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::{CoreError, TransportError};
use crate::methods::RpcMethod;

use protocol::{decode_envelope, JsonRpcRequest, JSONRPC_VERSION};

/// Moves one serialized JSON-RPC request to the node and returns the raw
/// response body.
///
/// Implementations own endpoint, credentials and connection reuse. They must
/// not interpret the body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: String) -> Result<String, TransportError>;
}

/// Issues single JSON-RPC calls over a [`Transport`].
///
/// Holds no per-call state; the id counter is the only shared value, so one
/// invoker can serve concurrent callers.
pub struct RpcInvoker {
    transport: Arc<dyn Transport>,
    next_id: AtomicU64,
}

impl RpcInvoker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(initial_request_id()),
        }
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send `method` with positional `params` and return the raw `result`.
    pub async fn invoke(
        &self,
        method: &str,
        params: &[serde_json::Value],
    ) -> Result<serde_json::Value, CoreError> {
        if method.trim().is_empty() {
            return Err(CoreError::InvalidParams(
                "method name must not be empty".to_owned(),
            ));
        }

        let id = self.reserve_request_id();
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };
        let body = serde_json::to_string(&req)
            .map_err(|e| CoreError::InvalidParams(format!("serialize `{method}` request: {e}")))?;

        let response = self.transport.send(body).await?;
        debug!(
            rpc.id = id,
            rpc.method = method,
            body_len = response.len(),
            "rpc response"
        );
        trace!(rpc.id = id, rpc.method = method, body = %response, "rpc response body");

        decode_envelope(method, &response)
    }

    /// Marshal, send and decode one typed method call.
    pub async fn call<M: RpcMethod>(&self, method: &M) -> Result<M::Output, CoreError> {
        let params = method.build_args()?.into_params();
        let raw = self.invoke(M::NAME, &params).await?;
        M::decode(raw)
    }

    /// Like [`call`](Self::call), but gives up with [`CoreError::Cancelled`]
    /// as soon as `cancel` resolves. The request may already have reached
    /// the node when that happens.
    pub async fn call_cancellable<M, C>(
        &self,
        method: &M,
        cancel: C,
    ) -> Result<M::Output, CoreError>
    where
        M: RpcMethod,
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                debug!(rpc.method = M::NAME, "rpc call cancelled by caller");
                Err(CoreError::Cancelled)
            }
            result = self.call(method) => result,
        }
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
